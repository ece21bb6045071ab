//! Prompts for answering questions over retrieved context. Rendered
//! with Handlebars in strict mode so a missing variable is an error
//! rather than a silently empty section.

use std::fmt;

use handlebars::Handlebars;

use crate::index::SourceNode;

#[derive(Debug)]
pub enum Prompt {
    QuestionAnswer,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl From<Prompt> for String {
    fn from(item: Prompt) -> String {
        format!("{:?}", item)
    }
}

pub const SYSTEM_PROMPT: &str = "You are an expert Q&A system that is trusted around the world.
Always answer the query using the provided context information, and not prior knowledge.
Some rules to follow:
1. Never directly reference the given context in your answer.
2. Avoid statements like 'Based on the context, ...' or 'The context information ...' or anything along those lines.";

const QUESTION_ANSWER_PROMPT: &str = "Context information is below.
---------------------
{{context}}
---------------------
Given the context information and not prior knowledge, answer the query.
Query: {{query}}
Answer: ";

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    // Prompts are plain text, HTML escaping would mangle quotes and
    // ampersands in the source documents
    registry.register_escape_fn(handlebars::no_escape);
    registry
        .register_template_string(&Prompt::QuestionAnswer.to_string(), QUESTION_ANSWER_PROMPT)
        .expect("Failed to register template");
    registry
}

/// Format retrieved nodes as the context block of the prompt, each
/// chunk preceded by the file it came from when known.
pub fn context_str(nodes: &[SourceNode]) -> String {
    nodes
        .iter()
        .map(|node| match node.file_name() {
            Some(file_name) => format!("file_name: {}\n\n{}", file_name, node.text),
            None => node.text.clone(),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
