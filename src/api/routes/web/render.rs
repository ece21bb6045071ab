//! Server side rendering of the chat page.

use std::sync::LazyLock;

use handlebars::Handlebars;
use pulldown_cmark::{CowStr, Event, Options, Parser, Tag};
use serde::Serialize;

use crate::chat::{Role, SessionState};

pub const PAGE_TITLE: &str = "RachelBot 💬 Kontiki";
const LOGO_URL: &str = "https://portale.arci.it/media/loghi/GIUSTIZIA_CLIMATICA_ORA_.jpg";
const EXAMPLE_QUESTIONS: [&str; 3] = [
    "Che cos'è il Kontiki?",
    "Come si fa il turno bar?",
    "Quali piatti di pasta abbiamo in menù?",
];
const CHAT_TEMPLATE: &str = "chat";

static TEMPLATES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(
            CHAT_TEMPLATE,
            include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/chat.hbs")),
        )
        .expect("Failed to register template");
    registry
});

#[derive(Serialize)]
struct PageMessage {
    role: &'static str,
    avatar: &'static str,
    html: String,
}

#[derive(Serialize)]
struct PageLink {
    prefix: &'static str,
    title: &'static str,
    url: &'static str,
}

#[derive(Serialize)]
struct PageData<'a> {
    title: &'static str,
    logo_url: &'static str,
    examples: [&'static str; 3],
    messages: Vec<PageMessage>,
    show_links: bool,
    links: Vec<PageLink>,
    error: Option<&'a str>,
}

/// Render the chat page for `session`, with an optional error shown
/// below the conversation.
pub fn render_page(session: &SessionState, error: Option<&str>) -> anyhow::Result<String> {
    let messages = session
        .messages()
        .iter()
        .map(|m| match m.role() {
            Role::User => PageMessage {
                role: "user",
                avatar: "🧑",
                html: markdown_to_html(m.content()),
            },
            Role::Assistant => PageMessage {
                role: "assistant",
                avatar: "🤖",
                html: markdown_to_html(m.content()),
            },
        })
        .collect();
    let links = session
        .last_links()
        .iter()
        .map(|l| PageLink {
            prefix: l.prefix,
            title: l.title,
            url: l.url,
        })
        .collect();

    let data = PageData {
        title: PAGE_TITLE,
        logo_url: LOGO_URL,
        examples: EXAMPLE_QUESTIONS,
        messages,
        show_links: session.last_answer().is_some(),
        links,
        error,
    };

    Ok(TEMPLATES.render(CHAT_TEMPLATE, &data)?)
}

fn is_unsafe_url(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("javascript:") || url.starts_with("vbscript:") || url.starts_with("data:")
}

/// Render chat content as HTML. Raw HTML in the content is shown as
/// text and script URLs are dropped since model output is untrusted.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Link {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) if is_unsafe_url(&dest_url) => Event::Start(Tag::Image {
            link_type,
            dest_url: CowStr::Borrowed("#"),
            title,
            id,
        }),
        other => other,
    });

    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}
