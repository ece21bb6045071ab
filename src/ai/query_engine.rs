//! Retrieval-augmented question answering over the loaded index.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use super::models::{Embedder, LanguageModel};
use super::prompt::{self, Prompt};
use crate::core::{AppConfig, IndexLoadError, QueryError};
use crate::index::{SourceNode, VectorIndex, load_index};
use crate::mistral::{Message, MistralEmbedding, MistralLlm, Role};

/// Response text used when retrieval finds nothing to answer from.
pub const EMPTY_RESPONSE: &str = "Empty Response";

#[derive(Clone, Debug, Serialize)]
pub struct QueryResponse {
    pub response_text: String,
    /// Retrieved chunks in rank order
    pub source_nodes: Vec<SourceNode>,
}

#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError>;
}

pub type SharedQueryEngine = Arc<dyn QueryEngine>;

pub struct RetrieverQueryEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LanguageModel>,
    top_k: usize,
    templates: Handlebars<'static>,
}

impl RetrieverQueryEngine {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LanguageModel>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            llm,
            top_k,
            templates: prompt::templates(),
        }
    }

    /// Load the persisted index and pair it with the configured
    /// Mistral models.
    pub fn from_config(config: &AppConfig) -> Result<Self, IndexLoadError> {
        let embedder = MistralEmbedding::new(config.embed_settings());
        let llm = MistralLlm::new(config.llm_settings());
        let index = Arc::new(load_index(Path::new(&config.store_path))?);
        tracing::info!(
            "Query engine ready: llm={} embed_model={} top_k={}",
            llm.model_name(),
            embedder.model_name(),
            config.top_k
        );

        Ok(index.as_query_engine(Arc::new(embedder), Arc::new(llm), config.top_k))
    }

    /// Answer `query` from the `top_k` most similar chunks.
    pub async fn answer(&self, query: &str, top_k: usize) -> Result<QueryResponse, QueryError> {
        let query_embedding = self.embedder.embed_query(query).await?;
        let source_nodes = self.index.retrieve(&query_embedding, top_k)?;

        if source_nodes.is_empty() {
            tracing::warn!("No nodes retrieved for query, skipping synthesis");
            return Ok(QueryResponse {
                response_text: String::from(EMPTY_RESPONSE),
                source_nodes,
            });
        }

        tracing::debug!(
            "Retrieved {} nodes: {:?}",
            source_nodes.len(),
            source_nodes
                .iter()
                .map(|n| (n.node_id.as_str(), n.score))
                .collect::<Vec<_>>()
        );

        let user_prompt = self
            .templates
            .render(
                &Prompt::QuestionAnswer.to_string(),
                &json!({
                    "context": prompt::context_str(&source_nodes),
                    "query": query,
                }),
            )
            .map_err(|e| QueryError::Completion(format!("prompt rendering failed: {}", e)))?;
        let messages = vec![
            Message::new(Role::System, prompt::SYSTEM_PROMPT),
            Message::new(Role::User, &user_prompt),
        ];
        let response_text = self.llm.complete(&messages).await?;

        Ok(QueryResponse {
            response_text,
            source_nodes,
        })
    }
}

#[async_trait]
impl QueryEngine for RetrieverQueryEngine {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        self.answer(text, self.top_k).await
    }
}

impl VectorIndex {
    pub fn as_query_engine(
        self: Arc<Self>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LanguageModel>,
        top_k: usize,
    ) -> RetrieverQueryEngine {
        RetrieverQueryEngine::new(self, embedder, llm, top_k)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::Value;

    use super::*;
    use crate::core::ModelSettings;
    use crate::index::IndexedNode;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, QueryError> {
            Ok(self.0.clone())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct RecordingLlm {
        calls: Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl LanguageModel for RecordingLlm {
        async fn complete(&self, messages: &[Message]) -> Result<String, QueryError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            Ok(String::from("Il Kontiki è uno stabilimento balneare."))
        }

        fn model_name(&self) -> &str {
            "recording"
        }
    }

    fn indexed(id: &str, file_name: &str, embedding: Vec<f32>) -> IndexedNode {
        let Value::Object(metadata) = json!({"file_name": file_name}) else {
            unreachable!()
        };
        IndexedNode {
            node_id: id.to_string(),
            text: format!("contenuto {}", id),
            metadata,
            embedding,
        }
    }

    fn test_index() -> Arc<VectorIndex> {
        Arc::new(
            VectorIndex::new(
                "kontiki",
                vec![
                    indexed("a", "Kontiki Bar.pdf", vec![1.0, 0.0, 0.0]),
                    indexed("b", "Ricettario.pdf", vec![0.0, 1.0, 0.0]),
                    indexed("c", "Info generali.pdf", vec![0.6, 0.6, 0.0]),
                    indexed("d", "frighi.pdf", vec![0.0, 0.0, 1.0]),
                ],
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn it_answers_from_the_top_k_nodes() {
        let llm = Arc::new(RecordingLlm::default());
        let engine = test_index().as_query_engine(
            Arc::new(FixedEmbedder(vec![1.0, 0.1, 0.0])),
            llm.clone(),
            3,
        );

        let resp = engine.query("Come si fa il turno bar?").await.unwrap();
        assert_eq!(resp.response_text, "Il Kontiki è uno stabilimento balneare.");
        let ids: Vec<&str> = resp.source_nodes.iter().map(|n| n.node_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);

        let calls = llm.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let messages = &calls[0];
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1].content.contains("file_name: Kontiki Bar.pdf\n\ncontenuto a"));
        assert!(messages[1].content.contains("Query: Come si fa il turno bar?\nAnswer: "));
        assert!(!messages[1].content.contains("frighi.pdf"));
    }

    #[tokio::test]
    async fn it_respects_an_explicit_top_k() {
        let engine = test_index().as_query_engine(
            Arc::new(FixedEmbedder(vec![0.0, 0.0, 1.0])),
            Arc::new(RecordingLlm::default()),
            3,
        );

        let resp = engine.answer("frigo", 1).await.unwrap();
        assert_eq!(resp.source_nodes.len(), 1);
        assert_eq!(resp.source_nodes[0].file_name(), Some("frighi.pdf"));
    }

    #[tokio::test]
    async fn it_skips_the_llm_when_nothing_is_retrieved() {
        let llm = Arc::new(RecordingLlm::default());
        let index = Arc::new(VectorIndex::new("empty", vec![]).unwrap());
        let engine = index.as_query_engine(Arc::new(FixedEmbedder(vec![1.0])), llm.clone(), 3);

        let resp = engine.query("Che cos'è il Kontiki?").await.unwrap();
        assert_eq!(resp.response_text, EMPTY_RESPONSE);
        assert!(resp.source_nodes.is_empty());
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn it_fails_on_an_embedding_of_the_wrong_size() {
        let engine = test_index().as_query_engine(
            Arc::new(FixedEmbedder(vec![1.0, 0.0])),
            Arc::new(RecordingLlm::default()),
            3,
        );

        let result = engine.query("ciao").await;
        assert!(matches!(
            result,
            Err(QueryError::DimensionMismatch { got: 2, want: 3 })
        ));
    }

    #[test]
    fn it_fails_to_build_without_a_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            store_path: dir.path().join("Store").display().to_string(),
            mistral_api_hostname: String::from("http://localhost:1"),
            mistral_api_key: String::from("test-key"),
            llm_model: String::from("mistral-small"),
            embed_model: String::from("mistral-embed"),
            top_k: 3,
            session_ttl_secs: 60,
        };

        let result = RetrieverQueryEngine::from_config(&config);
        assert!(matches!(result, Err(IndexLoadError::MissingStore(_))));
    }

    #[tokio::test]
    async fn it_answers_through_the_mistral_api() {
        let mut server = mockito::Server::new_async().await;
        let embed_mock = server
            .mock("POST", "/v1/embeddings")
            .match_body(mockito::Matcher::PartialJson(json!({
                "model": "mistral-embed",
                "input": ["Come si fa il turno bar?"]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": [{"index": 0, "embedding": [1.0, 0.0]}]}"#)
            .create_async()
            .await;
        let chat_mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::PartialJson(json!({"model": "mistral-small"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "Si apre il bar alle 18."}}]}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        crate::index::fixtures::write_store(
            dir.path(),
            &[
                ("n1", "Kontiki Bar.pdf", "Il bar apre alle 18.", vec![1.0, 0.0]),
                ("n2", "Ricettario.pdf", "Pasta.", vec![0.0, 1.0]),
            ],
        );
        let index = Arc::new(load_index(dir.path()).unwrap());
        let settings = |model: &str| ModelSettings {
            model: model.to_string(),
            api_key: String::from("test-key"),
            api_hostname: server.url(),
        };
        let engine = index.as_query_engine(
            Arc::new(MistralEmbedding::new(settings("mistral-embed"))),
            Arc::new(MistralLlm::new(settings("mistral-small"))),
            1,
        );

        let resp = engine.query("Come si fa il turno bar?").await.unwrap();

        embed_mock.assert_async().await;
        chat_mock.assert_async().await;
        assert_eq!(resp.response_text, "Si apre il bar alle 18.");
        assert_eq!(resp.source_nodes[0].file_name(), Some("Kontiki Bar.pdf"));
    }
}
