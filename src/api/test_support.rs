//! Shared fixtures for unit tests that need an `AppState`.

use async_trait::async_trait;

use crate::ai::{QueryEngine, QueryResponse};
use crate::core::{AppConfig, QueryError};

#[derive(Default)]
pub struct StubEngine;

#[async_trait]
impl QueryEngine for StubEngine {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        Ok(QueryResponse {
            response_text: format!("risposta a: {}", text),
            source_nodes: vec![],
        })
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        store_path: String::from("Store"),
        mistral_api_hostname: String::from("http://localhost:1"),
        mistral_api_key: String::from("test-key"),
        llm_model: String::from("mistral-small"),
        embed_model: String::from("mistral-embed"),
        top_k: 3,
        session_ttl_secs: 3600,
    }
}
