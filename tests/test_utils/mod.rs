//! Test utilities for integration tests
#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use axum::{Router, body::Body};
use serde_json::{Value, json};

use rachelbot::ai::{QueryEngine, QueryResponse};
use rachelbot::api::AppState;
use rachelbot::api::app;
use rachelbot::core::{AppConfig, QueryError};
use rachelbot::index::SourceNode;

/// Answers every question from a single retrieved chunk of the bar
/// handbook without calling any model.
pub struct StubEngine;

#[async_trait]
impl QueryEngine for StubEngine {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        let Value::Object(metadata) = json!({"file_name": "Kontiki Bar.pdf"}) else {
            unreachable!()
        };
        Ok(QueryResponse {
            response_text: format!("Risposta: {}", text),
            source_nodes: vec![SourceNode {
                node_id: String::from("n1"),
                score: 0.9,
                text: String::from("Il bar apre alle 18."),
                metadata,
            }],
        })
    }
}

/// Takes its time over questions mentioning "piano" and fails the
/// ones mentioning "guasto", everything else is answered like
/// `StubEngine`.
pub struct SlowEngine;

#[async_trait]
impl QueryEngine for SlowEngine {
    async fn query(&self, text: &str) -> Result<QueryResponse, QueryError> {
        if text.contains("piano") {
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        if text.contains("guasto") {
            return Err(QueryError::Completion(String::from("service unavailable")));
        }
        StubEngine.query(text).await
    }
}

/// Fails every question as if the model provider were down.
pub struct FailingEngine;

#[async_trait]
impl QueryEngine for FailingEngine {
    async fn query(&self, _text: &str) -> Result<QueryResponse, QueryError> {
        Err(QueryError::Completion(String::from("service unavailable")))
    }
}

pub fn test_config(store_path: &str, api_hostname: &str) -> AppConfig {
    AppConfig {
        store_path: store_path.to_string(),
        mistral_api_hostname: api_hostname.to_string(),
        mistral_api_key: String::from("test-api-key"),
        llm_model: String::from("mistral-small"),
        embed_model: String::from("mistral-embed"),
        top_k: 3,
        session_ttl_secs: 3600,
    }
}

/// Creates a test application router backed by `engine`.
pub fn test_app_with_engine(engine: Arc<dyn QueryEngine>) -> Router {
    let app_state = AppState::new(engine, test_config("Store", "http://localhost:1"));
    app(Arc::new(RwLock::new(app_state)))
}

/// Creates a test application router that answers without a model.
pub fn test_app() -> Router {
    test_app_with_engine(Arc::new(StubEngine))
}

/// Path of a persisted index checked in under `tests/fixtures`.
pub fn fixture_store(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .display()
        .to_string()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
