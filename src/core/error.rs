//! Error taxonomy for the assistant.
//!
//! Each stage of the pipeline has its own error type so callers can
//! tell a broken deployment (config, index) apart from a failed
//! question (query) and report the latter inline without losing the
//! conversation.

use std::path::PathBuf;

use thiserror::Error;

/// Problems reading configuration at process start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing Mistral API key: set MISTRAL_API_KEY or `mistral_key` in the secrets file")]
    MissingCredential,

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    #[error("unable to read secrets file {path}: {reason}")]
    Secrets { path: PathBuf, reason: String },
}

/// Problems opening the persisted index.
#[derive(Debug, Error)]
pub enum IndexLoadError {
    #[error("index store directory not found: {0}")]
    MissingStore(PathBuf),

    #[error("index store is missing {0}")]
    MissingFile(PathBuf),

    #[error("failed reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed index file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected exactly one index in the store, found {0}")]
    IndexCount(usize),

    #[error("node {node_id} is listed in the index but has no {missing}")]
    MissingNode {
        node_id: String,
        missing: &'static str,
    },

    #[error("embedding size mismatch for node {node_id}: got {got}, want {want}")]
    DimensionMismatch {
        node_id: String,
        got: usize,
        want: usize,
    },
}

/// Problems answering a single question.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("embedding request failed: {0}")]
    Embedding(String),

    #[error("answer generation failed: {0}")]
    Completion(String),

    #[error("query embedding has {got} dimensions but the index uses {want}")]
    DimensionMismatch { got: usize, want: usize },
}
