//! Seams for the two remote models the query engine depends on.

use async_trait::async_trait;

use crate::core::QueryError;
use crate::mistral::Message;

/// Turns text into a vector in the same space as the persisted index.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, QueryError>;

    fn model_name(&self) -> &str;
}

/// Produces the assistant's reply from a prepared conversation.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[Message]) -> Result<String, QueryError>;

    fn model_name(&self) -> &str;
}
