//! Model handles backed by the Mistral API.

use async_trait::async_trait;

use super::core::{Message, completion, completion_content, embeddings};
use crate::ai::{Embedder, LanguageModel};
use crate::core::{ModelSettings, QueryError};

#[derive(Clone, Debug)]
pub struct MistralLlm {
    settings: ModelSettings,
}

impl MistralLlm {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl LanguageModel for MistralLlm {
    async fn complete(&self, messages: &[Message]) -> Result<String, QueryError> {
        let ModelSettings {
            model,
            api_key,
            api_hostname,
        } = &self.settings;

        let resp = completion(messages, api_hostname, api_key, model)
            .await
            .map_err(|e| QueryError::Completion(e.to_string()))?;
        completion_content(&resp).map_err(|e| QueryError::Completion(e.to_string()))
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}

#[derive(Clone, Debug)]
pub struct MistralEmbedding {
    settings: ModelSettings,
}

impl MistralEmbedding {
    pub fn new(settings: ModelSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Embedder for MistralEmbedding {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, QueryError> {
        let ModelSettings {
            model,
            api_key,
            api_hostname,
        } = &self.settings;

        embeddings(&[text], api_hostname, api_key, model)
            .await
            .map_err(|e| QueryError::Embedding(e.to_string()))?
            .pop()
            .ok_or_else(|| QueryError::Embedding(String::from("empty embedding response")))
    }

    fn model_name(&self) -> &str {
        &self.settings.model
    }
}
