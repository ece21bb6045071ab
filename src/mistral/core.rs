use std::time::Duration;

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Upper bound on a single provider call, the only time limit a
/// question is subject to.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

// Mistral exposes the same request/response shape as OpenAI's chat
// completions endpoint so only the hostname differs between them.
pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Value, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(REQUEST_TIMEOUT)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(response)
}

/// Pull the assistant's reply out of a completion response.
pub fn completion_content(resp: &Value) -> Result<String, Error> {
    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

/// Embed each of `inputs`, returning vectors in the same order as
/// the inputs regardless of the order the API lists them in.
pub async fn embeddings(
    inputs: &[&str],
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<Vec<Vec<f32>>, Error> {
    let payload = json!({
        "model": model,
        "input": inputs,
    });
    let url = format!("{}/v1/embeddings", api_hostname.trim_end_matches("/"));
    let response: EmbeddingResponse = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(REQUEST_TIMEOUT)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let mut data = response.data;
    if data.len() != inputs.len() {
        return Err(anyhow!(
            "Expected {} embeddings, received {}",
            inputs.len(),
            data.len()
        ));
    }
    data.sort_by_key(|d| d.index);

    Ok(data.into_iter().map(|d| d.embedding).collect())
}
