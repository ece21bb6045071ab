use anyhow::{Context, Result, bail};
use serde_json::json;

use crate::ai::{QueryEngine, RetrieverQueryEngine};
use crate::api::public::chat::LinkResponse;
use crate::chat::{annotate, augment_query};
use crate::core::AppConfig;

pub async fn run(term: String, config: AppConfig) -> Result<()> {
    if term.trim().is_empty() {
        bail!("Missing value for \"--term\"");
    }
    super::init_cli_tracing();

    let engine = RetrieverQueryEngine::from_config(&config)
        .with_context(|| format!("Failed to load index from {}", config.store_path))?;
    let resp = engine.query(&augment_query(&term)).await?;
    let links: Vec<LinkResponse> = annotate(&resp.source_nodes)
        .iter()
        .map(LinkResponse::from)
        .collect();

    println!(
        "{}",
        json!({
            "query": term,
            "answer": resp.response_text,
            "links": links,
            "sources": resp.source_nodes,
        })
    );
    Ok(())
}
