//! Loading an index persisted by the document indexing pipeline.
//!
//! The store directory holds three JSON files: the document store
//! with node text and metadata, the vector store with one embedding
//! per node, and the index store listing which nodes belong to the
//! index.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::vector::{IndexedNode, VectorIndex};
use crate::core::IndexLoadError;

pub const DOCSTORE_FILE: &str = "docstore.json";
pub const VECTOR_STORE_FILE: &str = "default__vector_store.json";
pub const INDEX_STORE_FILE: &str = "index_store.json";

#[derive(Deserialize)]
struct DocStoreFile {
    #[serde(rename = "docstore/data", default)]
    data: HashMap<String, DocStoreEntry>,
}

#[derive(Deserialize)]
struct DocStoreEntry {
    #[serde(rename = "__data__")]
    data: NodeData,
}

#[derive(Deserialize)]
struct NodeData {
    #[serde(default)]
    text: String,
    #[serde(default)]
    metadata: Map<String, Value>,
}

#[derive(Deserialize)]
struct VectorStoreFile {
    #[serde(default)]
    embedding_dict: HashMap<String, Vec<f32>>,
}

#[derive(Deserialize)]
struct IndexStoreFile {
    #[serde(rename = "index_store/data", default)]
    data: HashMap<String, IndexStoreEntry>,
}

#[derive(Deserialize)]
struct IndexStoreEntry {
    #[serde(rename = "__data__")]
    data: IndexData,
}

// The index struct is usually written as a JSON encoded string
// inside the JSON document, older stores inline it as an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum IndexData {
    Encoded(String),
    Inline(IndexStruct),
}

#[derive(Deserialize)]
struct IndexStruct {
    index_id: String,
    // Maps vector ID to node ID
    #[serde(default)]
    nodes_dict: HashMap<String, String>,
}

fn read_json<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<T, IndexLoadError> {
    let path = dir.join(file_name);
    if !path.is_file() {
        return Err(IndexLoadError::MissingFile(path));
    }
    let contents = fs::read_to_string(&path).map_err(|source| IndexLoadError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| IndexLoadError::Malformed { path, source })
}

/// Open the persisted index in `persist_dir` and rebuild it in
/// memory.
pub fn load_index(persist_dir: &Path) -> Result<VectorIndex, IndexLoadError> {
    if !persist_dir.is_dir() {
        return Err(IndexLoadError::MissingStore(persist_dir.to_path_buf()));
    }

    let index_store: IndexStoreFile = read_json(persist_dir, INDEX_STORE_FILE)?;
    let mut docstore: DocStoreFile = read_json(persist_dir, DOCSTORE_FILE)?;
    let mut vector_store: VectorStoreFile = read_json(persist_dir, VECTOR_STORE_FILE)?;

    if index_store.data.len() != 1 {
        return Err(IndexLoadError::IndexCount(index_store.data.len()));
    }
    let Some(entry) = index_store.data.into_values().next() else {
        return Err(IndexLoadError::IndexCount(0));
    };
    let index_struct = match entry.data {
        IndexData::Inline(index_struct) => index_struct,
        IndexData::Encoded(raw) => {
            serde_json::from_str(&raw).map_err(|source| IndexLoadError::Malformed {
                path: persist_dir.join(INDEX_STORE_FILE),
                source,
            })?
        }
    };

    let mut nodes = Vec::with_capacity(index_struct.nodes_dict.len());
    for (vector_id, node_id) in index_struct.nodes_dict {
        let embedding = vector_store
            .embedding_dict
            .remove(&vector_id)
            .ok_or_else(|| IndexLoadError::MissingNode {
                node_id: node_id.clone(),
                missing: "embedding",
            })?;
        let doc = docstore
            .data
            .remove(&node_id)
            .ok_or_else(|| IndexLoadError::MissingNode {
                node_id: node_id.clone(),
                missing: "document",
            })?;
        nodes.push(IndexedNode {
            node_id,
            text: doc.data.text,
            metadata: doc.data.metadata,
            embedding,
        });
    }

    let index = VectorIndex::new(&index_struct.index_id, nodes)?;
    tracing::info!(
        "Loaded index {} with {} nodes from {}",
        index.index_id(),
        index.len(),
        persist_dir.display()
    );

    Ok(index)
}
