use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::{IndexLoadError, QueryError};

/// A chunk of a source document together with its embedding.
#[derive(Clone, Debug)]
pub struct IndexedNode {
    pub node_id: String,
    pub text: String,
    pub metadata: Map<String, Value>,
    pub embedding: Vec<f32>,
}

/// A node returned by retrieval, ranked by similarity to the query.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct SourceNode {
    pub node_id: String,
    pub score: f32,
    pub text: String,
    pub metadata: Map<String, Value>,
}

impl SourceNode {
    pub fn file_name(&self) -> Option<&str> {
        self.metadata.get("file_name").and_then(Value::as_str)
    }
}

/// In-memory vector index. Nodes are held sorted by ID so that
/// retrieval is deterministic when scores tie.
#[derive(Debug)]
pub struct VectorIndex {
    index_id: String,
    nodes: Vec<IndexedNode>,
    dimensions: Option<usize>,
}

impl VectorIndex {
    pub fn new(index_id: &str, mut nodes: Vec<IndexedNode>) -> Result<Self, IndexLoadError> {
        nodes.sort_by(|a, b| a.node_id.cmp(&b.node_id));

        let dimensions = nodes.first().map(|n| n.embedding.len());
        if let Some(want) = dimensions {
            if let Some(bad) = nodes.iter().find(|n| n.embedding.len() != want) {
                return Err(IndexLoadError::DimensionMismatch {
                    node_id: bad.node_id.clone(),
                    got: bad.embedding.len(),
                    want,
                });
            }
        }

        Ok(Self {
            index_id: index_id.to_string(),
            nodes,
            dimensions,
        })
    }

    pub fn index_id(&self) -> &str {
        &self.index_id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Return the `top_k` nodes most similar to `query_embedding`,
    /// best first.
    pub fn retrieve(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SourceNode>, QueryError> {
        let Some(want) = self.dimensions else {
            return Ok(vec![]);
        };
        if query_embedding.len() != want {
            return Err(QueryError::DimensionMismatch {
                got: query_embedding.len(),
                want,
            });
        }

        let mut scored: Vec<(f32, &IndexedNode)> = self
            .nodes
            .iter()
            .map(|node| (cosine_similarity(&node.embedding, query_embedding), node))
            .collect();
        // Stable sort keeps ID order between equal scores
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(top_k)
            .map(|(score, node)| SourceNode {
                node_id: node.node_id.clone(),
                score,
                text: node.text.clone(),
                metadata: node.metadata.clone(),
            })
            .collect())
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn node(id: &str, file_name: &str, embedding: Vec<f32>) -> IndexedNode {
        let Value::Object(metadata) = json!({"file_name": file_name}) else {
            unreachable!()
        };
        IndexedNode {
            node_id: id.to_string(),
            text: format!("text of {}", id),
            metadata,
            embedding,
        }
    }

    #[test]
    fn it_ranks_by_cosine_similarity() {
        let index = VectorIndex::new(
            "idx",
            vec![
                node("a", "Bar.docx", vec![1.0, 0.0]),
                node("b", "Ricettario.docx", vec![0.0, 1.0]),
                node("c", "generali.docx", vec![0.7, 0.7]),
            ],
        )
        .unwrap();

        let hits = index.retrieve(&[0.0, 2.0], 2).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert_eq!(hits[0].file_name(), Some("Ricettario.docx"));
    }

    #[test]
    fn it_breaks_ties_by_node_id() {
        let index = VectorIndex::new(
            "idx",
            vec![
                node("z", "one", vec![1.0, 0.0]),
                node("m", "two", vec![1.0, 0.0]),
                node("a", "three", vec![1.0, 0.0]),
            ],
        )
        .unwrap();

        let hits = index.retrieve(&[1.0, 0.0], 3).unwrap();
        let ids: Vec<&str> = hits.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "m", "z"]);
    }

    #[test]
    fn it_scores_zero_vectors_as_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn it_rejects_mismatched_query_dimensions() {
        let index = VectorIndex::new("idx", vec![node("a", "Bar", vec![1.0, 0.0])]).unwrap();
        let result = index.retrieve(&[1.0, 0.0, 0.0], 3);
        assert!(matches!(
            result,
            Err(QueryError::DimensionMismatch { got: 3, want: 2 })
        ));
    }

    #[test]
    fn it_rejects_mixed_node_dimensions() {
        let result = VectorIndex::new(
            "idx",
            vec![node("a", "x", vec![1.0, 0.0]), node("b", "y", vec![1.0])],
        );
        assert!(matches!(
            result,
            Err(IndexLoadError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn it_returns_nothing_from_an_empty_index() {
        let index = VectorIndex::new("idx", vec![]).unwrap();
        assert!(index.is_empty());
        assert!(index.retrieve(&[1.0], 3).unwrap().is_empty());
    }
}
