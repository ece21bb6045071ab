mod store;
pub use store::{DOCSTORE_FILE, INDEX_STORE_FILE, VECTOR_STORE_FILE, load_index};
mod vector;
pub use vector::{IndexedNode, SourceNode, VectorIndex};

#[cfg(test)]
pub(crate) use store::fixtures;
