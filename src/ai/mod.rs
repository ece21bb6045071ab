mod models;
pub use models::{Embedder, LanguageModel};
pub mod prompt;
mod query_engine;
pub use query_engine::{
    EMPTY_RESPONSE, QueryEngine, QueryResponse, RetrieverQueryEngine, SharedQueryEngine,
};
