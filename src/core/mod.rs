pub mod config;
pub mod error;

pub use config::{AppConfig, ModelSettings};
pub use error::{ConfigError, IndexLoadError, QueryError};
