mod core;
pub use self::core::*;
mod models;
pub use models::*;
