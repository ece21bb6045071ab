pub mod public;
pub mod render;
mod router;
pub use router::router;
