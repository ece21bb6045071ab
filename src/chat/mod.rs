pub mod links;
pub use links::{SOURCE_LINKS, SourceLink, annotate};
mod models;
pub use models::{ChatMessage, Role, SessionState, Turn};
mod session;
pub use session::{ITALIAN_ONLY_SUFFIX, augment_query, handle_message, on_user_message};
mod store;
pub use store::SessionStore;
