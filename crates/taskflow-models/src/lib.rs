//! TaskFlow Models - Shared domain and wire types
//!
//! Types used by the storage layer, the HTTP API, and the terminal client.
//! TypeScript bindings are exported with ts-rs for the web frontend.

pub mod category;
pub mod chat;
pub mod todo;

pub use category::Category;
pub use chat::{ChatMessage, ChatRole, ContentPart, ImageUrl, MessageContent, StreamEvent};
pub use todo::{Todo, TodoStatus};
