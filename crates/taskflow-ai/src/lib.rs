//! TaskFlow AI - Chat completion client
//!
//! Talks to an OpenAI-compatible completion service (Ollama by default) in
//! two modes: a whole-response call and a lazy token stream. Model listing
//! degrades gracefully so the API surface above it never has to.

pub mod client;
pub mod error;
pub mod mock;
pub mod ollama;

pub use client::{ChatClient, TokenStream};
pub use error::{AiError, Result};
pub use mock::{MockChatClient, MockStep};
pub use ollama::OllamaClient;
