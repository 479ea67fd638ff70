//! Chat client trait and stream types

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::error::Result;
use taskflow_models::ChatMessage;

/// Lazy, finite, non-restartable sequence of text fragments. A mid-stream
/// failure surfaces as a single `Err` item; nothing follows it.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Chat completion client
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Get the configured model name
    fn model(&self) -> &str;

    /// Complete a conversation and return the whole assistant reply
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;

    /// Complete a conversation as a stream of text fragments
    fn complete_stream(&self, messages: Vec<ChatMessage>) -> TokenStream;

    /// List available model identifiers.
    ///
    /// Never fails: implementations fall back to the configured model when
    /// the upstream cannot be queried.
    async fn list_models(&self) -> Vec<String>;
}
