//! Deterministic mock chat client for relay and consumer tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::client::{ChatClient, TokenStream};
use crate::error::{AiError, Result};
use taskflow_models::{ChatMessage, ChatRole};

/// Scripted reply for one completion call.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Reply with a single block of text.
    Text(String),
    /// Stream the given fragments, then finish normally.
    Fragments(Vec<String>),
    /// Stream the given fragments, then fail mid-stream.
    FailAfter {
        fragments: Vec<String>,
        error: String,
    },
    /// Fail immediately.
    Error(String),
}

impl MockStep {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text(content.into())
    }

    pub fn fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(fragments.into_iter().map(Into::into).collect())
    }

    pub fn fail_after<I, S>(fragments: I, error: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::FailAfter {
            fragments: fragments.into_iter().map(Into::into).collect(),
            error: error.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

/// A deterministic chat client driven by scripted steps.
///
/// When the script runs dry it echoes the last user message, so tests that
/// don't care about content still get a reply.
#[derive(Debug, Clone, Default)]
pub struct MockChatClient {
    model: String,
    script: Arc<Mutex<VecDeque<MockStep>>>,
}

impl MockChatClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    pub fn from_steps(model: impl Into<String>, steps: Vec<MockStep>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
        }
    }

    pub async fn push_step(&self, step: MockStep) {
        self.script.lock().await.push_back(step);
    }

    async fn next_step(&self) -> Option<MockStep> {
        self.script.lock().await.pop_front()
    }

    fn echo(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .rev()
            .find(|msg| msg.role == ChatRole::User)
            .map(|msg| format!("mock-echo: {}", msg.content.as_text()))
            .unwrap_or_else(|| "mock-ok".to_string())
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String> {
        match self.next_step().await {
            None => Ok(Self::echo(&messages)),
            Some(MockStep::Text(text)) => Ok(text),
            Some(MockStep::Fragments(fragments)) => Ok(fragments.concat()),
            Some(MockStep::FailAfter { error, .. }) | Some(MockStep::Error(error)) => {
                Err(AiError::Llm(error))
            }
        }
    }

    fn complete_stream(&self, messages: Vec<ChatMessage>) -> TokenStream {
        let client = self.clone();
        Box::pin(stream! {
            match client.next_step().await {
                None => yield Ok(MockChatClient::echo(&messages)),
                Some(MockStep::Text(text)) => yield Ok(text),
                Some(MockStep::Fragments(fragments)) => {
                    for fragment in fragments {
                        yield Ok(fragment);
                    }
                }
                Some(MockStep::FailAfter { fragments, error }) => {
                    for fragment in fragments {
                        yield Ok(fragment);
                    }
                    yield Err(AiError::Llm(error));
                }
                Some(MockStep::Error(error)) => yield Err(AiError::Llm(error)),
            }
        })
    }

    async fn list_models(&self) -> Vec<String> {
        vec![self.model.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn scripted_fragments_stream_in_order_then_fail() {
        let client = MockChatClient::from_steps(
            "mock-model",
            vec![MockStep::fail_after(["Hel", "lo!"], "connection reset")],
        );

        let mut stream = client.complete_stream(vec![ChatMessage::user("hi")]);
        assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
        assert_eq!(stream.next().await.unwrap().unwrap(), "lo!");
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn empty_script_echoes_the_last_user_message() {
        let client = MockChatClient::new("mock-model");
        let reply = client
            .complete(vec![ChatMessage::user("ping")])
            .await
            .unwrap();
        assert_eq!(reply, "mock-echo: ping");
    }
}
