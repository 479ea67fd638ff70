//! Chat message and stream frame types.
//!
//! `ChatMessage` matches the OpenAI-compatible wire shape, so it can be sent
//! to the upstream completion service without a conversion layer. Messages
//! live only for the duration of a request; nothing here is persisted.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Role of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS, PartialEq, Eq)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// Image reference in a multi-part message (URL or data URI)
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a multi-part message body
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Message body: plain text, or an ordered list of text/image parts
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Flatten to display text; image parts are skipped.
    pub fn as_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Single chat message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: MessageContent::Text(content.into()),
        }
    }
}

/// One frame on the chat event channel.
///
/// Exactly one terminal frame (`done` or `error`) is sent per request, after
/// any number of `content` frames. `connected` is always first when present.
#[derive(Debug, Clone, Serialize, Deserialize, TS, PartialEq)]
#[ts(export)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Connected,
    Content {
        content: String,
    },
    Done,
    Error {
        #[serde(default)]
        error: String,
    },
}

impl StreamEvent {
    /// Terminal frames end the channel; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Done | StreamEvent::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_event_wire_format() {
        assert_eq!(
            serde_json::to_string(&StreamEvent::Connected).unwrap(),
            r#"{"type":"connected"}"#
        );
        assert_eq!(
            serde_json::to_string(&StreamEvent::Content {
                content: "Hel".to_string()
            })
            .unwrap(),
            r#"{"type":"content","content":"Hel"}"#
        );
        assert_eq!(
            serde_json::to_string(&StreamEvent::Done).unwrap(),
            r#"{"type":"done"}"#
        );
    }

    #[test]
    fn error_frame_payload_is_optional() {
        let event: StreamEvent = serde_json::from_str(r#"{"type":"error"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                error: String::new()
            }
        );
    }

    #[test]
    fn message_content_accepts_text_and_parts() {
        let plain: ChatMessage =
            serde_json::from_str(r#"{"role":"user","content":"hi"}"#).unwrap();
        assert_eq!(plain.content.as_text(), "hi");

        let parts: ChatMessage = serde_json::from_str(
            r#"{
                "role": "user",
                "content": [
                    {"type": "text", "text": "what is this?"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(parts.content.as_text(), "what is this?");
    }
}
