//! Chat endpoints: non-streaming completion, the SSE stream relay, and
//! model listing.
//!
//! The relay forwards upstream fragments to the client in strict arrival
//! order as `data: <JSON>` frames. Request validation happens before any
//! stream is opened, so malformed input is reported with a plain HTTP 400.
//! Once the event channel is open, failures can only be reported in-band:
//! the relay then emits a single terminal `error` frame instead of `done`.

use crate::api::{ApiError, state::AppState};
use axum::{
    Json,
    extract::State,
    response::{Sse, sse::Event},
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use taskflow_ai::ChatClient;
use taskflow_models::{ChatMessage, ChatRole, StreamEvent};
use tracing::error;

/// Generic in-band error payload; upstream details stay in the server log.
const STREAM_ERROR_MESSAGE: &str = "Failed to stream response from AI model";

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: AssistantReply,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

/// Validate the request body before anything touches the upstream client.
/// Missing, non-array, empty, or malformed `messages` are all rejected here.
fn parse_messages(request: &ChatRequest) -> Result<Vec<ChatMessage>, ApiError> {
    let valid = request
        .messages
        .as_array()
        .is_some_and(|items| !items.is_empty());
    if !valid {
        return Err(ApiError::bad_request("Messages array is required"));
    }

    serde_json::from_value(request.messages.clone())
        .map_err(|_| ApiError::bad_request("Invalid chat message format"))
}

/// Logical frame sequence for one streamed chat turn: `connected`, one
/// `content` frame per upstream fragment in arrival order, then exactly one
/// terminal frame (`done`, or `error` if the upstream fails at any point).
fn relay_events(
    chat: Arc<dyn ChatClient>,
    messages: Vec<ChatMessage>,
) -> impl Stream<Item = StreamEvent> {
    async_stream::stream! {
        yield StreamEvent::Connected;

        let mut fragments = chat.complete_stream(messages);
        while let Some(fragment) = fragments.next().await {
            match fragment {
                Ok(content) => yield StreamEvent::Content { content },
                Err(e) => {
                    error!(error = %e, "Chat stream failed");
                    yield StreamEvent::Error {
                        error: STREAM_ERROR_MESSAGE.to_string(),
                    };
                    return;
                }
            }
        }

        yield StreamEvent::Done;
    }
}

// POST /api/chat/stream
pub async fn stream_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let messages = parse_messages(&request)?;

    let stream = relay_events(state.chat.clone(), messages)
        .map(|event| Ok::<_, Infallible>(Event::default().json_data(&event).unwrap()));

    Ok(Sse::new(stream))
}

// POST /api/chat
pub async fn send_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let messages = parse_messages(&request)?;

    match state.chat.complete(messages).await {
        Ok(content) => Ok(Json(ChatResponse {
            message: AssistantReply {
                role: ChatRole::Assistant,
                content,
            },
        })),
        Err(e) => {
            error!(error = %e, "Chat completion failed");
            Err(ApiError::internal("Failed to get response from AI model"))
        }
    }
}

// GET /api/chat/models
pub async fn list_models(State(state): State<AppState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.chat.list_models().await,
    })
}
