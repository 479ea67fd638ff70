//! Consumer side of the chat event channel.
//!
//! The server sends one frame per line as `data: <JSON>`. Frames arrive over
//! an arbitrary chunking of the byte stream, so a decoder buffers bytes and
//! only parses complete lines; the trailing partial line is held back until
//! the next chunk. Reconstruction is therefore independent of where the
//! transport splits the stream, including inside multi-byte characters.
//!
//! Callback contract: `on_chunk` receives each incremental fragment (the
//! caller accumulates); exactly one of `on_complete` / `on_error` fires, and
//! nothing is delivered after it. A transport end without an explicit
//! terminal frame counts as completion. Failures are reported through
//! `on_error`, never raised.

use futures::{Stream, StreamExt};
use taskflow_models::{ChatMessage, StreamEvent};

const DEFAULT_ERROR: &str = "Unknown error";

/// Incremental frame decoder for the `data: <JSON>` line protocol.
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Append a chunk and drain every complete line from the buffer.
    /// Lines without the frame prefix, and frames that fail to parse, are
    /// skipped silently (blank separators, heartbeats, noise).
    pub fn push(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end_matches(['\n', '\r']);

            if let Some(data) = line.strip_prefix("data: ")
                && let Ok(event) = serde_json::from_str::<StreamEvent>(data)
            {
                events.push(event);
            }
        }
        events
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive a raw byte stream through the decoder, dispatching callbacks.
/// Stops reading as soon as a terminal frame is seen.
pub async fn consume_stream<S, B, E, FChunk, FDone, FErr>(
    mut byte_stream: S,
    mut on_chunk: FChunk,
    on_complete: FDone,
    on_error: FErr,
) where
    S: Stream<Item = Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
    FChunk: FnMut(&str),
    FDone: FnOnce(),
    FErr: FnOnce(String),
{
    let mut decoder = FrameDecoder::new();

    while let Some(chunk) = byte_stream.next().await {
        let chunk = match chunk {
            Ok(bytes) => bytes,
            Err(e) => {
                on_error(format!("Stream error: {}", e));
                return;
            }
        };

        for event in decoder.push(chunk.as_ref()) {
            match event {
                StreamEvent::Connected => {}
                StreamEvent::Content { content } => on_chunk(&content),
                StreamEvent::Done => {
                    on_complete();
                    return;
                }
                StreamEvent::Error { error } => {
                    let message = if error.is_empty() {
                        DEFAULT_ERROR.to_string()
                    } else {
                        error
                    };
                    on_error(message);
                    return;
                }
            }
        }
    }

    // The transport ended without an explicit terminal frame.
    on_complete();
}

/// Open the event channel for one chat turn and consume it.
pub async fn stream_chat<FChunk, FDone, FErr>(
    client: &reqwest::Client,
    base_url: &str,
    messages: &[ChatMessage],
    on_chunk: FChunk,
    on_complete: FDone,
    on_error: FErr,
) where
    FChunk: FnMut(&str),
    FDone: FnOnce(),
    FErr: FnOnce(String),
{
    let response = match client
        .post(format!(
            "{}/api/chat/stream",
            base_url.trim_end_matches('/')
        ))
        .json(&serde_json::json!({ "messages": messages }))
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            on_error(format!("Request failed: {}", e));
            return;
        }
    };

    if !response.status().is_success() {
        on_error(format!("HTTP error: {}", response.status()));
        return;
    }

    consume_stream(response.bytes_stream(), on_chunk, on_complete, on_error).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::cell::Cell;

    fn frame(event: &StreamEvent) -> String {
        format!("data: {}\n\n", serde_json::to_string(event).unwrap())
    }

    fn decode_all(decoder: &mut FrameDecoder, bytes: &[u8], chunk_size: usize) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        for chunk in bytes.chunks(chunk_size) {
            events.extend(decoder.push(chunk));
        }
        events
    }

    #[test]
    fn reconstruction_is_independent_of_chunk_boundaries() {
        let frames = [
            StreamEvent::Connected,
            StreamEvent::Content {
                content: "Hel".to_string(),
            },
            StreamEvent::Content {
                // Multi-byte characters force splits inside UTF-8 sequences.
                content: "déjà vu 🌍".to_string(),
            },
            StreamEvent::Done,
        ];
        let bytes: Vec<u8> = frames.iter().map(|e| frame(e)).collect::<String>().into_bytes();

        let expected = decode_all(&mut FrameDecoder::new(), &bytes, bytes.len());
        assert_eq!(expected, frames);

        for chunk_size in [1, 2, 3, 5, 7, 11] {
            let events = decode_all(&mut FrameDecoder::new(), &bytes, chunk_size);
            assert_eq!(events, expected, "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn noise_lines_are_silently_ignored() {
        let mut decoder = FrameDecoder::new();
        let input = concat!(
            ": heartbeat\n",
            "event: ping\n",
            "data: not json at all\n",
            "data: {\"type\":\"content\",\"content\":\"ok\"}\n",
            "\n",
        );

        let events = decoder.push(input.as_bytes());
        assert_eq!(
            events,
            vec![StreamEvent::Content {
                content: "ok".to_string()
            }]
        );
    }

    #[test]
    fn partial_line_is_held_until_completed() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.push(b"data: {\"type\":\"do").is_empty());
        assert_eq!(decoder.push(b"ne\"}\n"), vec![StreamEvent::Done]);
    }

    #[tokio::test]
    async fn done_frame_stops_reading_and_completes_once() {
        let body = concat!(
            "data: {\"type\":\"connected\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\"Hel\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\"lo!\"}\n\n",
            "data: {\"type\":\"done\"}\n\n",
            "data: {\"type\":\"content\",\"content\":\"ignored\"}\n\n",
        );
        let byte_stream =
            stream::iter(vec![Ok::<_, String>(body.as_bytes().to_vec())]);

        let mut chunks = Vec::new();
        let completed = Cell::new(false);
        let failed = Cell::new(false);

        consume_stream(
            byte_stream,
            |fragment| chunks.push(fragment.to_string()),
            || completed.set(true),
            |_| failed.set(true),
        )
        .await;

        assert_eq!(chunks, vec!["Hel".to_string(), "lo!".to_string()]);
        assert!(completed.get());
        assert!(!failed.get());
    }

    #[tokio::test]
    async fn error_frame_reports_payload_or_default() {
        let body = "data: {\"type\":\"error\"}\n\n";
        let byte_stream = stream::iter(vec![Ok::<_, String>(body.as_bytes().to_vec())]);

        let completed = Cell::new(false);
        let mut reported = None;

        consume_stream(
            byte_stream,
            |_| {},
            || completed.set(true),
            |error| reported = Some(error),
        )
        .await;

        assert!(!completed.get());
        assert_eq!(reported.as_deref(), Some("Unknown error"));
    }

    #[tokio::test]
    async fn transport_end_without_terminal_frame_counts_as_completion() {
        let body = "data: {\"type\":\"content\",\"content\":\"Hel\"}\n\n";
        let byte_stream = stream::iter(vec![Ok::<_, String>(body.as_bytes().to_vec())]);

        let mut chunks = Vec::new();
        let completed = Cell::new(false);

        consume_stream(
            byte_stream,
            |fragment| chunks.push(fragment.to_string()),
            || completed.set(true),
            |_| {},
        )
        .await;

        assert_eq!(chunks, vec!["Hel".to_string()]);
        assert!(completed.get());
    }

    #[tokio::test]
    async fn transport_failure_is_reported_through_on_error() {
        let byte_stream = stream::iter(vec![
            Ok("data: {\"type\":\"connected\"}\n\n".as_bytes().to_vec()),
            Err("connection reset".to_string()),
        ]);

        let completed = Cell::new(false);
        let mut reported = None;

        consume_stream(
            byte_stream,
            |_| {},
            || completed.set(true),
            |error| reported = Some(error),
        )
        .await;

        assert!(!completed.get());
        assert_eq!(reported.as_deref(), Some("Stream error: connection reset"));
    }
}
