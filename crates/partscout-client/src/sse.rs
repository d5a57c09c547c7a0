//! Incremental server-sent events decoder for the search stream.
//!
//! Bytes arrive in arbitrary chunks; a frame is complete at the first blank
//! line. Only the `event` and `data` fields are used. Comment lines and `id`
//! / `retry` fields are ignored, and `\r\n` line endings are accepted.

use partscout_core::{ErrorEvent, ImagesEvent, ItemEvent, StreamEvent};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// One complete SSE frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SseFrame {
    /// The `event:` field, if present.
    pub event: Option<String>,
    /// All `data:` lines joined with `\n`.
    pub data: String,
}

impl SseFrame {
    /// Decodes the frame into a [`StreamEvent`].
    ///
    /// Returns `Ok(None)` for event names the engine does not know about.
    /// `error` frames whose data is not JSON are taken as a plain-text
    /// message. An undecodable `item` frame becomes
    /// [`StreamEvent::SkippedItem`] so the session can count it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Deserialize`] if an `images` frame carries data
    /// that does not match the expected shape.
    pub fn into_event(self) -> Result<Option<StreamEvent>, ClientError> {
        let kind = self.event.as_deref().unwrap_or("message");
        let event = match kind {
            "item" => match parse_data::<ItemEvent>(kind, &self.data) {
                Ok(item) => StreamEvent::Item(item),
                Err(err) => StreamEvent::SkippedItem {
                    reason: err.to_string(),
                },
            },
            "images" => StreamEvent::Images(parse_data::<ImagesEvent>(kind, &self.data)?),
            "error" => StreamEvent::Error(
                serde_json::from_str::<ErrorEvent>(&self.data).unwrap_or(ErrorEvent {
                    error: self.data.trim().to_owned(),
                }),
            ),
            "done" => StreamEvent::Done,
            "end" => StreamEvent::End,
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

fn parse_data<T: DeserializeOwned>(kind: &str, data: &str) -> Result<T, ClientError> {
    serde_json::from_str(data).map_err(|source| ClientError::Deserialize {
        context: format!("{kind} event"),
        source,
    })
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds a chunk and returns every frame it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches(['\n', '\r']);
            if let Some(frame) = self.process_line(line) {
                frames.push(frame);
            }
        }
        frames
    }

    /// Flushes a trailing line and a pending frame at end of body.
    pub fn finish(&mut self) -> Option<SseFrame> {
        if !self.buffer.is_empty() {
            let raw = std::mem::take(&mut self.buffer);
            let line = String::from_utf8_lossy(&raw);
            let line = line.trim_end_matches('\r').to_owned();
            if let Some(frame) = self.process_line(&line) {
                return Some(frame);
            }
        }
        self.dispatch()
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_owned()),
            "data" => self.data.push(value.to_owned()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data.is_empty() {
            return None;
        }
        let frame = SseFrame {
            event: self.event.take(),
            data: self.data.join("\n"),
        };
        self.data.clear();
        Some(frame)
    }
}

#[cfg(test)]
#[path = "sse_test.rs"]
mod tests;
