//! Incremental decoder for the generate endpoint's response body.
//!
//! The server streams newline-delimited JSON objects. Each may carry a
//! `response` text delta, a `done` flag or an `error` message. Transport
//! chunks arrive with arbitrary boundaries, so the parser buffers bytes until
//! a full line is available before decoding it.

use log::{debug, warn};
use serde::Deserialize;

/// Longest unterminated fragment buffered before it is dropped as garbage.
pub const MAX_FRAGMENT_BYTES: usize = 1024 * 1024;

/// Progress of one in-flight response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    /// Concatenation of every delta decoded so far.
    pub accumulated_text: String,
    /// Raw body bytes seen, including fragments that failed to decode.
    pub bytes_received: u64,
    /// Declared body length, or 0 when the server gave none.
    pub bytes_total: u64,
    /// False once the server reported `done` or the body ended.
    pub is_active: bool,
}

/// Something the parser learned from the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A piece of generated text.
    Delta(String),
    /// Completion estimate changed (only when the total length is known).
    Progress(u8),
    /// The server reported a failure inside the stream.
    ServerError(String),
    /// The server marked the response complete.
    Done,
}

/// One line of the generate stream.
#[derive(Debug, Deserialize)]
struct GenerateChunk {
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

/// JSON-lines decoder that accumulates response text.
#[derive(Debug)]
pub struct StreamParser {
    state: StreamState,
    pending: Vec<u8>,
    /// Set while skipping the rest of an overlong fragment.
    discarding: bool,
    last_percent: Option<u8>,
}

impl StreamParser {
    /// Start a new response. `bytes_total` is the `Content-Length` hint, 0 if unknown.
    pub fn new(bytes_total: u64) -> Self {
        Self {
            state: StreamState {
                bytes_total,
                is_active: true,
                ..Default::default()
            },
            pending: Vec::new(),
            discarding: false,
            last_percent: None,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Consume the parser, returning the accumulated text.
    pub fn into_text(self) -> String {
        self.state.accumulated_text
    }

    /// Completion estimate, `None` when no total length is known.
    pub fn percent(&self) -> Option<u8> {
        if self.state.bytes_total == 0 {
            return None;
        }
        let pct = self.state.bytes_received.saturating_mul(100) / self.state.bytes_total;
        Some(pct.min(100) as u8)
    }

    /// Feed raw transport bytes with arbitrary boundaries.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.state.bytes_received += chunk.len() as u64;
        self.pending.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if std::mem::take(&mut self.discarding) {
                continue;
            }
            self.decode_line(&String::from_utf8_lossy(&line), &mut events);
        }
        if self.pending.len() > MAX_FRAGMENT_BYTES {
            warn!(
                "stream fragment exceeds {} bytes without a newline, dropping it",
                MAX_FRAGMENT_BYTES
            );
            self.pending.clear();
            self.discarding = true;
        }
        self.push_progress(&mut events);
        events
    }

    /// Feed one already-framed fragment.
    pub fn feed_line(&mut self, line: &str) -> Vec<StreamEvent> {
        self.state.bytes_received += line.len() as u64;

        let mut events = Vec::new();
        self.decode_line(line, &mut events);
        self.push_progress(&mut events);
        events
    }

    /// End of body: decode any unterminated trailing line and go inactive.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let rest = std::mem::take(&mut self.pending);
        if !rest.is_empty() && !std::mem::take(&mut self.discarding) {
            self.decode_line(&String::from_utf8_lossy(&rest), &mut events);
        }
        self.state.is_active = false;
        events
    }

    fn decode_line(&mut self, line: &str, events: &mut Vec<StreamEvent>) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let chunk: GenerateChunk = match serde_json::from_str(line) {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!("skipping undecodable stream fragment ({}): {:?}", e, line);
                return;
            }
        };

        if let Some(message) = chunk.error {
            events.push(StreamEvent::ServerError(message));
        }
        if let Some(delta) = chunk.response
            && !delta.is_empty()
        {
            self.state.accumulated_text.push_str(&delta);
            events.push(StreamEvent::Delta(delta));
        }
        if chunk.done {
            self.state.is_active = false;
            events.push(StreamEvent::Done);
        }
    }

    fn push_progress(&mut self, events: &mut Vec<StreamEvent>) {
        if let Some(pct) = self.percent()
            && self.last_percent != Some(pct)
        {
            self.last_percent = Some(pct);
            events.push(StreamEvent::Progress(pct));
        }
    }
}
