//! Presentation sink abstraction for decoupling the session from the UI.
//!
//! The session controller emits [`ChatEvent`]s without knowing how they are
//! shown. A terminal frontend prints them; tests collect them.

use crate::turn::ChatTurn;
use std::io;

/// Display updates emitted while running a turn.
#[derive(Debug, Clone)]
pub enum ChatEvent<'a> {
    /// Append a message to the transcript view.
    Message {
        /// Configured display name of the turn's sender.
        label: &'a str,
        turn: &'a ChatTurn,
    },

    /// Replace the progress/status text.
    Status(&'a str),

    /// Clear the progress/status text.
    StatusCleared,
}

/// Trait for handling display updates from a chat session.
///
/// # Example
///
/// ```
/// use chatter_core::sink::{ChatEvent, ChatSink};
/// use std::io;
///
/// struct StatusOnly {
///     last: Option<String>,
/// }
///
/// impl ChatSink for StatusOnly {
///     fn handle(&mut self, event: ChatEvent<'_>) -> io::Result<()> {
///         match event {
///             ChatEvent::Status(text) => self.last = Some(text.to_string()),
///             ChatEvent::StatusCleared => self.last = None,
///             ChatEvent::Message { .. } => {}
///         }
///         Ok(())
///     }
/// }
///
/// let mut sink = StatusOnly { last: None };
/// sink.handle(ChatEvent::Status("Fetching from Ollama.")).unwrap();
/// assert_eq!(sink.last.as_deref(), Some("Fetching from Ollama."));
/// ```
pub trait ChatSink {
    fn handle(&mut self, event: ChatEvent<'_>) -> io::Result<()>;
}

/// Owned copy of a [`ChatEvent`], as kept by [`CollectingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectedEvent {
    Message { label: String, text: String },
    Status(String),
    StatusCleared,
}

/// A sink that records everything, for embedding and tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    /// Every event in arrival order.
    pub events: Vec<CollectedEvent>,
    /// `(label, text)` of every displayed message, in order.
    pub messages: Vec<(String, String)>,
    /// Every status text shown, in order.
    pub statuses: Vec<String>,
    /// How many times the status was cleared.
    pub clears: usize,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChatSink for CollectingSink {
    fn handle(&mut self, event: ChatEvent<'_>) -> io::Result<()> {
        let collected = match event {
            ChatEvent::Message { label, turn } => {
                self.messages
                    .push((label.to_string(), turn.text().to_string()));
                CollectedEvent::Message {
                    label: label.to_string(),
                    text: turn.text().to_string(),
                }
            }
            ChatEvent::Status(text) => {
                self.statuses.push(text.to_string());
                CollectedEvent::Status(text.to_string())
            }
            ChatEvent::StatusCleared => {
                self.clears += 1;
                CollectedEvent::StatusCleared
            }
        };
        self.events.push(collected);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_messages() {
        let mut sink = CollectingSink::new();
        let turn = ChatTurn::user("hello");
        sink.handle(ChatEvent::Message {
            label: "You",
            turn: &turn,
        })
        .unwrap();
        assert_eq!(sink.messages, vec![("You".to_string(), "hello".to_string())]);
    }

    #[test]
    fn test_collecting_sink_status() {
        let mut sink = CollectingSink::new();
        sink.handle(ChatEvent::Status("Fetching")).unwrap();
        sink.handle(ChatEvent::StatusCleared).unwrap();
        assert_eq!(sink.statuses, vec!["Fetching"]);
        assert_eq!(sink.clears, 1);
    }

    #[test]
    fn test_collecting_sink_keeps_arrival_order() {
        let mut sink = CollectingSink::new();
        let turn = ChatTurn::assistant("done");
        sink.handle(ChatEvent::Status("Fetching")).unwrap();
        sink.handle(ChatEvent::StatusCleared).unwrap();
        sink.handle(ChatEvent::Message {
            label: "Ollama",
            turn: &turn,
        })
        .unwrap();

        assert_eq!(
            sink.events,
            vec![
                CollectedEvent::Status("Fetching".to_string()),
                CollectedEvent::StatusCleared,
                CollectedEvent::Message {
                    label: "Ollama".to_string(),
                    text: "done".to_string(),
                },
            ]
        );
    }
}
