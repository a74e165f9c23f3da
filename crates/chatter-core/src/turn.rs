//! Messages exchanged in a chat session.

use crate::config::ChatConfig;

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Display label for this sender under the given config.
    pub fn label<'a>(&self, config: &'a ChatConfig) -> &'a str {
        match self {
            Sender::User => &config.user_label,
            Sender::Assistant => &config.assistant_label,
        }
    }
}

/// One message of a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    sender: Sender,
    text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Assistant,
            text: text.into(),
        }
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
