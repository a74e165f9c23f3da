//! Terminal presentation of a chat session.
//!
//! Messages go to stdout as `<label>: <text>` followed by a blank line. The
//! status line is drawn on stderr and rewritten in place, and only when
//! stderr is a terminal so piped output stays clean.

use chatter_core::sink::{ChatEvent, ChatSink};
use crossterm::cursor::MoveToColumn;
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stderr, Stdout, Write};

/// CLI sink writing transcript text to `out` and the status line to `status`.
pub struct TerminalSink<O: Write, E: Write> {
    out: O,
    status: Option<E>,
    status_visible: bool,
}

impl TerminalSink<Stdout, Stderr> {
    /// Sink on the process's stdout/stderr.
    pub fn stdio(show_status: bool) -> Self {
        Self::new(io::stdout(), show_status.then(io::stderr))
    }
}

impl<O: Write, E: Write> TerminalSink<O, E> {
    /// `status` of `None` suppresses the status line entirely.
    pub fn new(out: O, status: Option<E>) -> Self {
        Self {
            out,
            status,
            status_visible: false,
        }
    }

    fn clear_status(&mut self) -> io::Result<()> {
        if let Some(status) = &mut self.status
            && self.status_visible
        {
            execute!(status, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        }
        self.status_visible = false;
        Ok(())
    }
}

impl<O: Write, E: Write> ChatSink for TerminalSink<O, E> {
    fn handle(&mut self, event: ChatEvent<'_>) -> io::Result<()> {
        match event {
            ChatEvent::Message { label, turn } => {
                self.clear_status()?;
                write!(self.out, "{}: {}\n\n", label, turn.text())?;
                self.out.flush()?;
            }
            ChatEvent::Status(text) => {
                if let Some(status) = &mut self.status {
                    execute!(
                        status,
                        MoveToColumn(0),
                        Clear(ClearType::CurrentLine),
                        Print(text)
                    )?;
                    self.status_visible = true;
                }
            }
            ChatEvent::StatusCleared => self.clear_status()?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatter_core::ChatTurn;

    #[test]
    fn test_message_format() {
        let mut sink: TerminalSink<Vec<u8>, Vec<u8>> = TerminalSink::new(Vec::new(), None);
        let turn = ChatTurn::assistant("Hello world");
        sink.handle(ChatEvent::Message {
            label: "Ollama",
            turn: &turn,
        })
        .unwrap();
        assert_eq!(String::from_utf8(sink.out).unwrap(), "Ollama: Hello world\n\n");
    }

    #[test]
    fn test_status_suppressed_without_terminal() {
        let mut sink: TerminalSink<Vec<u8>, Vec<u8>> = TerminalSink::new(Vec::new(), None);
        sink.handle(ChatEvent::Status("Fetching from Ollama.")).unwrap();
        sink.handle(ChatEvent::StatusCleared).unwrap();
        assert!(sink.out.is_empty());
        assert!(!sink.status_visible);
    }

    #[test]
    fn test_status_written_to_status_stream() {
        let mut sink: TerminalSink<Vec<u8>, Vec<u8>> =
            TerminalSink::new(Vec::new(), Some(Vec::new()));
        sink.handle(ChatEvent::Status("Fetching from Ollama..")).unwrap();
        assert!(sink.status_visible);

        let drawn = String::from_utf8(sink.status.clone().unwrap()).unwrap();
        assert!(drawn.ends_with("Fetching from Ollama.."));
        assert!(sink.out.is_empty());

        sink.handle(ChatEvent::StatusCleared).unwrap();
        assert!(!sink.status_visible);
    }

    #[test]
    fn test_message_clears_visible_status() {
        let mut sink: TerminalSink<Vec<u8>, Vec<u8>> =
            TerminalSink::new(Vec::new(), Some(Vec::new()));
        sink.handle(ChatEvent::Status("Fetching from Ollama")).unwrap();
        let before = sink.status.as_ref().unwrap().len();

        let turn = ChatTurn::user("hi");
        sink.handle(ChatEvent::Message {
            label: "You",
            turn: &turn,
        })
        .unwrap();

        assert!(!sink.status_visible);
        assert!(sink.status.as_ref().unwrap().len() > before);
        assert_eq!(String::from_utf8(sink.out).unwrap(), "You: hi\n\n");
    }
}
