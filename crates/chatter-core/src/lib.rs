//! chatter-core: streaming chat client library for a local inference server.
//!
//! Sends prompts to an Ollama-compatible `/api/generate` endpoint, decodes
//! the streamed reply, reflows it for display and keeps a plain-text log of
//! the conversation.
//!
//! # Quick Start
//!
//! ```no_run
//! use chatter_core::{ChatConfig, ChatSession, CollectingSink, Transcript};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ChatConfig::load(None)?;
//!     let transcript = Transcript::start(&config.log_dir)?;
//!     let mut session = ChatSession::new(config, transcript)?;
//!     let mut sink = CollectingSink::new();
//!
//!     if let Some(reply) = session.submit("Hello!", &mut sink).await? {
//!         println!("{}", reply.text());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod format;
pub mod progress;
pub mod session;
pub mod sink;
pub mod stream;
pub mod transcript;
pub mod turn;

pub use client::{ClientError, ERROR_MARKER, FetchEvent, OllamaClient};
pub use config::{ChatConfig, ConfigOverride};
pub use format::format_reply;
pub use session::{ChatSession, TurnPhase};
pub use sink::{ChatEvent, ChatSink, CollectedEvent, CollectingSink};
pub use stream::{StreamEvent, StreamParser, StreamState};
pub use transcript::Transcript;
pub use turn::{ChatTurn, Sender};
