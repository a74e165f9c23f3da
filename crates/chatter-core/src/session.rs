//! Chat session controller.
//!
//! Runs one turn at a time: shows and logs the user's message, spawns the
//! fetch task, animates the status line until the reply is complete, then
//! reformats the reply and shows and logs it.
//!
//! The fetch task only talks to the controller through a channel; the
//! controller is the only thing that touches the display.

use crate::client::{ERROR_MARKER, FetchEvent, OllamaClient};
use crate::config::ChatConfig;
use crate::format::format_reply;
use crate::progress::ProgressIndicator;
use crate::sink::{ChatEvent, ChatSink};
use crate::transcript::Transcript;
use crate::turn::ChatTurn;
use log::{info, warn};
use std::io;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Where the controller is within a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingResponse,
    Formatting,
}

/// Owns the configuration, client and session log for one conversation.
///
/// `submit` borrows the session mutably for the whole turn, so at most one
/// response can be in flight at a time.
pub struct ChatSession {
    config: ChatConfig,
    client: OllamaClient,
    transcript: Transcript,
    phase: TurnPhase,
}

impl ChatSession {
    pub fn new(config: ChatConfig, transcript: Transcript) -> io::Result<Self> {
        let client = OllamaClient::new(&config).map_err(io::Error::other)?;
        Ok(Self {
            config,
            client,
            transcript,
            phase: TurnPhase::Idle,
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Run one turn for `input`.
    ///
    /// Blank input is ignored and yields `Ok(None)`. Otherwise returns the
    /// assistant's formatted reply, which for a failed fetch is an
    /// `[Error] ...` message. Errors are only returned for display or
    /// session log failures.
    pub async fn submit<S: ChatSink>(
        &mut self,
        input: &str,
        sink: &mut S,
    ) -> io::Result<Option<ChatTurn>> {
        let prompt = input.trim();
        if prompt.is_empty() {
            return Ok(None);
        }

        let result = self.run_turn(prompt, sink).await;
        self.phase = TurnPhase::Idle;
        result.map(Some)
    }

    async fn run_turn<S: ChatSink>(&mut self, prompt: &str, sink: &mut S) -> io::Result<ChatTurn> {
        self.record(&ChatTurn::user(prompt), sink)?;

        info!("sending prompt to {} ({})", self.client.endpoint(), self.config.model);
        self.phase = TurnPhase::AwaitingResponse;
        let raw = self.await_reply(prompt, sink).await?;

        self.phase = TurnPhase::Formatting;
        sink.handle(ChatEvent::StatusCleared)?;
        let reply = ChatTurn::assistant(format_reply(&raw, self.config.wrap_width));
        info!("reply complete ({} bytes)", reply.text().len());

        self.record(&reply, sink)?;
        Ok(reply)
    }

    /// Spawn the fetch and animate the status line until it completes.
    async fn await_reply<S: ChatSink>(&self, prompt: &str, sink: &mut S) -> io::Result<String> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let client = self.client.clone();
        let owned_prompt = prompt.to_string();
        let fetch = tokio::spawn(async move { client.stream_generate(&owned_prompt, tx).await });

        let mut indicator = ProgressIndicator::new(self.config.assistant_label.as_str());
        let mut ticker = tokio::time::interval(self.config.tick_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let raw = loop {
            let status = tokio::select! {
                biased;
                event = rx.recv() => match event {
                    Some(FetchEvent::Progress(pct)) => {
                        indicator.set_percent(pct);
                        indicator.label()
                    }
                    Some(FetchEvent::Completed(text)) => break text,
                    None => break format!("{} response stream ended unexpectedly", ERROR_MARKER),
                },
                _ = ticker.tick() => indicator.advance(),
            };
            if let Err(e) = sink.handle(ChatEvent::Status(&status)) {
                fetch.abort();
                return Err(e);
            }
        };

        if let Err(e) = fetch.await {
            warn!("fetch task ended abnormally: {}", e);
        }
        Ok(raw)
    }

    /// Show a message, then append it to the session log.
    fn record<S: ChatSink>(&self, turn: &ChatTurn, sink: &mut S) -> io::Result<()> {
        let label = turn.sender().label(&self.config);
        sink.handle(ChatEvent::Message { label, turn })?;
        self.transcript.append(label, turn.text())
    }
}
