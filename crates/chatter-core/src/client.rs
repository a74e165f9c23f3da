//! HTTP client for the local inference server.
//!
//! Runs inside the fetch task: posts the prompt, drives a [`StreamParser`]
//! over the response body and reports back to the session over a channel.
//! Transport failures never escape this module; they are folded into an
//! `[Error] ...` reply so the user sees them like any other answer.

use crate::config::ChatConfig;
use crate::stream::{StreamEvent, StreamParser};
use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::header::CONTENT_LENGTH;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Prefix of the reply text produced for a failed fetch.
pub const ERROR_MARKER: &str = "[Error]";

/// Messages from the fetch task to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// Completion estimate, sent only when the body length is known.
    Progress(u8),
    /// Final reply text (or the error marker). Sent exactly once, last.
    Completed(String),
}

/// Why a fetch failed.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", with_causes(.0))]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("server error: {0}")]
    Server(String),
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// `err` followed by each of its sources, joined with `": "`.
fn with_causes(err: &reqwest::Error) -> String {
    let mut text = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    text
}

/// Render a failure the way it is shown and logged.
pub fn error_reply(err: &ClientError) -> String {
    format!("{} {}", ERROR_MARKER, err)
}

/// Client for the `/api/generate` streaming endpoint.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    pub fn new(config: &ChatConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a reply for `prompt`, reporting through `events`.
    ///
    /// Always finishes by sending exactly one [`FetchEvent::Completed`].
    pub async fn stream_generate(&self, prompt: &str, events: UnboundedSender<FetchEvent>) {
        let text = match self.try_stream(prompt, &events).await {
            Ok(text) => text,
            Err(e) => {
                warn!("fetch from {} failed: {}", self.endpoint, e);
                error_reply(&e)
            }
        };
        // the receiver only goes away if the session itself was dropped
        let _ = events.send(FetchEvent::Completed(text));
    }

    async fn try_stream(
        &self,
        prompt: &str,
        events: &UnboundedSender<FetchEvent>,
    ) -> Result<String, ClientError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
        };
        let response = self.http.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&raw)
                .map(|b| b.error)
                .unwrap_or_else(|_| raw.trim().to_string());
            return Err(ClientError::Status { status, message });
        }

        let bytes_total = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(0);
        debug!("streaming reply, content length hint {}", bytes_total);

        let mut parser = StreamParser::new(bytes_total);
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            for event in parser.feed(&chunk) {
                forward(event, events)?;
            }
        }
        for event in parser.finish() {
            forward(event, events)?;
        }

        Ok(parser.into_text())
    }
}

fn forward(event: StreamEvent, events: &UnboundedSender<FetchEvent>) -> Result<(), ClientError> {
    match event {
        StreamEvent::Progress(pct) => {
            // a dropped session just stops listening; the fetch still finishes
            events.send(FetchEvent::Progress(pct)).ok();
        }
        StreamEvent::ServerError(message) => return Err(ClientError::Server(message)),
        StreamEvent::Delta(_) | StreamEvent::Done => {}
    }
    Ok(())
}
