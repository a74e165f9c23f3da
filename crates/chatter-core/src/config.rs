//! Configuration for a chat session.
//!
//! All settings live in one [`ChatConfig`] value that is built once at
//! startup and handed to the session controller. The file at
//! `~/.chatter/config.toml` (or `$CHATTER_HOME/config.toml`) is optional;
//! every field has a default and command-line flags override file values.

use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Apply `Option`-field overrides from a source struct to a target struct.
///
/// For each field name, if `$src.field` is `Some(v)`, sets `$dst.field = v`.
macro_rules! apply_option_overrides {
    ($src:expr, $dst:expr, $($field:ident),+ $(,)?) => {
        $(
            if let Some(ref v) = $src.$field {
                $dst.$field = v.clone();
            }
        )+
    };
}

// ============================================================================
// Defaults
// ============================================================================

/// Default values for every configuration field.
pub struct ConfigDefaults;

impl ConfigDefaults {
    pub const ENDPOINT: &'static str = "http://localhost:11434/api/generate";
    pub const MODEL: &'static str = "llama3.1:8b";
    pub const WRAP_WIDTH: usize = 70;
    pub const LOG_DIR: &'static str = "logs";
    pub const TICK_INTERVAL_MS: u64 = 400;
    pub const USER_LABEL: &'static str = "You";
    pub const ASSISTANT_LABEL: &'static str = "Ollama";
}

// Thin wrappers for serde's #[serde(default = "...")] requirement
fn default_endpoint() -> String {
    ConfigDefaults::ENDPOINT.to_string()
}
fn default_model() -> String {
    ConfigDefaults::MODEL.to_string()
}
fn default_wrap_width() -> usize {
    ConfigDefaults::WRAP_WIDTH
}
fn default_log_dir() -> PathBuf {
    PathBuf::from(ConfigDefaults::LOG_DIR)
}
fn default_tick_interval_ms() -> u64 {
    ConfigDefaults::TICK_INTERVAL_MS
}
fn default_user_label() -> String {
    ConfigDefaults::USER_LABEL.to_string()
}
fn default_assistant_label() -> String {
    ConfigDefaults::ASSISTANT_LABEL.to_string()
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Settings for one chat process, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Full URL of the generate endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model name sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Column width used when reflowing replies.
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,
    /// Directory holding the per-process session logs.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Period of the progress animation.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Label written before user messages.
    #[serde(default = "default_user_label")]
    pub user_label: String,
    /// Label written before assistant replies.
    #[serde(default = "default_assistant_label")]
    pub assistant_label: String,
    /// Whole-request timeout. Unset means the transport defaults apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_seconds: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            wrap_width: default_wrap_width(),
            log_dir: default_log_dir(),
            tick_interval_ms: default_tick_interval_ms(),
            user_label: default_user_label(),
            assistant_label: default_assistant_label(),
            request_timeout_seconds: None,
        }
    }
}

/// Per-invocation overrides (all fields optional), typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverride {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub wrap_width: Option<usize>,
    pub log_dir: Option<PathBuf>,
}

impl ChatConfig {
    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> io::Result<Self> {
        toml::from_str(content).map_err(|e| {
            io::Error::new(
                ErrorKind::InvalidData,
                format!("Failed to parse config: {}", e),
            )
        })
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load using the standard location.
    ///
    /// Precedence for the file:
    /// 1. `explicit` path (from `--config`)
    /// 2. `CHATTER_HOME` environment variable + `/config.toml`
    /// 3. `~/.chatter/config.toml`
    pub fn load(explicit: Option<&Path>) -> io::Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(io::Error::new(
                        ErrorKind::NotFound,
                        format!("Config file not found: {}", path.display()),
                    ));
                }
                path.to_path_buf()
            }
            None => chatter_home()?.join("config.toml"),
        };
        Self::load_from(&path)
    }

    /// Return a copy with any `Some` override applied.
    pub fn merged_with(&self, overrides: &ConfigOverride) -> Self {
        let mut merged = self.clone();
        apply_option_overrides!(overrides, merged, endpoint, model, wrap_width, log_dir);
        merged
    }

    pub fn tick_interval(&self) -> Duration {
        // a zero period would make tokio's interval panic
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}

/// Resolve the chatter home directory (`CHATTER_HOME` or `~/.chatter`).
pub fn chatter_home() -> io::Result<PathBuf> {
    if let Ok(home) = std::env::var("CHATTER_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home =
        home_dir().ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Home directory not found"))?;
    Ok(home.join(".chatter"))
}
