//! CLI argument parsing with clap.

use chatter_core::ConfigOverride;
use clap::Parser;
use std::path::PathBuf;

/// chatter - chat with a local Ollama model from the terminal
#[derive(Parser, Debug)]
#[command(
    name = "chatter",
    version,
    about = "Chat with a local Ollama model from the terminal",
    after_help = CLI_AFTER_HELP
)]
pub struct Cli {
    /// Send this prompt, print the reply and exit (interactive when omitted)
    #[arg(value_name = "PROMPT")]
    pub prompt: Vec<String>,

    /// Model name to request
    #[arg(short = 'm', long = "model", value_name = "NAME")]
    pub model: Option<String>,

    /// Generate endpoint URL
    #[arg(long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Column width for reply wrapping
    #[arg(short = 'w', long = "width", value_name = "COLUMNS")]
    pub width: Option<usize>,

    /// Directory for session logs
    #[arg(long = "log-dir", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Config file (default: $CHATTER_HOME/config.toml or ~/.chatter/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

const CLI_AFTER_HELP: &str = "\
Interactive mode reads one message per line. Type /quit or /exit (or send
EOF) to leave. Every session is logged to <log-dir>/chat_<timestamp>.txt.";

impl Cli {
    /// Config values given on the command line.
    pub fn overrides(&self) -> ConfigOverride {
        ConfigOverride {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            wrap_width: self.width,
            log_dir: self.log_dir.clone(),
        }
    }

    /// The one-shot prompt, if any words were given.
    pub fn one_shot_prompt(&self) -> Option<String> {
        if self.prompt.is_empty() {
            None
        } else {
            Some(self.prompt.join(" "))
        }
    }
}

/// Whether an interactive input line asks to leave.
pub fn is_quit_command(line: &str) -> bool {
    matches!(line.trim(), "/quit" | "/exit")
}
