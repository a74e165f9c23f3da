// chatter-cli: terminal frontend for chatter
// Argument parsing, input loop, status line

mod cli;
mod sink;

use chatter_core::{ChatConfig, ChatSession, ChatSink, Transcript};
use clap::Parser;
use cli::{Cli, is_quit_command};
use log::debug;
use sink::TerminalSink;
use std::io::{self, IsTerminal, Write};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Route `log` output to stderr. `RUST_LOG` wins over the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Read lines from stdin and run one turn per line until EOF or a quit command.
///
/// Lines typed while a reply is streaming wait in the input buffer and are
/// sent, in order, once the current turn finishes.
async fn run_interactive<S: ChatSink>(
    session: &mut ChatSession,
    sink: &mut S,
) -> io::Result<()> {
    let show_prompt = io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        if show_prompt {
            eprint!("> ");
            io::stderr().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_quit_command(&line) {
            break;
        }
        session.submit(&line, sink).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ChatConfig::load(cli.config.as_deref())?.merged_with(&cli.overrides());
    let transcript = Transcript::start(&config.log_dir)?;
    debug!("session log: {}", transcript.path().display());

    let mut session = ChatSession::new(config, transcript)?;
    let mut sink = TerminalSink::stdio(io::stderr().is_terminal());

    match cli.one_shot_prompt() {
        Some(prompt) => {
            session.submit(&prompt, &mut sink).await?;
            Ok(())
        }
        None => run_interactive(&mut session, &mut sink).await,
    }
}
