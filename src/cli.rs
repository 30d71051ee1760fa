//! Keyboard REPL
//!
//! Each line is a list of whitespace-separated key tokens (`g`, `F1`, `num7`,
//! `pgup`...) pressed in order. The line editor blocks, so it runs on a
//! blocking thread and hands commands to the event loop over a channel.

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::keys::{KeyParseError, KeyPress};

const PROMPT: &str = "limit> ";

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Keys to press, in order
    Keys(Vec<KeyPress>),
    /// Reprint the status panel
    Status,
    /// Leave the session
    Quit,
    /// Line with a token that is not a key
    Invalid(KeyParseError),
}

/// Parse one REPL line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ReplCommand> {
    let trimmed = line.trim();
    match trimmed.to_lowercase().as_str() {
        "" => return None,
        "quit" | "exit" => return Some(ReplCommand::Quit),
        "status" => return Some(ReplCommand::Status),
        _ => {}
    }

    let keys = trimmed
        .split_whitespace()
        .map(str::parse::<KeyPress>)
        .collect::<Result<Vec<_>, _>>();
    Some(match keys {
        Ok(keys) => ReplCommand::Keys(keys),
        Err(e) => ReplCommand::Invalid(e),
    })
}

/// Start the line editor on a blocking thread.
///
/// The receiver closes when input ends (Ctrl+D), the user quits, the editor
/// fails to start, or the event loop drops it.
pub fn spawn_repl() -> mpsc::Receiver<ReplCommand> {
    let (tx, rx) = mpsc::channel(64);

    tokio::task::spawn_blocking(move || {
        if let Err(e) = run_editor(&tx) {
            error!("{:#}", e);
        }
    });

    rx
}

fn run_editor(tx: &mpsc::Sender<ReplCommand>) -> Result<()> {
    let mut editor = DefaultEditor::new().context("Failed to start line editor")?;

    loop {
        let command = match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                match parse_line(&line) {
                    Some(command) => command,
                    None => continue,
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => ReplCommand::Quit,
            Err(e) => {
                debug!("Line editor stopped: {}", e);
                ReplCommand::Quit
            }
        };

        let quit = command == ReplCommand::Quit;
        if tx.blocking_send(command).is_err() || quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;

    #[test]
    fn test_key_lines() {
        let command = parse_line("g F1  num7").unwrap();
        assert_eq!(
            command,
            ReplCommand::Keys(vec![
                KeyPress::from_char('g'),
                KeyPress::new(KeyCode::F1),
                KeyPress::new(KeyCode::Numpad(7)),
            ])
        );
    }

    #[test]
    fn test_meta_commands() {
        assert_eq!(parse_line("  "), None);
        assert_eq!(parse_line("quit"), Some(ReplCommand::Quit));
        assert_eq!(parse_line("EXIT"), Some(ReplCommand::Quit));
        assert_eq!(parse_line("status"), Some(ReplCommand::Status));
    }

    #[test]
    fn test_invalid_token_rejects_line() {
        assert_eq!(
            parse_line("g f12 h"),
            Some(ReplCommand::Invalid(KeyParseError::Unknown("f12".to_string())))
        );
    }
}
