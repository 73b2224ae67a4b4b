//! Terminal input for the client.
//!
//! `rustyline` is synchronous, so every editor lives on a blocking thread and
//! hands lines back over channels.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::error::ClientError;

/// Answers of the join form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinForm {
    pub username: String,
    pub room_id: String,
}

/// Redisplay the prompt after printing a message
pub fn redisplay_prompt(username: &str) {
    print!("{}> ", username);
    std::io::stdout().flush().ok();
}

/// Ask for whatever the command line did not provide
///
/// Returns `Ok(None)` when the user gives up (Ctrl+C / Ctrl+D).
pub async fn prompt_join(
    username: Option<String>,
    room_id: Option<String>,
) -> Result<Option<JoinForm>, ClientError> {
    tokio::task::spawn_blocking(move || {
        let mut rl = DefaultEditor::new().map_err(|e| ClientError::Input(e.to_string()))?;

        let username = match username {
            Some(username) => username,
            None => match read_field(&mut rl, "Username: ")? {
                Some(username) => username,
                None => return Ok(None),
            },
        };
        let room_id = match room_id {
            Some(room_id) => room_id,
            None => match read_field(&mut rl, "Room ID: ")? {
                Some(room_id) => room_id,
                None => return Ok(None),
            },
        };

        Ok(Some(JoinForm { username, room_id }))
    })
    .await
    .map_err(|e| ClientError::Input(e.to_string()))?
}

fn read_field(rl: &mut DefaultEditor, prompt: &str) -> Result<Option<String>, ClientError> {
    match rl.readline(prompt) {
        Ok(line) => Ok(Some(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
        Err(e) => Err(ClientError::Input(e.to_string())),
    }
}

/// Read chat lines on a dedicated thread
///
/// The returned channel closes when the user presses Ctrl+C / Ctrl+D.
pub fn spawn_input_thread(username: String) -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", username);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str()).ok();
                    }
                    if input_tx.send(line).is_err() {
                        // screen is gone
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    input_rx
}
