use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::{debug, warn};

/// Speaks phrases through an external TTS program (`espeak` by default).
pub struct Speaker {
    command: String,
    current: Option<Child>,
}

impl Speaker {
    pub fn new(command: impl Into<String>) -> Self {
        Self { command: command.into(), current: None }
    }

    /// Fire and forget. Skips the phrase while the previous one is still playing.
    pub fn say(&mut self, phrase: &str) {
        if let Some(child) = self.current.as_mut() {
            if let Ok(None) = child.try_wait() {
                debug!("speech: still speaking, skipping '{}'", phrase);
                return;
            }
        }

        match Command::new(&self.command)
            .arg(phrase)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => {
                debug!("speech: '{}'", phrase);
                self.current = Some(child);
            }
            Err(e) => {
                warn!("speech: cannot run {}: {}", self.command, e);
                self.current = None;
            }
        }
    }
}
