use std::io::BufRead;

use tokio::sync::mpsc as tokio_mpsc;

/// Manual commands available while watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `b`: build now, bypassing the debounce window.
    Build,
    /// `a`: run asset verification only.
    CheckAssets,
    /// `d`: extract the save file back into project sources.
    Decompose,
    /// `q`: stop watching.
    Quit,
}

impl Command {
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'b' => Some(Command::Build),
            'a' => Some(Command::CheckAssets),
            'd' => Some(Command::Decompose),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Every recognised key in `line`, in order. Unknown keys are dropped.
pub fn parse_line(line: &str) -> Vec<Command> {
    line.chars()
        .filter(|c| !c.is_whitespace())
        .filter_map(Command::from_key)
        .collect()
}

/// Read commands from stdin on a detached thread.
///
/// A plain thread instead of `spawn_blocking`: a blocked stdin read must not
/// hold up runtime shutdown. End of input closes the channel; the watcher
/// keeps running.
pub fn spawn_stdin_commands() -> tokio_mpsc::Receiver<Command> {
    let (tx, rx) = tokio_mpsc::channel(16);
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for command in parse_line(&line) {
                if tx.blocking_send(command).is_err() {
                    return;
                }
            }
        }
        tracing::debug!("stdin closed, manual commands disabled");
    });
    rx
}
