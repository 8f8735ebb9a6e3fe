use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Best-effort notification run after a successful build (e.g. a script that
/// asks the running game to reload the save). Its outcome never affects the
/// build result.
#[derive(Debug, Clone)]
pub struct Reloader {
    argv: Vec<String>,
    timeout: Duration,
}

impl Reloader {
    /// Returns `None` for an empty command line.
    pub fn new(argv: Vec<String>, timeout: Duration) -> Option<Self> {
        if argv.is_empty() {
            return None;
        }
        Some(Self { argv, timeout })
    }

    /// Run the reload command. Returns whether it exited successfully; all
    /// failures are logged and swallowed.
    pub async fn notify(&self) -> bool {
        let mut cmd = Command::new(&self.argv[0]);
        cmd.args(&self.argv[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                tracing::warn!("could not run reload command `{}`: {err}", self.argv[0]);
                return false;
            }
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) if output.status.success() => {
                tracing::info!("triggered reload");
                true
            }
            Ok(Ok(output)) => {
                tracing::warn!(
                    "reload command failed ({}): {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Ok(Err(err)) => {
                tracing::warn!("reload command I/O error: {err}");
                false
            }
            Err(_) => {
                tracing::warn!("reload command timed out after {:?}", self.timeout);
                false
            }
        }
    }
}
