//! External build tool invocation.

pub mod reload;

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;

use crate::config::BuildConfig;
use crate::error::BuildError;

/// Direction of a tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Project sources → save file.
    Build,
    /// Save file → project sources.
    Decompose,
}

impl BuildMode {
    pub fn label(self) -> &'static str {
        match self {
            BuildMode::Build => "Build",
            BuildMode::Decompose => "Decompose",
        }
    }
}

/// A single requested tool run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildRequest {
    pub mode: BuildMode,
    /// Verify remote assets first and skip the build if any are unreachable.
    pub check_assets: bool,
}

impl BuildRequest {
    pub fn build(check_assets: bool) -> Self {
        Self {
            mode: BuildMode::Build,
            check_assets,
        }
    }

    pub fn decompose() -> Self {
        Self {
            mode: BuildMode::Decompose,
            check_assets: false,
        }
    }
}

/// What happened when the tool ran.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub mode: BuildMode,
    pub success: bool,
    pub elapsed: Duration,
    /// `None` when the process was killed on timeout or by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
    pub timed_out: bool,
}

/// The tool command line, minus the per-run arguments.
#[derive(Debug, Clone)]
pub struct BuildTool {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl BuildTool {
    /// Resolve the configured tool; a relative working directory is taken
    /// relative to `project_dir`.
    pub fn from_config(config: &BuildConfig, project_dir: &Path) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.as_ref().map(|dir| project_dir.join(dir)),
        }
    }
}

/// Runs the build tool as a child process with a hard wall-clock timeout.
#[derive(Debug, Clone)]
pub struct BuildInvoker {
    tool: BuildTool,
}

impl BuildInvoker {
    pub fn new(tool: BuildTool) -> Self {
        Self { tool }
    }

    pub fn tool(&self) -> &BuildTool {
        &self.tool
    }

    /// Checks that must pass before any process is spawned.
    fn preflight(&self, mode: BuildMode, artifact: &Path) -> Result<(), BuildError> {
        if let Some(dir) = &self.tool.working_dir {
            if !dir.is_dir() {
                return Err(BuildError::MissingWorkingDir(dir.clone()));
            }
        }
        if mode == BuildMode::Decompose && !artifact.exists() {
            return Err(BuildError::MissingArtifact(artifact.to_path_buf()));
        }
        Ok(())
    }

    /// Run the tool once and wait for it, killing it after `timeout`.
    ///
    /// Refuses to start when the working directory is missing, or for
    /// decompose when `artifact` does not exist. Neither a failing exit code
    /// nor a timeout is retried.
    pub async fn invoke(
        &self,
        mode: BuildMode,
        project_dir: &Path,
        artifact: &Path,
        timeout: Duration,
    ) -> Result<BuildResult, BuildError> {
        self.preflight(mode, artifact)?;

        let mut cmd = Command::new(&self.tool.program);
        cmd.args(&self.tool.args)
            .args(tool_args(mode, project_dir, artifact))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.tool.working_dir {
            cmd.current_dir(dir);
        }

        let start = Instant::now();
        let child = cmd.spawn().map_err(|source| BuildError::Spawn {
            program: self.tool.program.clone(),
            source,
        })?;
        tracing::debug!(pid = ?child.id(), mode = mode.label(), "build tool started");

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                return Ok(BuildResult {
                    mode,
                    success: false,
                    elapsed: start.elapsed(),
                    exit_code: None,
                    stderr: String::new(),
                    timed_out: true,
                });
            }
        };

        Ok(BuildResult {
            mode,
            success: output.status.success(),
            elapsed: start.elapsed(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            timed_out: false,
        })
    }
}

/// Per-run arguments understood by the mod manager tool.
pub fn tool_args(mode: BuildMode, project_dir: &Path, artifact: &Path) -> Vec<String> {
    let mut args = vec![
        format!("-moddir={}", project_dir.display()),
        format!("-modfile={}", artifact.display()),
    ];
    if mode == BuildMode::Decompose {
        args.push("-reverse".to_string());
    }
    args
}
