use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc as tokio_mpsc;

use crate::assets::AssetVerifier;
use crate::build::reload::Reloader;
use crate::build::{BuildInvoker, BuildMode, BuildRequest, BuildResult, BuildTool};
use crate::config::ModWatchConfig;
use crate::console::Command;
use crate::error::BuildError;
use crate::output;
use crate::watcher::debounce::Debouncer;
use crate::watcher::event::ChangeEvent;
use crate::watcher::filter::WatchScope;

/// What a build request turned into.
#[derive(Debug)]
pub enum BuildOutcome {
    /// The tool ran; see the result for success or failure.
    Ran(BuildResult),
    /// Asset verification failed, so the tool was never started.
    SkippedForAssets,
}

/// Single owner of the debounce state and the asset verification cache.
///
/// File changes and manual commands both go through `&mut self`, so at most
/// one verification or tool run is ever in flight.
pub struct Orchestrator {
    project_dir: PathBuf,
    artifact: PathBuf,
    scope: WatchScope,
    debouncer: Debouncer,
    verifier: AssetVerifier,
    invoker: BuildInvoker,
    reloader: Option<Reloader>,
    build_timeout: Duration,
    gate_builds: bool,
    report_limit: usize,
}

impl Orchestrator {
    pub fn from_config(
        project_dir: &Path,
        artifact: &Path,
        config: &ModWatchConfig,
    ) -> anyhow::Result<Self> {
        let reloader = config
            .build
            .reload_command
            .clone()
            .and_then(|argv| Reloader::new(argv, config.build.reload_timeout()));

        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            artifact: artifact.to_path_buf(),
            scope: WatchScope::from_config(project_dir, &config.watch),
            debouncer: Debouncer::new(config.watch.debounce_window()),
            verifier: AssetVerifier::from_config(&config.assets)?,
            invoker: BuildInvoker::new(BuildTool::from_config(&config.build, project_dir)),
            reloader,
            build_timeout: config.build.timeout(),
            gate_builds: config.build.check_assets,
            report_limit: config.assets.report_limit,
        })
    }

    /// Drop the reload notifier, e.g. for `--no-reload`.
    pub fn without_reload(mut self) -> Self {
        self.reloader = None;
        self
    }

    pub fn scope(&self) -> &WatchScope {
        &self.scope
    }

    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    /// Handle one filesystem change. Returns `None` when the change was
    /// filtered out or fell inside the debounce window.
    pub async fn on_change(
        &mut self,
        event: &ChangeEvent,
    ) -> Option<Result<BuildOutcome, BuildError>> {
        if !self.scope.accepts(event) {
            return None;
        }
        if !self.debouncer.should_trigger(event.observed_at) {
            tracing::debug!(path = %event.path.display(), "change debounced");
            return None;
        }

        let rel_path = event
            .path
            .strip_prefix(&self.project_dir)
            .unwrap_or(&event.path);
        output::print_change(rel_path);
        Some(self.run(BuildRequest::build(self.gate_builds)).await)
    }

    /// Handle one manual command. Manual runs are never debounced.
    pub async fn on_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Build => {
                output::print_manual_trigger("Build");
                let _ = self.run(BuildRequest::build(self.gate_builds)).await;
            }
            Command::CheckAssets => {
                output::print_manual_trigger("Asset Check");
                self.check_assets().await;
            }
            Command::Decompose => {
                output::print_manual_trigger("Decompose");
                let _ = self.run(BuildRequest::decompose()).await;
            }
            Command::Quit => {
                output::print_quitting();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    /// Verify remote assets and report the verdict. Any failure counts as `false`.
    pub async fn check_assets(&mut self) -> bool {
        match self.verifier.verify().await {
            Ok(report) => {
                output::print_asset_report(&report, self.report_limit);
                report.passed()
            }
            Err(err) => {
                output::print_asset_error(&err);
                false
            }
        }
    }

    /// Run one build or decompose, verifying assets first when requested.
    pub async fn run(&mut self, request: BuildRequest) -> Result<BuildOutcome, BuildError> {
        if request.check_assets && !self.check_assets().await {
            output::print_build_skipped();
            return Ok(BuildOutcome::SkippedForAssets);
        }

        output::print_run_header(request.mode);
        let result = match self
            .invoker
            .invoke(request.mode, &self.project_dir, &self.artifact, self.build_timeout)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                output::print_build_error(request.mode, &err);
                return Err(err);
            }
        };
        output::print_build_result(&result);

        if result.success && result.mode == BuildMode::Build {
            if let Some(reloader) = &self.reloader {
                reloader.notify().await;
            }
        }
        Ok(BuildOutcome::Ran(result))
    }

    /// Drive the watch loop until `q` or Ctrl-C.
    ///
    /// Failures of individual builds or verifications are reported and the
    /// loop keeps going.
    pub async fn serve(
        self,
        changes: tokio_mpsc::Receiver<ChangeEvent>,
        commands: tokio_mpsc::Receiver<Command>,
    ) -> anyhow::Result<()> {
        let ctrl_c = async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("cannot listen for Ctrl-C: {err}");
                std::future::pending::<()>().await;
            }
        };
        self.serve_until(changes, commands, ctrl_c).await
    }

    /// Like [`serve`](Self::serve), stopping when `shutdown` completes.
    ///
    /// `shutdown` lives for the whole loop, so a signal that lands while a
    /// build or verification is running stops the loop once that run ends.
    pub async fn serve_until(
        mut self,
        mut changes: tokio_mpsc::Receiver<ChangeEvent>,
        mut commands: tokio_mpsc::Receiver<Command>,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    output::print_stopping();
                    break;
                }
                Some(command) = commands.recv() => {
                    if self.on_command(command).await.is_break() {
                        break;
                    }
                }
                Some(event) = changes.recv() => {
                    let _ = self.on_change(&event).await;
                }
                else => break,
            }
        }
        Ok(())
    }
}
