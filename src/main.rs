mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use modwatch::build::BuildRequest;
use modwatch::config::ModWatchConfig;
use modwatch::console::spawn_stdin_commands;
use modwatch::orchestrator::{BuildOutcome, Orchestrator};
use modwatch::{output, paths, watcher};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let project_dir = resolve_project_root(cli.project)?;
    let config = ModWatchConfig::load(&project_dir);
    let saves = paths::saves_folder(&config)?;
    let artifact = paths::artifact_path(&saves, &config.game_name);

    let mut orchestrator = Orchestrator::from_config(&project_dir, &artifact, &config)?;
    if cli.no_reload {
        orchestrator = orchestrator.without_reload();
    }

    match cli.command.unwrap_or(Commands::Watch) {
        Commands::Watch => {
            paths::ensure_saves_folder(&saves)?;
            let (_handle, changes) = watcher::start_watcher(&project_dir)
                .with_context(|| format!("failed to watch {}", project_dir.display()))?;
            output::print_banner(&config.game_name, orchestrator.scope(), orchestrator.artifact());
            orchestrator.serve(changes, spawn_stdin_commands()).await?;
            println!("Done.");
        }
        Commands::Build { check_assets } => {
            paths::ensure_saves_folder(&saves)?;
            let request = BuildRequest::build(check_assets || config.build.check_assets);
            match orchestrator.run(request).await? {
                BuildOutcome::Ran(result) if result.success => {}
                BuildOutcome::Ran(_) => anyhow::bail!("build failed"),
                BuildOutcome::SkippedForAssets => anyhow::bail!("build skipped: asset check failed"),
            }
        }
        Commands::Decompose => {
            let outcome = orchestrator.run(BuildRequest::decompose()).await?;
            if !matches!(outcome, BuildOutcome::Ran(ref result) if result.success) {
                anyhow::bail!("decompose failed");
            }
        }
        Commands::CheckAssets => {
            if !orchestrator.check_assets().await {
                anyhow::bail!("asset check failed");
            }
        }
    }

    Ok(())
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("MODWATCH_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<PathBuf>) -> Result<PathBuf> {
    let root = match project_override {
        Some(path) => path,
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    if !root.is_dir() {
        anyhow::bail!("project directory not found: {}", root.display());
    }
    root.canonicalize()
        .with_context(|| format!("failed to resolve {}", root.display()))
}
