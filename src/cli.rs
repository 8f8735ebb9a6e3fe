use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Edit-build loop for Tabletop Simulator mod projects.
///
/// modwatch rebuilds the mod's save file whenever a source file changes and can
/// verify that every remote asset the project references is reachable before
/// a build goes out.
#[derive(Parser, Debug)]
#[command(
    name = "modwatch",
    version,
    about,
    long_about = None,
    propagate_version = true,
)]
pub struct Cli {
    /// Project root (defaults to the current directory).
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,

    /// Show debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not run the configured reload command after successful builds.
    #[arg(long, global = true)]
    pub no_reload: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the project and rebuild on changes (the default).
    ///
    /// Type b, a, d or q followed by Enter to build, check assets, decompose or quit.
    Watch,

    /// Build the save file once.
    Build {
        /// Verify remote assets first and skip the build if any are unreachable.
        #[arg(long)]
        check_assets: bool,
    },

    /// Extract the save file back into project sources.
    Decompose,

    /// Verify that every remote asset in the manifest is reachable.
    CheckAssets,
}
