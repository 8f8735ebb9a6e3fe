use std::path::PathBuf;

use thiserror::Error;

/// Failures of the asset verification pipeline. All of them fail a gated build closed.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No `assets.manifest_url` in the configuration.
    #[error("no asset manifest URL configured (set assets.manifest_url in modwatch.toml)")]
    NotConfigured,

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure talking to the manifest endpoint.
    #[error("manifest request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The manifest endpoint answered with a non-success status.
    #[error("manifest endpoint returned HTTP {status}")]
    Status { status: u16 },

    /// The manifest body could not be decoded.
    #[error("malformed manifest: {0}")]
    Malformed(String),

    /// The manifest decoded but contained no asset URLs.
    #[error("no asset URLs found in manifest")]
    NoUrls,
}

/// Failures that prevent a build tool run from happening at all.
///
/// A run that happens and fails (non-zero exit, timeout) is a `BuildResult`, not an error.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Decompose needs an existing artifact to read from.
    #[error("save file not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    /// The configured `build.working_dir` does not exist.
    #[error("build working directory not found: {} (set build.working_dir in modwatch.toml)", .0.display())]
    MissingWorkingDir(PathBuf),

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build tool I/O error: {0}")]
    Io(#[from] std::io::Error),
}
