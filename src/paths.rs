use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::ModWatchConfig;

/// Default Tabletop Simulator saves folder for the current OS.
///
/// Returns `None` when no home directory can be determined.
pub fn default_saves_folder() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::home_dir().map(|home| home.join("Library").join("Tabletop Simulator").join("Saves"))
    } else if cfg!(target_os = "windows") {
        dirs::document_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
            .map(|docs| docs.join("My Games").join("Tabletop Simulator").join("Saves"))
    } else {
        dirs::data_dir().map(|data| data.join("Tabletop Simulator").join("Saves"))
    }
}

/// Saves folder from config, falling back to the OS default.
pub fn saves_folder(config: &ModWatchConfig) -> anyhow::Result<PathBuf> {
    match &config.saves_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_saves_folder().context("could not determine the home directory"),
    }
}

/// Path of the build artifact the tool writes (and decompose reads).
pub fn artifact_path(saves_folder: &Path, game_name: &str) -> PathBuf {
    saves_folder.join(format!("{game_name}.json"))
}

/// Create the saves folder if missing. Returns `true` if it had to be created.
pub fn ensure_saves_folder(saves_folder: &Path) -> anyhow::Result<bool> {
    if saves_folder.is_dir() {
        return Ok(false);
    }
    tracing::warn!("saves folder not found: {}, creating it", saves_folder.display());
    std::fs::create_dir_all(saves_folder)
        .with_context(|| format!("failed to create {}", saves_folder.display()))?;
    Ok(true)
}
