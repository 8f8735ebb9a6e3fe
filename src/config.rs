use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "modwatch.toml";

/// Configuration loaded from `modwatch.toml` at the project root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModWatchConfig {
    /// Mod name; the build artifact is `<saves_dir>/<game_name>.json`.
    pub game_name: String,
    /// Overrides the OS default Tabletop Simulator saves folder.
    pub saves_dir: Option<PathBuf>,
    pub watch: WatchConfig,
    pub build: BuildConfig,
    pub assets: AssetConfig,
}

/// Which edits count as build-relevant.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Top-level directories (or single files) relative to the project root.
    pub paths: Vec<String>,
    /// File extensions without the leading dot, matched case-insensitively.
    pub extensions: Vec<String>,
    /// Minimum interval between two change-triggered builds.
    pub debounce_ms: u64,
}

/// External build tool invocation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub program: String,
    /// Leading arguments; `-moddir`, `-modfile` and `-reverse` are appended.
    pub args: Vec<String>,
    /// Working directory for the tool, relative to the project root.
    pub working_dir: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Gate every build on a successful asset verification.
    pub check_assets: bool,
    /// Argv of a command run after each successful build.
    pub reload_command: Option<Vec<String>>,
    pub reload_timeout_secs: u64,
}

/// Remote asset manifest and reachability probing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub manifest_url: Option<String>,
    /// Only URLs on this host (or its subdomains) are verified.
    pub host_domain: String,
    /// Top-level manifest field carrying the version token.
    pub version_field: String,
    pub timeout_secs: u64,
    /// Log progress after this many probes.
    pub progress_every: usize,
    /// Maximum number of offending URLs printed per report.
    pub report_limit: usize,
}

impl Default for ModWatchConfig {
    fn default() -> Self {
        Self {
            game_name: "Arc Spirits".to_string(),
            saves_dir: None,
            watch: WatchConfig::default(),
            build: BuildConfig::default(),
            assets: AssetConfig::default(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            paths: ["src", "objects", "modsettings", "config.json"]
                .into_iter()
                .map(String::from)
                .collect(),
            extensions: ["ttslua", "lua", "json", "xml"]
                .into_iter()
                .map(String::from)
                .collect(),
            debounce_ms: 1000,
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            program: "go".to_string(),
            args: vec!["run".to_string(), "main.go".to_string()],
            working_dir: Some(PathBuf::from("TTSModManager")),
            timeout_secs: 60,
            check_assets: false,
            reload_command: None,
            reload_timeout_secs: 5,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            manifest_url: None,
            host_domain: "supabase.co".to_string(),
            version_field: "exported_at".to_string(),
            timeout_secs: 10,
            progress_every: 100,
            report_limit: 10,
        }
    }
}

impl WatchConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl BuildConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn reload_timeout(&self) -> Duration {
        Duration::from_secs(self.reload_timeout_secs)
    }
}

impl AssetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ModWatchConfig {
    /// Load configuration from `modwatch.toml` in the given root directory.
    ///
    /// Returns the default configuration if the file does not exist or cannot be parsed.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match toml::from_str::<Self>(&contents) {
                Ok(config) => config,
                Err(err) => {
                    tracing::warn!("failed to parse {CONFIG_FILE}: {err}. Using defaults.");
                    Self::default()
                }
            },
            Err(err) => {
                tracing::warn!("failed to read {CONFIG_FILE}: {err}. Using defaults.");
                Self::default()
            }
        }
    }
}
