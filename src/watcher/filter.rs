use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::config::WatchConfig;

use super::event::{ChangeEvent, ChangeKind};

/// The fixed set of locations and extensions that count as build-relevant.
#[derive(Debug, Clone)]
pub struct WatchScope {
    root: PathBuf,
    entries: HashSet<String>,
    extensions: HashSet<String>,
}

impl WatchScope {
    /// `entries` are top-level directory names or root-relative file paths;
    /// `extensions` may be given with or without a leading dot.
    pub fn new<E, X>(root: impl Into<PathBuf>, entries: E, extensions: X) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        X: IntoIterator,
        X::Item: AsRef<str>,
    {
        Self {
            root: root.into(),
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().trim_matches('/').to_string())
                .collect(),
            extensions: extensions
                .into_iter()
                .map(|x| x.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(root: &Path, config: &WatchConfig) -> Self {
        Self::new(root, &config.paths, &config.extensions)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted scope entries, for display.
    pub fn entries(&self) -> Vec<&str> {
        let mut entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        entries.sort_unstable();
        entries
    }

    /// Decide whether a change should trigger a build. Pure function of its inputs.
    ///
    /// Rejects, in order: non create/modify events, directories, unwatched
    /// extensions, paths outside the scope entries, and hidden, backup or
    /// editor lock files.
    pub fn accepts(&self, event: &ChangeEvent) -> bool {
        if event.kind == ChangeKind::Other || event.is_dir {
            return false;
        }

        let path = event.path.as_path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !self.extensions.contains(&ext) {
            return false;
        }

        let Ok(rel_path) = path.strip_prefix(&self.root) else {
            return false;
        };
        let segments: Vec<&str> = rel_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
            .collect();
        let Some(first) = segments.first() else {
            return false;
        };
        if !self.entries.contains(*first) && !self.entries.contains(&segments.join("/")) {
            return false;
        }

        if segments.iter().any(|s| s.starts_with('.')) {
            return false;
        }
        let name = segments.last().copied().unwrap_or_default();
        !(name.ends_with('~') || name.starts_with(".#"))
    }
}
