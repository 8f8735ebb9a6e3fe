use std::path::PathBuf;
use std::time::Instant;

use notify::EventKind;

/// What happened to a path, at the granularity the build trigger needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    /// Removals, access notifications and anything else notify reports.
    Other,
}

impl From<&EventKind> for ChangeKind {
    fn from(kind: &EventKind) -> Self {
        match kind {
            EventKind::Create(_) => ChangeKind::Created,
            EventKind::Modify(_) => ChangeKind::Modified,
            _ => ChangeKind::Other,
        }
    }
}

/// A single filesystem change, consumed once by the orchestrator.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
    pub is_dir: bool,
    /// When the watcher observed the change; debouncing runs on this clock.
    pub observed_at: Instant,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            kind,
            is_dir,
            observed_at: Instant::now(),
        }
    }

    pub fn at(mut self, observed_at: Instant) -> Self {
        self.observed_at = observed_at;
        self
    }

    /// Expand a raw notify event into one `ChangeEvent` per affected path.
    pub fn from_notify(event: &notify::Event, observed_at: Instant) -> Vec<Self> {
        let kind = ChangeKind::from(&event.kind);
        event
            .paths
            .iter()
            .map(|path| Self {
                path: path.clone(),
                kind,
                is_dir: path.is_dir(),
                observed_at,
            })
            .collect()
    }
}
