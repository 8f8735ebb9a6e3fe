use std::time::{Duration, Instant};

/// Collapses bursts of accepted changes into at most one build per window.
///
/// The window is shared across all paths: saving several files at once yields
/// a single build. Requires exclusive access; the orchestrator owns it.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    last_build: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_build: None,
        }
    }

    /// Returns `true` and records `now` if at least one window has passed
    /// since the last accepted trigger. Suppressed calls leave state untouched.
    pub fn should_trigger(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_build {
            if now.saturating_duration_since(last) < self.window {
                return false;
            }
        }
        self.last_build = Some(now);
        true
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
