pub mod debounce;
pub mod event;
pub mod filter;

use std::path::Path;
use std::time::Instant;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as tokio_mpsc;
use tokio::task::JoinHandle;

use event::ChangeEvent;

/// Handle to a running watcher. Keeps the OS watcher alive (dropping stops watching).
pub struct WatcherHandle {
    _watcher: RecommendedWatcher,
    /// The bridge task forwarding events from std channel to tokio channel.
    _bridge_task: JoinHandle<()>,
}

/// Start a recursive file watcher on `watch_root`.
///
/// Returns a `WatcherHandle` (must be kept alive) and a tokio mpsc receiver
/// that yields one `ChangeEvent` per affected path, stamped with the time the
/// notification was received. No filtering happens here; the orchestrator
/// runs every event through its `WatchScope`.
pub fn start_watcher(
    watch_root: &Path,
) -> anyhow::Result<(WatcherHandle, tokio_mpsc::Receiver<ChangeEvent>)> {
    let (std_tx, std_rx) = std::sync::mpsc::channel::<(notify::Result<notify::Event>, Instant)>();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let _ = std_tx.send((res, Instant::now()));
    })?;
    watcher.watch(watch_root, RecursiveMode::Recursive)?;

    let (tokio_tx, tokio_rx) = tokio_mpsc::channel::<ChangeEvent>(256);

    // Bridge: spawn_blocking to receive from std channel, convert, forward to tokio
    let bridge_task = tokio::task::spawn_blocking(move || {
        while let Ok((result, observed_at)) = std_rx.recv() {
            match result {
                Ok(raw) => {
                    for change in ChangeEvent::from_notify(&raw, observed_at) {
                        if tokio_tx.blocking_send(change).is_err() {
                            return; // receiver dropped, shutdown
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!("[watcher] error: {err}");
                }
            }
        }
    });

    Ok((
        WatcherHandle {
            _watcher: watcher,
            _bridge_task: bridge_task,
        },
        tokio_rx,
    ))
}
