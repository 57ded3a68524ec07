use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};

use crate::error::Result;
use crate::event::{Event, EventSender};

/// Default debounce interval in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Default flood threshold (events per debounce window).
pub const DEFAULT_FLOOD_THRESHOLD: usize = 100;

/// Watches the immediate children of the model's root directory.
///
/// Delivers [`Event::FsChange`] on the channel; it never touches the model.
pub struct FsWatcher {
    /// Whether the watcher is currently forwarding events.
    active: Arc<AtomicBool>,
    root: Arc<RwLock<PathBuf>>,
    debouncer: Debouncer<notify::RecommendedWatcher>,
}

impl FsWatcher {
    /// Start watching `root` non-recursively.
    ///
    /// Events are debounced by `debounce` and sent via `event_tx`. More than
    /// `flood_threshold` paths in one window collapse into the root path alone.
    pub fn new(
        root: &Path,
        debounce: Duration,
        flood_threshold: usize,
        event_tx: EventSender,
    ) -> Result<Self> {
        let active = Arc::new(AtomicBool::new(true));
        let shared_root = Arc::new(RwLock::new(root.to_path_buf()));
        let active_clone = active.clone();
        let root_clone = shared_root.clone();

        let mut debouncer = new_debouncer(
            debounce,
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| {
                // If paused, silently drop events
                if !active_clone.load(Ordering::Relaxed) {
                    return;
                }
                match result {
                    Ok(events) => {
                        let paths: Vec<PathBuf> = events
                            .into_iter()
                            .filter(|e| e.kind == DebouncedEventKind::Any)
                            .map(|e| e.path)
                            .collect();
                        let root = match root_clone.read() {
                            Ok(guard) => guard.clone(),
                            Err(_) => return,
                        };
                        if let Some(paths) = collapse_paths(paths, &root, flood_threshold) {
                            let _ = event_tx.send(Event::FsChange(paths));
                        }
                    }
                    Err(e) => tracing::debug!("watcher error: {}", e),
                }
            },
        )?;

        debouncer.watcher().watch(root, RecursiveMode::NonRecursive)?;
        tracing::debug!("watching {}", root.display());

        Ok(Self {
            active,
            root: shared_root,
            debouncer,
        })
    }

    /// Move the watch to a new root directory.
    pub fn rewatch(&mut self, root: &Path) -> Result<()> {
        let old = self.root();
        if old == root {
            return Ok(());
        }
        if let Err(e) = self.debouncer.watcher().unwatch(&old) {
            tracing::debug!("unwatch {} failed: {}", old.display(), e);
        }
        self.debouncer.watcher().watch(root, RecursiveMode::NonRecursive)?;
        if let Ok(mut guard) = self.root.write() {
            *guard = root.to_path_buf();
        }
        tracing::debug!("watching {}", root.display());
        Ok(())
    }

    /// The directory currently watched.
    pub fn root(&self) -> PathBuf {
        self.root.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Pause event forwarding (the OS watch stays registered).
    pub fn pause(&self) {
        self.active.store(false, Ordering::Relaxed);
    }

    /// Resume event forwarding.
    pub fn resume(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Check if the watcher is currently active (forwarding events).
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }
}

/// Reduce one debounce window to the paths worth reporting.
///
/// Returns `None` for an empty window; floods collapse into `[root]`.
pub fn collapse_paths(mut paths: Vec<PathBuf>, root: &Path, flood_threshold: usize) -> Option<Vec<PathBuf>> {
    if paths.is_empty() {
        return None;
    }
    if paths.len() > flood_threshold {
        return Some(vec![root.to_path_buf()]);
    }
    paths.sort();
    paths.dedup();
    Some(paths)
}
