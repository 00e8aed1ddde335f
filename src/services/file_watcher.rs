//! File watcher for watch mode.
//!
//! Monitors a set of files (source image, project file, mask) and reports
//! debounced change events so the conversion can be re-run.

use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

/// Quiet period before a burst of raw events is reported.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Event sent when files change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChangeEvent {
    /// Watched paths that changed
    pub paths: Vec<PathBuf>,
}

impl FileChangeEvent {
    pub fn touches(&self, path: &Path) -> bool {
        self.paths.iter().any(|p| same_file(p, path))
    }
}

/// File watcher that monitors individual files
pub struct FileWatcher {
    receiver: mpsc::Receiver<PathBuf>,
    /// Handle to the watcher (kept alive)
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Watch `files`. Their parent directories are watched instead of the
    /// files themselves, since editors often replace a file on save.
    pub fn new(files: &[PathBuf]) -> Result<Self, notify::Error> {
        let files: Vec<PathBuf> = files.iter().map(|f| absolute(f)).collect();
        let dirs: HashSet<PathBuf> = files
            .iter()
            .filter_map(|f| f.parent().map(Path::to_path_buf))
            .collect();

        let (tx, receiver) = mpsc::channel::<PathBuf>();
        let watched = files.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    for path in event.paths {
                        if watched.iter().any(|w| same_file(w, &path)) {
                            let _ = tx.send(path);
                        }
                    }
                }
                Err(e) => tracing::warn!(error = %e, "File watch error"),
            },
            Config::default(),
        )?;

        for dir in &dirs {
            watcher.watch(dir, RecursiveMode::NonRecursive)?;
        }
        tracing::info!(files = ?files, "File watcher started");

        Ok(Self {
            receiver,
            _watcher: watcher,
        })
    }

    /// Block until a watched file changes, then keep collecting until
    /// [`DEBOUNCE`] passes without another event. `None` once the watcher
    /// is gone.
    pub fn next_change(&self) -> Option<FileChangeEvent> {
        let first = self.receiver.recv().ok()?;
        Some(self.collect(first))
    }

    /// Like [`next_change`](Self::next_change) but gives up after `timeout`.
    pub fn next_change_timeout(&self, timeout: Duration) -> Option<FileChangeEvent> {
        let first = self.receiver.recv_timeout(timeout).ok()?;
        Some(self.collect(first))
    }

    fn collect(&self, first: PathBuf) -> FileChangeEvent {
        let mut pending = vec![first];
        while let Ok(path) = self.receiver.recv_timeout(DEBOUNCE) {
            if !pending.contains(&path) {
                pending.push(path);
            }
        }
        tracing::debug!(paths = ?pending, "Files changed (debounced)");
        FileChangeEvent { paths: pending }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// notify reports absolute paths; CLI arguments may be relative.
fn same_file(a: &Path, b: &Path) -> bool {
    absolute(a) == absolute(b)
}
