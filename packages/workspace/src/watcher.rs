use crate::error::WorkspaceResult;
use crate::filter::PathFilter;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::{debug, warn};

/// OS file watcher over the watch patterns' base directories.
///
/// Events are queued on a channel; callers pull changed stylesheet paths.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<Event>>,
    filter: PathFilter,
}

impl FileWatcher {
    pub fn new(filter: PathFilter) -> WorkspaceResult<Self> {
        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default(),
        )?;

        for dir in filter.base_dirs() {
            if !dir.is_dir() {
                warn!(dir = %dir.display(), "Watch directory does not exist, skipping");
                continue;
            }
            watcher.watch(&dir, RecursiveMode::Recursive)?;
            debug!(dir = %dir.display(), "Watching");
        }

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            filter,
        })
    }

    /// Changed stylesheet paths carried by one event
    fn changed_paths(&self, event: notify::Result<Event>) -> Vec<PathBuf> {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "Watch error");
                return Vec::new();
            }
        };
        if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
            return Vec::new();
        }
        event
            .paths
            .into_iter()
            .filter(|path| self.filter.matches(path))
            .collect()
    }

    /// Wait up to `timeout` for changes, then drain whatever else is queued
    pub fn wait(&self, timeout: Duration) -> Vec<PathBuf> {
        let mut paths = match self.receiver.recv_timeout(timeout) {
            Ok(event) => self.changed_paths(event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return Vec::new()
            }
        };
        paths.extend(self.drain());
        dedup(paths)
    }

    /// Everything queued right now, without blocking
    pub fn drain(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        while let Ok(event) = self.receiver.try_recv() {
            paths.extend(self.changed_paths(event));
        }
        dedup(paths)
    }
}

/// Drop repeats, keeping first-seen order
fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
    for path in paths {
        if !out.contains(&path) {
            out.push(path);
        }
    }
    out
}
