use crate::config::SyncConfig;
use crate::error::WorkspaceResult;
use crate::observer::{ChangeDescriptor, Observer, ObserverId};
use crate::orchestrator::ChangeOrchestrator;
use crate::watcher::FileWatcher;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use stylebridge_common::FileSystem;
use tracing::{debug, info};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A watch session: owns the watcher, the orchestrator and its observers.
///
/// Changes are queued and processed one at a time, each to completion.
pub struct SyncSession {
    orchestrator: ChangeOrchestrator,
    watcher: Option<FileWatcher>,
    pending: VecDeque<PathBuf>,
    poll_interval: Duration,
}

impl SyncSession {
    pub fn new(orchestrator: ChangeOrchestrator) -> Self {
        Self {
            orchestrator,
            watcher: None,
            pending: VecDeque::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Session for a project root, reading its config through `fs`
    pub fn open(root: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> WorkspaceResult<Self> {
        let root = root.into();
        let config = SyncConfig::load(fs.as_ref(), &root)?;
        Ok(Self::new(ChangeOrchestrator::new(root, config, fs)?))
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn orchestrator(&self) -> &ChangeOrchestrator {
        &self.orchestrator
    }

    /// Begin watching. Calling it on a running session does nothing.
    pub fn start(&mut self) -> WorkspaceResult<()> {
        if self.watcher.is_none() {
            let watcher = FileWatcher::new(self.orchestrator.filter().clone())?;
            self.watcher = Some(watcher);
            info!(root = %self.orchestrator.filter().root().display(), "Sync session started");
        }
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.watcher.is_some()
    }

    pub fn subscribe(&mut self, observer: Observer) -> ObserverId {
        self.orchestrator.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.orchestrator.unsubscribe(id)
    }

    /// Queue a path unless it is already waiting
    pub fn enqueue(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if !self.pending.iter().any(|p| p == path) {
            self.pending.push_back(path.to_path_buf());
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Pull queued watcher events, then handle every pending change in order
    pub fn process_pending(&mut self) -> Vec<ChangeDescriptor> {
        if let Some(watcher) = &self.watcher {
            for path in watcher.drain() {
                self.enqueue(path);
            }
        }

        let mut changes = Vec::with_capacity(self.pending.len());
        while let Some(path) = self.pending.pop_front() {
            changes.push(self.orchestrator.handle_change(&path));
        }
        if !changes.is_empty() {
            debug!(count = changes.len(), "Processed pending changes");
        }
        changes
    }

    /// Watch until `stop` is set; returns how many changes were handled
    pub fn run(&mut self, stop: &AtomicBool) -> WorkspaceResult<usize> {
        self.start()?;
        let mut handled = 0;

        while !stop.load(Ordering::SeqCst) {
            if let Some(watcher) = &self.watcher {
                for path in watcher.wait(self.poll_interval) {
                    self.enqueue(path);
                }
            }
            handled += self.process_pending().len();
        }

        info!(handled, "Sync session loop finished");
        Ok(handled)
    }

    /// Release the watcher, drop queued changes and deregister observers
    pub fn stop(&mut self) {
        self.watcher = None;
        self.pending.clear();
        self.orchestrator.clear_observers();
        info!("Sync session stopped");
    }
}
