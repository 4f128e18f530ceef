//! Runs one file change through the whole sync path:
//! load document → ingest → update → persist → notify.
//!
//! Failures never escape `handle_change`; they become error descriptors so
//! a long-running watch loop keeps going.

use crate::config::SyncConfig;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::filter::PathFilter;
use crate::observer::{ChangeDescriptor, Observer, ObserverId, Observers};
use crate::store::DocumentStore;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stylebridge_canvas::CanvasDocument;
use stylebridge_common::FileSystem;
use stylebridge_editor::{apply_update_at, UpdateSummary};
use stylebridge_evaluator::parse_source;
use tracing::{error, info, instrument};

pub struct ChangeOrchestrator {
    config: SyncConfig,
    filter: PathFilter,
    store: DocumentStore,
    fs: Arc<dyn FileSystem>,
    observers: Observers,
}

impl ChangeOrchestrator {
    pub fn new(
        root: impl Into<PathBuf>,
        config: SyncConfig,
        fs: Arc<dyn FileSystem>,
    ) -> WorkspaceResult<Self> {
        let root = root.into();
        let filter = PathFilter::new(&root, &config)?;
        let store = DocumentStore::new(config.canvas_path(&root));
        Ok(Self {
            config,
            filter,
            store,
            fs,
            observers: Observers::new(),
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn subscribe(&mut self, observer: Observer) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub(crate) fn clear_observers(&mut self) {
        self.observers.clear();
    }

    /// Load the persisted document (default when none exists)
    pub fn load_document(&self) -> WorkspaceResult<CanvasDocument> {
        self.store.load(self.fs.as_ref())
    }

    pub fn handle_change(&mut self, path: &Path) -> ChangeDescriptor {
        self.handle_change_at(path, Utc::now())
    }

    /// Process one changed stylesheet and notify observers.
    ///
    /// `path` may be absolute or relative to the project root.
    #[instrument(skip(self, now), fields(path = %path.display()))]
    pub fn handle_change_at(&mut self, path: &Path, now: DateTime<Utc>) -> ChangeDescriptor {
        let source_file = self.filter.relative(path);

        match self.apply_change(path, &source_file, now) {
            Ok((doc, summary)) => {
                let change =
                    ChangeDescriptor::updated(source_file, summary.counts, summary.warnings, now);
                self.observers.notify(Some(&doc), &change);
                change
            }
            Err(err) => {
                error!(file = %source_file, error = %err, "Failed to sync stylesheet");
                let change = ChangeDescriptor::failed(source_file, err.to_string(), now);
                self.observers.notify(None, &change);
                change
            }
        }
    }

    fn apply_change(
        &self,
        path: &Path,
        source_file: &str,
        now: DateTime<Utc>,
    ) -> WorkspaceResult<(CanvasDocument, UpdateSummary)> {
        let full_path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.filter.root().join(path)
        };
        let source = self
            .fs
            .read_to_string(&full_path)
            .map_err(|source| WorkspaceError::Read {
                path: full_path.clone(),
                source,
            })?;
        let ingested = parse_source(&source, Path::new(source_file))?;

        let mut doc = self.load_document()?;
        let summary = apply_update_at(&mut doc, ingested, &self.config.update_options(), now);

        if self.config.update_canvas {
            self.store.save(self.fs.as_ref(), &doc)?;
        } else {
            info!(file = %source_file, "Canvas updates disabled, document not persisted");
        }
        Ok((doc, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::ChangeType;
    use std::sync::Mutex;
    use stylebridge_common::MockFileSystem;

    fn setup(config: SyncConfig) -> (Arc<MockFileSystem>, ChangeOrchestrator) {
        let fs = Arc::new(MockFileSystem::new());
        let orchestrator = ChangeOrchestrator::new("/project", config, fs.clone()).unwrap();
        (fs, orchestrator)
    }

    #[test]
    fn test_change_is_persisted_and_reported() {
        let (fs, mut orchestrator) = setup(SyncConfig::default());
        fs.add_file("/project/src/app.css", ".card { display: flex; background: #eee; }");

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        orchestrator.subscribe(Box::new(move |doc, change| {
            sink.lock()
                .unwrap()
                .push((doc.map(|d| d.elements.len()), change.change_type));
        }));

        let change = orchestrator.handle_change(Path::new("/project/src/app.css"));
        assert_eq!(change.change_type, ChangeType::CssUpdate);
        assert_eq!(change.file_path, "src/app.css");
        assert_eq!(change.counts.unwrap().added, 1);
        assert_eq!(*seen.lock().unwrap(), vec![(Some(1), ChangeType::CssUpdate)]);

        let doc = orchestrator.load_document().unwrap();
        assert_eq!(doc.elements[0].source_file.as_deref(), Some("src/app.css"));
        assert!(fs.file(Path::new("/project/.stylebridge/canvas.json")).is_some());
    }

    #[test]
    fn test_parse_error_becomes_error_descriptor() {
        let (fs, mut orchestrator) = setup(SyncConfig::default());
        fs.add_file("/project/app.css", ".ok { color: red; }");
        orchestrator.handle_change(Path::new("app.css"));
        let before = fs.file(Path::new("/project/.stylebridge/canvas.json"));

        fs.add_file("/project/app.css", ".broken { color: red;");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        orchestrator.subscribe(Box::new(move |doc, change| {
            sink.lock().unwrap().push((doc.is_some(), change.error.clone()));
        }));

        let change = orchestrator.handle_change(Path::new("app.css"));
        assert!(change.is_error());
        assert!(change.error.is_some());
        assert!(!seen.lock().unwrap()[0].0);
        // Persisted document untouched
        assert_eq!(fs.file(Path::new("/project/.stylebridge/canvas.json")), before);
    }

    #[test]
    fn test_missing_file_is_reported_not_raised() {
        let (_fs, mut orchestrator) = setup(SyncConfig::default());
        let change = orchestrator.handle_change(Path::new("gone.css"));
        assert!(change.is_error());
        assert_eq!(change.file_path, "gone.css");
    }

    #[test]
    fn test_write_failure_keeps_previous_document() {
        let (fs, mut orchestrator) = setup(SyncConfig::default());
        fs.add_file("/project/a.css", ".a { color: red; }");
        orchestrator.handle_change(Path::new("a.css"));
        let before = orchestrator.load_document().unwrap();

        fs.add_file("/project/a.css", ".a { color: red; } .b { color: blue; }");
        fs.set_fail_writes(true);
        let change = orchestrator.handle_change(Path::new("a.css"));
        assert!(change.is_error());
        assert_eq!(orchestrator.load_document().unwrap(), before);
    }

    #[test]
    fn test_dry_run_does_not_persist() {
        let (fs, mut orchestrator) = setup(SyncConfig {
            update_canvas: false,
            ..Default::default()
        });
        fs.add_file("/project/a.css", ".a { color: red; }");

        let change = orchestrator.handle_change(Path::new("a.css"));
        assert_eq!(change.counts.unwrap().added, 1);
        assert!(fs.file(Path::new("/project/.stylebridge/canvas.json")).is_none());
    }

    #[test]
    fn test_emptied_stylesheet_warns() {
        let (fs, mut orchestrator) = setup(SyncConfig::default());
        fs.add_file("/project/a.css", ".a { color: red; }");
        orchestrator.handle_change(Path::new("a.css"));

        fs.add_file("/project/a.css", "/* nothing left */");
        let change = orchestrator.handle_change(Path::new("a.css"));
        assert_eq!(change.counts.unwrap().removed, 1);
        assert_eq!(change.warnings.len(), 1);
    }
}
