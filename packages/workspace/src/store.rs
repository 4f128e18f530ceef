use crate::error::{WorkspaceError, WorkspaceResult};
use std::path::{Path, PathBuf};
use stylebridge_canvas::CanvasDocument;
use stylebridge_common::{write_atomic, FileSystem};
use tracing::{debug, info};

/// Loads and persists the canvas document as one JSON file
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The persisted document, or a fresh default one if none exists yet
    pub fn load(&self, fs: &dyn FileSystem) -> WorkspaceResult<CanvasDocument> {
        if !fs.exists(&self.path) {
            debug!(path = %self.path.display(), "No canvas document yet");
            return Ok(CanvasDocument::default());
        }

        let json = fs
            .read_to_string(&self.path)
            .map_err(|source| WorkspaceError::Read {
                path: self.path.clone(),
                source,
            })?;
        CanvasDocument::from_json(&json).map_err(|source| WorkspaceError::Document {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the persisted document. On failure the previous file is intact.
    pub fn save(&self, fs: &dyn FileSystem, doc: &CanvasDocument) -> WorkspaceResult<()> {
        let json = doc.to_json().map_err(|source| WorkspaceError::Document {
            path: self.path.clone(),
            source,
        })?;
        write_atomic(fs, &self.path, &json).map_err(|source| WorkspaceError::Persist {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), elements = doc.elements.len(), "Saved canvas document");
        Ok(())
    }
}
