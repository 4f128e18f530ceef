use std::path::PathBuf;
use stylebridge_canvas::CanvasError;
use stylebridge_compiler_css::CompileError;
use stylebridge_evaluator::IngestError;
use thiserror::Error;

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt canvas document {path}: {source}")]
    Document {
        path: PathBuf,
        #[source]
        source: CanvasError,
    },

    #[error("Failed to persist {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Invalid watch pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Failed to create watcher: {0}")]
    Watcher(#[from] notify::Error),
}
