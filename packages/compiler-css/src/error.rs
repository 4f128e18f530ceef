use std::path::PathBuf;
use stylebridge_canvas::CanvasError;
use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Token export failed: {0}")]
    Tokens(#[from] CanvasError),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid grid size {0}; expected a positive number")]
    InvalidGridSize(f64),
}
