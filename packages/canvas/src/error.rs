use stylebridge_parser::ParseError;
use thiserror::Error;

pub type CanvasResult<T> = Result<T, CanvasError>;

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("Element '{0}' not found")]
    ElementNotFound(String),

    #[error("Layer '{0}' not found")]
    LayerNotFound(String),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
