//! # Stylebridge Canvas
//!
//! The canvas document model: positioned elements derived from CSS rules,
//! layers, design tokens, the color palette and the derived layout analysis.
//!
//! The whole document serializes to one camelCase JSON file.

pub mod analysis;
pub mod document;
pub mod element;
pub mod error;
pub mod palette;
pub mod tokens;

pub use analysis::{Bounds, ContainerEntry, GroupEntry, HierarchyNode, LayoutAnalysis};
pub use document::{CanvasDocument, CanvasSettings, DocumentMetadata, GridSettings, Layer};
pub use element::{
    CanvasElement, ElementType, FlexDirection, LayoutKind, LayoutSpec, Position, Size, StyleMap,
};
pub use error::{CanvasError, CanvasResult};
pub use palette::{extract_palette, is_color, merge_palettes, ColorPaletteEntry, ColorUsage};
pub use tokens::{
    export_tokens, extract_tokens, next_free_identifier, sanitize_token_name, DesignTokens, TokenCategory, TokenExport,
    TokenWarning,
};
