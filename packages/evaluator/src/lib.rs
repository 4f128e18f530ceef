//! # Stylebridge Evaluator
//!
//! Ingestion of stylesheets: every plain style rule becomes one draft
//! canvas element, every custom property becomes a design token.
//!
//! Drafts carry fresh ids and no position, layer or designer metadata.
//! Identity is restored later by reconciliation against the persisted
//! document.

pub mod ingest;
pub mod style_mapping;

pub use ingest::{
    elements_from_stylesheet, elements_with_ids, parse_file, parse_source, IngestError,
    IngestResult, IngestedFile,
};
pub use style_mapping::{camel_case, classify, label_from_selector, map_rule, MappedRule};
