//! # Stylebridge Editor
//!
//! Applies stylesheet changes to a canvas document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ evaluator: stylesheet → draft elements      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: merge drafts into the document      │
//! │  - Reconcile per source file                │
//! │  - Re-run layout analysis and placement     │
//! │  - Merge tokens and the color palette       │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: persist + notify observers       │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Stylesheets own derived fields**: type, size, style, layout, content
//! 2. **The designer owns identity**: id, position, layer, canvas metadata
//! 3. **File isolation**: an update never touches another file's elements
//! 4. **Explicit outcomes**: every element is Kept, Updated, Added or Removed
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stylebridge_editor::{apply_update, UpdateOptions};
//!
//! let ingested = stylebridge_evaluator::parse_file(&fs, path)?;
//! let summary = apply_update(&mut doc, ingested, &UpdateOptions::default());
//! println!("{} added, {} removed", summary.counts.added, summary.counts.removed);
//! ```

pub mod pipeline;
pub mod reconcile;

pub use pipeline::{apply_update, apply_update_at, UpdateOptions, UpdateSummary};
pub use reconcile::{
    reconcile, reconcile_at, ElementOutcome, OutcomeCounts, ReconcileOutcome, ReconcileWarning,
    Reconciliation,
};
