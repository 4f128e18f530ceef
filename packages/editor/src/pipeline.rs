//! # Update Pipeline
//!
//! Applies one ingested stylesheet to a loaded canvas document:
//! Reconcile → Analyze → Place → Regroup → Prune layers → Tokens → Palette
//!
//! The pipeline does no I/O; loading and persisting the document is the
//! caller's job.

use crate::reconcile::{reconcile_at, ElementOutcome, OutcomeCounts, ReconcileWarning};
use chrono::{DateTime, Utc};
use stylebridge_canvas::{extract_palette, merge_palettes, CanvasDocument};
use stylebridge_evaluator::IngestedFile;
use stylebridge_inference::{
    FallbackPlacement, IndexOffset, LayoutAnalyzer, PlacementEngine, PlacementOptions,
    SeededJitter, DEFAULT_PROXIMITY_THRESHOLD,
};
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub proximity_threshold: f64,
    pub preserve_positions: bool,
    /// Seed for jittered fallback placement; index offsets when absent
    pub placement_seed: Option<u64>,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            preserve_positions: true,
            placement_seed: None,
        }
    }
}

impl UpdateOptions {
    fn fallback(&self) -> Box<dyn FallbackPlacement> {
        match self.placement_seed {
            Some(seed) => Box::new(SeededJitter::new(seed)),
            None => Box::new(IndexOffset::default()),
        }
    }
}

/// What one update did to the document
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSummary {
    pub source_file: String,
    pub counts: OutcomeCounts,
    pub outcomes: Vec<ElementOutcome>,
    pub warnings: Vec<ReconcileWarning>,
    pub placed: usize,
    pub tokens: usize,
}

/// Apply an ingested stylesheet using the current time
pub fn apply_update(
    doc: &mut CanvasDocument,
    ingested: IngestedFile,
    options: &UpdateOptions,
) -> UpdateSummary {
    apply_update_at(doc, ingested, options, Utc::now())
}

#[instrument(skip_all, fields(file = %ingested.path, fresh = ingested.elements.len()))]
pub fn apply_update_at(
    doc: &mut CanvasDocument,
    ingested: IngestedFile,
    options: &UpdateOptions,
    now: DateTime<Utc>,
) -> UpdateSummary {
    let IngestedFile {
        path,
        elements,
        tokens,
    } = ingested;

    let reconciliation = reconcile_at(&doc.elements, elements, &path, now);
    let counts = reconciliation.counts();
    doc.elements = reconciliation.elements;

    // Containers and hierarchy drive placement; groups need final positions
    let analyzer = LayoutAnalyzer::new(options.proximity_threshold);
    let mut analysis = analyzer.analyze(&doc.elements);

    let placement_options = PlacementOptions {
        preserve_positions: options.preserve_positions,
        ..Default::default()
    };
    let report = PlacementEngine::new(placement_options)
        .with_fallback(options.fallback())
        .place(&mut doc.elements, &analysis);

    analysis.groups = analyzer.proximity_groups(&doc.elements);
    doc.layout_analysis = analysis;
    doc.prune_layer_members();

    doc.design_tokens.merge(&tokens);
    let fresh_palette = extract_palette(&doc.elements, &doc.design_tokens);
    doc.color_palette = merge_palettes(&doc.color_palette, &fresh_palette);

    doc.touch(&path, now);

    info!(
        kept = counts.kept,
        updated = counts.updated,
        added = counts.added,
        removed = counts.removed,
        placed = report.len(),
        "Applied stylesheet update"
    );

    UpdateSummary {
        source_file: path,
        counts,
        outcomes: reconciliation.outcomes,
        warnings: reconciliation.warnings,
        placed: report.len(),
        tokens: tokens.len(),
    }
}
