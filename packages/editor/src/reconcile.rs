//! # Reconciliation
//!
//! Merges freshly parsed elements for one stylesheet into the existing
//! element list while keeping identity stable.
//!
//! Elements owned by other stylesheets are passed through untouched. Owned
//! elements are matched by selector, or by id when the selector changed; a
//! match keeps the designer-owned fields (`id`, `position`, `layerId`,
//! `canvasMetadata`) and takes every CSS-derived field from the fresh parse.
//! Owned elements that no fresh element matches are removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use stylebridge_canvas::CanvasElement;
use tracing::{debug, instrument, warn};

/// What reconciliation did to one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileOutcome {
    /// Matched and nothing derived from CSS changed
    Kept,
    /// Matched and at least one derived field changed
    Updated,
    /// New selector, adopted with its fresh id
    Added,
    /// Owned element whose selector no longer appears
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementOutcome {
    pub id: String,
    pub selector: String,
    pub outcome: ReconcileOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeCounts {
    pub kept: usize,
    pub updated: usize,
    pub added: usize,
    pub removed: usize,
}

impl OutcomeCounts {
    pub fn total(&self) -> usize {
        self.kept + self.updated + self.added + self.removed
    }

    pub fn has_changes(&self) -> bool {
        self.updated + self.added + self.removed > 0
    }
}

/// Non-fatal conditions worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReconcileWarning {
    /// The stylesheet used to contribute elements and now contributes none
    EmptiedStylesheet { source_file: String, removed: usize },
    /// Not a single fresh element matched a previously owned one
    NoMatches { source_file: String, previous: usize },
}

impl fmt::Display for ReconcileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileWarning::EmptiedStylesheet {
                source_file,
                removed,
            } => write!(
                f,
                "{} no longer defines any elements; removed {}",
                source_file, removed
            ),
            ReconcileWarning::NoMatches {
                source_file,
                previous,
            } => write!(
                f,
                "none of the {} elements previously defined by {} matched the new stylesheet",
                previous, source_file
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// Foreign elements in their original order, then this file's elements
    pub elements: Vec<CanvasElement>,
    pub outcomes: Vec<ElementOutcome>,
    pub warnings: Vec<ReconcileWarning>,
}

impl Reconciliation {
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for outcome in &self.outcomes {
            match outcome.outcome {
                ReconcileOutcome::Kept => counts.kept += 1,
                ReconcileOutcome::Updated => counts.updated += 1,
                ReconcileOutcome::Added => counts.added += 1,
                ReconcileOutcome::Removed => counts.removed += 1,
            }
        }
        counts
    }

    pub fn outcome_of(&self, id: &str) -> Option<ReconcileOutcome> {
        self.outcomes.iter().find(|o| o.id == id).map(|o| o.outcome)
    }
}

fn matches(candidate: &CanvasElement, fresh: &CanvasElement, source_file: &str) -> bool {
    candidate.css_selector == fresh.css_selector
        || (candidate.is_from(source_file) && candidate.id == fresh.id)
}

/// Fresh derived fields with the matched element's identity laid over them
fn overlay(matched: &CanvasElement, fresh: CanvasElement, source_file: &str) -> CanvasElement {
    CanvasElement {
        id: matched.id.clone(),
        position: matched.position.or(fresh.position),
        layer_id: matched.layer_id.clone().or(fresh.layer_id),
        canvas_metadata: matched.canvas_metadata.clone(),
        last_modified: matched.last_modified,
        source_file: Some(source_file.to_string()),
        ..fresh
    }
}

fn changed(previous: &CanvasElement, merged: &CanvasElement) -> bool {
    !previous.derived_eq(merged) || previous.css_selector != merged.css_selector
}

/// Reconcile with the current time as the modification stamp
pub fn reconcile(
    existing: &[CanvasElement],
    fresh: Vec<CanvasElement>,
    source_file: &str,
) -> Reconciliation {
    reconcile_at(existing, fresh, source_file, Utc::now())
}

/// Merge `fresh` (everything `source_file` now defines) into `existing`
#[instrument(skip(existing, fresh, now), fields(existing = existing.len(), fresh = fresh.len()))]
pub fn reconcile_at(
    existing: &[CanvasElement],
    fresh: Vec<CanvasElement>,
    source_file: &str,
    now: DateTime<Utc>,
) -> Reconciliation {
    let (foreign, owned): (Vec<&CanvasElement>, Vec<&CanvasElement>) =
        existing.iter().partition(|e| !e.is_from(source_file));

    let fresh_count = fresh.len();
    let mut consumed: HashSet<usize> = HashSet::new();
    let mut merged: Vec<CanvasElement> = Vec::with_capacity(fresh_count);
    let mut merged_outcomes: Vec<ReconcileOutcome> = Vec::with_capacity(fresh_count);
    let mut matched_owned = 0usize;

    for element in fresh {
        // A selector seen earlier in this pass updates that element in place
        if let Some(slot) = merged.iter().position(|m| matches(m, &element, source_file)) {
            let previous = merged[slot].clone();
            let mut next = overlay(&previous, element, source_file);
            next.last_modified = Some(now);
            if changed(&previous, &next) && merged_outcomes[slot] == ReconcileOutcome::Kept {
                merged_outcomes[slot] = ReconcileOutcome::Updated;
            }
            merged[slot] = next;
            continue;
        }

        let found = owned
            .iter()
            .enumerate()
            .find(|(index, o)| !consumed.contains(index) && matches(o, &element, source_file))
            .map(|(index, o)| (index, *o));

        match found {
            Some((index, previous)) => {
                consumed.insert(index);
                matched_owned += 1;
                let mut next = overlay(previous, element, source_file);
                next.last_modified = Some(now);
                let outcome = if changed(previous, &next) {
                    ReconcileOutcome::Updated
                } else {
                    ReconcileOutcome::Kept
                };
                debug!(id = %next.id, selector = %next.css_selector, ?outcome, "Matched element");
                merged.push(next);
                merged_outcomes.push(outcome);
            }
            None => {
                let mut adopted = element;
                adopted.source_file = Some(source_file.to_string());
                adopted.last_modified = Some(now);
                debug!(id = %adopted.id, selector = %adopted.css_selector, "Adopted element");
                merged.push(adopted);
                merged_outcomes.push(ReconcileOutcome::Added);
            }
        }
    }

    let mut outcomes: Vec<ElementOutcome> = merged
        .iter()
        .zip(&merged_outcomes)
        .map(|(element, outcome)| ElementOutcome {
            id: element.id.clone(),
            selector: element.css_selector.clone(),
            outcome: *outcome,
        })
        .collect();

    for (index, element) in owned.iter().enumerate() {
        if !consumed.contains(&index) {
            debug!(id = %element.id, selector = %element.css_selector, "Removed element");
            outcomes.push(ElementOutcome {
                id: element.id.clone(),
                selector: element.css_selector.clone(),
                outcome: ReconcileOutcome::Removed,
            });
        }
    }

    let mut warnings = Vec::new();
    if !owned.is_empty() && fresh_count == 0 {
        warnings.push(ReconcileWarning::EmptiedStylesheet {
            source_file: source_file.to_string(),
            removed: owned.len(),
        });
    } else if !owned.is_empty() && matched_owned == 0 {
        warnings.push(ReconcileWarning::NoMatches {
            source_file: source_file.to_string(),
            previous: owned.len(),
        });
    }
    for warning in &warnings {
        warn!(%warning, "Reconciliation warning");
    }

    let mut elements: Vec<CanvasElement> = foreign.into_iter().cloned().collect();
    elements.extend(merged);

    Reconciliation {
        elements,
        outcomes,
        warnings,
    }
}
