use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stylebridge_canvas::CanvasDocument;
use stylebridge_editor::{OutcomeCounts, ReconcileWarning};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeType {
    CssUpdate,
    Error,
}

/// What observers learn about one processed file change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeDescriptor {
    pub file_path: String,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<OutcomeCounts>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ReconcileWarning>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChangeDescriptor {
    pub fn updated(
        file_path: impl Into<String>,
        counts: OutcomeCounts,
        warnings: Vec<ReconcileWarning>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            change_type: ChangeType::CssUpdate,
            counts: Some(counts),
            warnings,
            error: None,
            timestamp,
        }
    }

    pub fn failed(file_path: impl Into<String>, error: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            file_path: file_path.into(),
            change_type: ChangeType::Error,
            counts: None,
            warnings: Vec::new(),
            error: Some(error.into()),
            timestamp,
        }
    }

    pub fn is_error(&self) -> bool {
        self.change_type == ChangeType::Error
    }
}

/// Called once per processed change; the document is absent on error
pub type Observer = Box<dyn FnMut(Option<&CanvasDocument>, &ChangeDescriptor) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

/// Registered observers, notified in subscription order
#[derive(Default)]
pub struct Observers {
    next_id: u64,
    entries: Vec<(ObserverId, Observer)>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, observer: Observer) -> ObserverId {
        self.next_id += 1;
        let id = ObserverId(self.next_id);
        self.entries.push((id, observer));
        id
    }

    /// Returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn notify(&mut self, doc: Option<&CanvasDocument>, change: &ChangeDescriptor) {
        for (_, observer) in &mut self.entries {
            observer(doc, change);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
