//! # Canvas Document
//!
//! The aggregate root persisted as a single JSON file. It is read, modified
//! and written back whole on every stylesheet-triggered update.

use crate::analysis::LayoutAnalysis;
use crate::element::CanvasElement;
use crate::error::{CanvasError, CanvasResult};
use crate::palette::ColorPaletteEntry;
use crate::tokens::DesignTokens;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

pub const DOCUMENT_VERSION: &str = "1.0";
pub const GENERATOR: &str = "stylebridge";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSettings {
    pub enabled: bool,
    /// Base unit for the spacing scale
    pub size: f64,
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 8.0,
            snap: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    pub width: f64,
    pub height: f64,
    pub background_color: String,
    #[serde(default)]
    pub grid: GridSettings,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            background_color: "#ffffff".to_string(),
            grid: GridSettings::default(),
        }
    }
}

/// Grouping and visibility unit. Holds element ids, not elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub id: String,
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub elements: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Layer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            visible: true,
            locked: false,
            elements: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub version: String,
    pub created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub source_files: BTreeSet<String>,
    #[serde(default)]
    pub generator: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: DOCUMENT_VERSION.to_string(),
            created: now,
            last_modified: now,
            source_files: BTreeSet::new(),
            generator: GENERATOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    #[serde(default)]
    pub canvas: CanvasSettings,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub elements: Vec<CanvasElement>,
    #[serde(default)]
    pub color_palette: Vec<ColorPaletteEntry>,
    #[serde(default)]
    pub design_tokens: DesignTokens,
    #[serde(default)]
    pub layout_analysis: LayoutAnalysis,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            canvas: CanvasSettings::default(),
            layers: vec![Layer::new("layer-1", "Layer 1")],
            elements: Vec::new(),
            color_palette: Vec::new(),
            design_tokens: DesignTokens::default(),
            layout_analysis: LayoutAnalysis::default(),
            metadata: DocumentMetadata::default(),
        }
    }
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> CanvasResult<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn element(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn element_by_selector(&self, selector: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.css_selector == selector)
    }

    /// Elements contributed by one stylesheet
    pub fn elements_from<'a>(&'a self, source_file: &'a str) -> impl Iterator<Item = &'a CanvasElement> {
        self.elements.iter().filter(move |e| e.is_from(source_file))
    }

    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Member elements of a layer, in layer order
    pub fn layer_members(&self, layer_id: &str) -> Vec<&CanvasElement> {
        match self.layer(layer_id) {
            Some(layer) => layer.elements.iter().filter_map(|id| self.element(id)).collect(),
            None => Vec::new(),
        }
    }

    /// Add an empty layer and return its id
    pub fn add_layer(&mut self, name: impl Into<String>) -> String {
        let mut n = self.layers.len() + 1;
        let mut id = format!("layer-{}", n);
        while self.layer(&id).is_some() {
            n += 1;
            id = format!("layer-{}", n);
        }
        self.layers.push(Layer::new(id.clone(), name));
        id
    }

    /// Move an element into a layer, leaving any previous layer
    pub fn assign_to_layer(&mut self, element_id: &str, layer_id: &str) -> CanvasResult<()> {
        if self.layer(layer_id).is_none() {
            return Err(CanvasError::LayerNotFound(layer_id.to_string()));
        }
        let element = self
            .element_mut(element_id)
            .ok_or_else(|| CanvasError::ElementNotFound(element_id.to_string()))?;
        element.layer_id = Some(layer_id.to_string());

        for layer in &mut self.layers {
            if layer.id == layer_id {
                if !layer.elements.iter().any(|e| e == element_id) {
                    layer.elements.push(element_id.to_string());
                }
            } else {
                layer.elements.retain(|e| e != element_id);
            }
        }
        Ok(())
    }

    /// Delete a layer; its elements survive unlayered
    pub fn remove_layer(&mut self, layer_id: &str) -> CanvasResult<Layer> {
        let index = self
            .layers
            .iter()
            .position(|l| l.id == layer_id)
            .ok_or_else(|| CanvasError::LayerNotFound(layer_id.to_string()))?;
        let layer = self.layers.remove(index);

        for element in &mut self.elements {
            if element.layer_id.as_deref() == Some(layer_id) {
                element.layer_id = None;
            }
        }
        Ok(layer)
    }

    /// Drop layer memberships that point at missing elements, and clear
    /// element layer references that point at missing layers
    pub fn prune_layer_members(&mut self) -> usize {
        let element_ids: HashSet<&str> = self.elements.iter().map(|e| e.id.as_str()).collect();
        let mut removed = 0;
        for layer in &mut self.layers {
            let before = layer.elements.len();
            layer.elements.retain(|id| element_ids.contains(id.as_str()));
            removed += before - layer.elements.len();
        }

        let layer_ids: HashSet<String> = self.layers.iter().map(|l| l.id.clone()).collect();
        for element in &mut self.elements {
            if let Some(layer_id) = &element.layer_id {
                if !layer_ids.contains(layer_id) {
                    element.layer_id = None;
                }
            }
        }
        removed
    }

    /// Record that a stylesheet contributed to this document
    pub fn touch(&mut self, source_file: &str, now: DateTime<Utc>) {
        self.metadata.source_files.insert(source_file.to_string());
        self.metadata.last_modified = now;
    }
}
