//! Derived layout analysis. Recomputed on every sync pass; never ground truth.

use crate::element::{LayoutKind, LayoutSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest box covering both
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutAnalysis {
    #[serde(default)]
    pub containers: Vec<ContainerEntry>,
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
    #[serde(default)]
    pub hierarchies: Vec<HierarchyNode>,
}

impl LayoutAnalysis {
    pub fn container(&self, id: &str) -> Option<&ContainerEntry> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Group containing the element, if any
    pub fn group_of(&self, element_id: &str) -> Option<&GroupEntry> {
        self.groups
            .iter()
            .find(|g| g.elements.iter().any(|e| e == element_id))
    }
}

/// A flexbox or grid container and the elements it is inferred to hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerEntry {
    /// Element id of the container
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    pub selector: String,
    pub properties: LayoutSpec,
    /// Element ids, in element order
    #[serde(default)]
    pub children: Vec<String>,
}

/// Elements clustered by proximity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub id: String,
    /// Element ids, seed first
    pub elements: Vec<String>,
    pub bounds: Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Element id
    pub element: String,
    pub selector: String,
    #[serde(default)]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn leaf(element: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            selector: selector.into(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including self
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(HierarchyNode::size).sum::<usize>()
    }

    pub fn find(&self, element_id: &str) -> Option<&HierarchyNode> {
        if self.element == element_id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(element_id))
    }
}
