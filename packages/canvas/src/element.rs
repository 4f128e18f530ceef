//! Canvas elements - one positioned design element per CSS selector.

use crate::analysis::Bounds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CSS-like style properties (`fill`, `stroke`, `fontSize`, ...)
pub type StyleMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Rectangle,
    Circle,
    Text,
    Group,
    Line,
    Image,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Rectangle => "rectangle",
            ElementType::Circle => "circle",
            ElementType::Text => "text",
            ElementType::Group => "group",
            ElementType::Line => "line",
            ElementType::Image => "image",
        }
    }

    /// Size used when the stylesheet does not declare one
    pub fn default_size(&self) -> Size {
        match self {
            ElementType::Text => Size::new(200.0, 24.0),
            ElementType::Group => Size::new(320.0, 200.0),
            ElementType::Line => Size::new(120.0, 1.0),
            _ => Size::new(120.0, 48.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_origin(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Flexbox,
    Grid,
}

impl LayoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutKind::Flexbox => "flexbox",
            LayoutKind::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    pub fn as_css(&self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::Column => "column",
        }
    }
}

/// Layout container properties, present when an element lays out children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSpec {
    #[serde(rename = "type")]
    pub kind: LayoutKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<FlexDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_items: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<String>,
    /// `grid-template-columns` for grid containers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<String>,
}

impl LayoutSpec {
    pub fn flexbox(direction: FlexDirection) -> Self {
        Self {
            kind: LayoutKind::Flexbox,
            direction: Some(direction),
            gap: None,
            justify_content: None,
            align_items: None,
            wrap: None,
            columns: None,
        }
    }

    pub fn grid() -> Self {
        Self {
            kind: LayoutKind::Grid,
            direction: None,
            gap: None,
            justify_content: None,
            align_items: None,
            wrap: None,
            columns: None,
        }
    }

    /// Flex containers default to row, mirroring CSS
    pub fn effective_direction(&self) -> FlexDirection {
        self.direction.unwrap_or(FlexDirection::Row)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    pub id: String,

    #[serde(rename = "type")]
    pub element_type: ElementType,

    #[serde(default)]
    pub size: Size,

    /// Designer or placement owned; absent until placed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,

    #[serde(default)]
    pub style: StyleMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutSpec>,

    /// Text label for text and button-like elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default)]
    pub css_selector: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,

    /// Opaque designer data; sync never writes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_metadata: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl CanvasElement {
    pub fn new(id: impl Into<String>, element_type: ElementType, selector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            element_type,
            size: element_type.default_size(),
            position: None,
            style: StyleMap::new(),
            layout: None,
            content: None,
            css_selector: selector.into(),
            source_file: None,
            layer_id: None,
            canvas_metadata: None,
            last_modified: None,
        }
    }

    pub fn with_style(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(key.into(), value.into());
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position::new(x, y));
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }

    pub fn with_layout(mut self, layout: LayoutSpec) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_source_file(mut self, path: impl Into<String>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Position, treating an unplaced element as sitting at the origin
    pub fn position_or_origin(&self) -> Position {
        self.position.unwrap_or_default()
    }

    /// True when the element has no position or sits at the origin
    pub fn needs_placement(&self) -> bool {
        self.position.map_or(true, |p| p.is_origin())
    }

    pub fn is_from(&self, source_file: &str) -> bool {
        self.source_file.as_deref() == Some(source_file)
    }

    pub fn bounds(&self) -> Bounds {
        let position = self.position_or_origin();
        Bounds::new(position.x, position.y, self.size.width, self.size.height)
    }

    /// Compare the fields derived from the stylesheet
    pub fn derived_eq(&self, other: &CanvasElement) -> bool {
        self.element_type == other.element_type
            && self.size == other.size
            && self.style == other.style
            && self.layout == other.layout
            && self.content == other.content
    }
}
