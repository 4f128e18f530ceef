//! # Stylebridge Inference
//!
//! Derives structure the stylesheets never state explicitly:
//!
//! - **Containers**: elements with a flexbox or grid layout, and the
//!   elements nested inside them
//! - **Proximity groups**: elements sitting close together on the canvas
//! - **Hierarchy**: a forest of selector nesting
//! - **Placement**: initial coordinates for elements nobody has positioned
//!
//! Nesting is decided by a pluggable [`HierarchyBuilder`]; the shipped
//! [`TextualContainmentHeuristic`] works on selector text only.
//!
//! ## Example
//!
//! ```rust
//! use stylebridge_canvas::{CanvasElement, ElementType, FlexDirection, LayoutSpec};
//! use stylebridge_inference::{LayoutAnalyzer, PlacementEngine, PlacementOptions};
//!
//! let mut elements = vec![
//!     CanvasElement::new("card", ElementType::Group, ".card")
//!         .with_layout(LayoutSpec::flexbox(FlexDirection::Column)),
//!     CanvasElement::new("title", ElementType::Text, ".card .title"),
//! ];
//!
//! let analysis = LayoutAnalyzer::default().analyze(&elements);
//! assert_eq!(analysis.containers[0].children, vec!["title".to_string()]);
//!
//! PlacementEngine::new(PlacementOptions::default()).place(&mut elements, &analysis);
//! assert!(elements.iter().all(|e| e.position.is_some()));
//! ```

pub mod analyzer;
pub mod hierarchy;
pub mod options;
pub mod placement;

pub use analyzer::LayoutAnalyzer;
pub use hierarchy::{build_forest, HierarchyBuilder, TextualContainmentHeuristic};
pub use options::{PlacementOptions, DEFAULT_PROXIMITY_THRESHOLD};
pub use placement::{
    FallbackPlacement, IndexOffset, PlacementEngine, PlacementReport, SeededJitter,
};
