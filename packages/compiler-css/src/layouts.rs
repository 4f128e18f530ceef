//! `layouts.css`: container rules, layer layouts and the responsive
//! stacking breakpoints.

use crate::components::px;
use ordered_float::OrderedFloat;
use std::collections::BTreeSet;
use stylebridge_canvas::{
    sanitize_token_name, CanvasDocument, CanvasElement, FlexDirection, LayoutKind, LayoutSpec,
};
use stylebridge_parser::{Declaration, Serializer};

pub const MOBILE_QUERY: &str = "(max-width: 768px)";
pub const TABLET_QUERY: &str = "(max-width: 1024px)";

const DEFAULT_GRID_COLUMNS: &str = "repeat(3, 1fr)";

/// Used in the breakpoints when the document has no containers or layers
const FALLBACK_STACK_SELECTOR: &str = "[class*=\"layer-\"]";

/// How a layer's members are arranged on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerArrangement {
    Row,
    Column,
    Grid { columns: usize },
}

/// Row when every member shares a y, column when every member shares an x,
/// otherwise a grid as wide as the number of distinct x positions.
pub fn infer_arrangement(members: &[&CanvasElement]) -> LayerArrangement {
    let xs: BTreeSet<OrderedFloat<f64>> = members
        .iter()
        .map(|e| OrderedFloat(e.position_or_origin().x))
        .collect();
    let ys: BTreeSet<OrderedFloat<f64>> = members
        .iter()
        .map(|e| OrderedFloat(e.position_or_origin().y))
        .collect();

    if ys.len() == 1 {
        LayerArrangement::Row
    } else if xs.len() == 1 {
        LayerArrangement::Column
    } else {
        LayerArrangement::Grid { columns: xs.len() }
    }
}

pub fn layer_selector(name: &str) -> String {
    format!(".layer-{}", sanitize_token_name(name))
}

fn container_declarations(layout: &LayoutSpec) -> Vec<Declaration> {
    let mut out = Vec::new();
    match layout.kind {
        LayoutKind::Flexbox => {
            out.push(Declaration::new("display", "flex"));
            out.push(Declaration::new(
                "flex-direction",
                layout.effective_direction().as_css(),
            ));
            if let Some(wrap) = &layout.wrap {
                out.push(Declaration::new("flex-wrap", wrap.clone()));
            }
        }
        LayoutKind::Grid => {
            out.push(Declaration::new("display", "grid"));
            out.push(Declaration::new(
                "grid-template-columns",
                layout.columns.as_deref().unwrap_or(DEFAULT_GRID_COLUMNS),
            ));
        }
    }
    if let Some(gap) = &layout.gap {
        out.push(Declaration::new("gap", gap.clone()));
    }
    if let Some(justify) = &layout.justify_content {
        out.push(Declaration::new("justify-content", justify.clone()));
    }
    if let Some(align) = &layout.align_items {
        out.push(Declaration::new("align-items", align.clone()));
    }
    out
}

fn arrangement_declarations(arrangement: LayerArrangement, gap: f64) -> Vec<Declaration> {
    let mut out = match arrangement {
        LayerArrangement::Row | LayerArrangement::Column => {
            let direction = if arrangement == LayerArrangement::Row {
                FlexDirection::Row
            } else {
                FlexDirection::Column
            };
            vec![
                Declaration::new("display", "flex"),
                Declaration::new("flex-direction", direction.as_css()),
            ]
        }
        LayerArrangement::Grid { columns } => vec![
            Declaration::new("display", "grid"),
            Declaration::new("grid-template-columns", format!("repeat({}, 1fr)", columns)),
        ],
    };
    out.push(Declaration::new("gap", px(gap)));
    out
}

/// Render `layouts.css`
pub fn render_layouts(doc: &CanvasDocument, serializer: &Serializer) -> String {
    let mut blocks = Vec::new();
    let mut flex_selectors = Vec::new();
    let mut grid_selectors = Vec::new();

    for element in &doc.elements {
        let Some(layout) = &element.layout else {
            continue;
        };
        blocks.push(serializer.render_rule(&element.css_selector, &container_declarations(layout)));
        match layout.kind {
            LayoutKind::Flexbox => flex_selectors.push(element.css_selector.clone()),
            LayoutKind::Grid => grid_selectors.push(element.css_selector.clone()),
        }
    }

    for layer in &doc.layers {
        let members = doc.layer_members(&layer.id);
        if members.len() < 2 {
            continue;
        }
        let arrangement = infer_arrangement(&members);
        let selector = layer_selector(&layer.name);
        blocks.push(serializer.render_rule(
            &selector,
            &arrangement_declarations(arrangement, doc.canvas.grid.size),
        ));
        match arrangement {
            LayerArrangement::Grid { .. } => grid_selectors.push(selector),
            _ => flex_selectors.push(selector),
        }
    }

    if flex_selectors.is_empty() && grid_selectors.is_empty() {
        flex_selectors.push(FALLBACK_STACK_SELECTOR.to_string());
    }

    blocks.push(serializer.render_media(
        MOBILE_QUERY,
        &breakpoint_rules(&flex_selectors, &grid_selectors, ("flex-direction", "column"), "1fr"),
    ));
    blocks.push(serializer.render_media(
        TABLET_QUERY,
        &breakpoint_rules(
            &flex_selectors,
            &grid_selectors,
            ("flex-wrap", "wrap"),
            "repeat(2, 1fr)",
        ),
    ));

    blocks.join("\n")
}

fn breakpoint_rules(
    flex_selectors: &[String],
    grid_selectors: &[String],
    (flex_property, flex_value): (&str, &str),
    grid_columns: &str,
) -> Vec<(String, Vec<Declaration>)> {
    let mut rules = Vec::new();
    if !flex_selectors.is_empty() {
        rules.push((
            flex_selectors.join(", "),
            vec![Declaration::new(flex_property, flex_value)],
        ));
    }
    if !grid_selectors.is_empty() {
        rules.push((
            grid_selectors.join(", "),
            vec![Declaration::new("grid-template-columns", grid_columns)],
        ));
    }
    rules
}
