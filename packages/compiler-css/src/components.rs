//! Per-element component rules.
//!
//! Every element gets a base rule built from its style map and size.
//! Button-like rectangles and groups get a fixed template on top.

use stylebridge_canvas::{CanvasElement, ElementType, StyleMap};
use stylebridge_parser::{Declaration, Serializer};

/// Style keys folded into the `border` shorthand
const STROKE_KEYS: &[&str] = &["stroke", "strokeWidth", "strokeStyle"];

/// `borderRadius` -> `border-radius`
pub fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// CSS property for a canvas style key
pub fn css_property(key: &str) -> String {
    match key {
        "fill" => "background".to_string(),
        "textColor" => "color".to_string(),
        "shadow" => "box-shadow".to_string(),
        other => kebab_case(other),
    }
}

/// `48` -> `48px`, `12.5` -> `12.5px`
pub fn px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

fn border_shorthand(style: &StyleMap) -> Option<String> {
    let width = style.get("strokeWidth");
    let color = style.get("stroke");
    if width.is_none() && color.is_none() {
        return None;
    }
    if width.map(String::as_str) == Some("0") {
        return Some("none".to_string());
    }
    let line = style.get("strokeStyle").map_or("solid", String::as_str);
    let mut parts = vec![width.map_or("1px", String::as_str), line];
    if let Some(color) = color {
        parts.push(color);
    }
    Some(parts.join(" "))
}

/// Declarations derived from the style map, sorted by style key
pub fn style_declarations(style: &StyleMap) -> Vec<Declaration> {
    let mut declarations = Vec::with_capacity(style.len());
    let mut border_done = false;

    for (key, value) in style {
        if STROKE_KEYS.contains(&key.as_str()) {
            if !border_done {
                border_done = true;
                if let Some(border) = border_shorthand(style) {
                    declarations.push(Declaration::new("border", border));
                }
            }
            continue;
        }
        declarations.push(Declaration::new(css_property(key), value.clone()));
    }
    declarations
}

/// Base rule declarations: size first, then the style map
pub fn base_declarations(element: &CanvasElement) -> Vec<Declaration> {
    let mut declarations = Vec::new();
    if element.element_type != ElementType::Text {
        declarations.push(Declaration::new("width", px(element.size.width)));
        declarations.push(Declaration::new("height", px(element.size.height)));
    }
    declarations.extend(style_declarations(&element.style));
    declarations
}

pub fn is_button(element: &CanvasElement) -> bool {
    element.element_type == ElementType::Rectangle && element.content.is_some()
}

pub fn is_card(element: &CanvasElement) -> bool {
    element.element_type == ElementType::Group
}

fn optional(style: &StyleMap, key: &str, property: &str, out: &mut Vec<Declaration>) {
    if let Some(value) = style.get(key) {
        out.push(Declaration::new(property, value.clone()));
    }
}

/// Keys the templates already emitted
fn template_keys(element: &CanvasElement) -> &'static [&'static str] {
    if is_button(element) {
        &["fill", "borderRadius", "textColor", "padding"]
    } else if is_card(element) {
        &["fill", "borderRadius", "padding", "shadow"]
    } else {
        &[]
    }
}

fn button_declarations(element: &CanvasElement) -> Vec<Declaration> {
    let style = &element.style;
    let mut out = vec![
        Declaration::new("display", "inline-flex"),
        Declaration::new("align-items", "center"),
        Declaration::new("justify-content", "center"),
        Declaration::new(
            "padding",
            style.get("padding").map_or("8px 16px", String::as_str),
        ),
        Declaration::new("cursor", "pointer"),
    ];
    optional(style, "fill", "background", &mut out);
    optional(style, "borderRadius", "border-radius", &mut out);
    optional(style, "textColor", "color", &mut out);
    out
}

fn card_declarations(element: &CanvasElement) -> Vec<Declaration> {
    let style = &element.style;
    let mut out = vec![
        Declaration::new("display", "flex"),
        Declaration::new("flex-direction", "column"),
        Declaration::new(
            "padding",
            style.get("padding").map_or("16px", String::as_str),
        ),
        Declaration::new(
            "box-shadow",
            style
                .get("shadow")
                .map_or("0 1px 3px rgba(0, 0, 0, 0.12)", String::as_str),
        ),
    ];
    optional(style, "fill", "background", &mut out);
    optional(style, "borderRadius", "border-radius", &mut out);
    out
}

/// All rules for one element, as (selector, declarations)
pub fn element_rules(element: &CanvasElement) -> Vec<(String, Vec<Declaration>)> {
    let selector = element.css_selector.clone();
    let mut declarations = if is_button(element) {
        button_declarations(element)
    } else if is_card(element) {
        card_declarations(element)
    } else {
        Vec::new()
    };

    let skip = template_keys(element);
    let mut rest = element.style.clone();
    rest.retain(|key, _| !skip.contains(&key.as_str()));
    let mut base = element.clone();
    base.style = rest;
    declarations.extend(base_declarations(&base));

    let mut rules = vec![(selector.clone(), declarations)];
    if is_button(element) {
        rules.push((
            format!("{}:hover", selector),
            vec![
                Declaration::new("filter", "brightness(0.95)"),
                Declaration::new("transform", "translateY(-1px)"),
            ],
        ));
    }
    rules
}

/// Render `components.css`
pub fn render_components(elements: &[CanvasElement], serializer: &Serializer) -> String {
    let blocks: Vec<String> = elements
        .iter()
        .flat_map(element_rules)
        .map(|(selector, declarations)| serializer.render_rule(&selector, &declarations))
        .collect();
    blocks.join("\n")
}
