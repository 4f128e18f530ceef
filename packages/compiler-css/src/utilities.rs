//! `utilities.css`: spacing scale, palette color classes and typography
//! classes collected from text elements.

use crate::components::px;
use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};
use stylebridge_canvas::{
    next_free_identifier, sanitize_token_name, CanvasDocument, ElementType, TokenWarning,
};
use stylebridge_parser::{Declaration, Serializer};
use tracing::warn;

/// Multiples of the grid size
pub const SPACING_SCALE: [u32; 10] = [0, 1, 2, 3, 4, 6, 8, 12, 16, 24];

const SPACING_CLASSES: &[(&str, &str)] = &[("p", "padding"), ("m", "margin"), ("gap", "gap")];

/// Leading number of a CSS value, for ordering (`"1.5rem"` -> 1.5)
fn numeric_prefix(value: &str) -> f64 {
    let end = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0.0)
}

/// Distinct values of one style key across text elements, ordered by
/// numeric value then text
pub fn distinct_text_values(doc: &CanvasDocument, key: &str) -> Vec<String> {
    let values: BTreeSet<(OrderedFloat<f64>, String)> = doc
        .elements
        .iter()
        .filter(|e| e.element_type == ElementType::Text)
        .filter_map(|e| e.style.get(key))
        .map(|v| (OrderedFloat(numeric_prefix(v)), v.clone()))
        .collect();
    values.into_iter().map(|(_, v)| v).collect()
}

fn spacing_rules(grid_size: f64, serializer: &Serializer) -> Vec<String> {
    let mut blocks = Vec::new();
    for (prefix, property) in SPACING_CLASSES {
        for step in SPACING_SCALE {
            blocks.push(serializer.render_rule(
                &format!(".{}-{}", prefix, step),
                &[Declaration::new(*property, px(step as f64 * grid_size))],
            ));
        }
    }
    blocks
}

/// Class suffix per palette entry, in palette order. A name that collides
/// with an earlier one gets a numeric suffix and a warning.
fn palette_class_names(doc: &CanvasDocument) -> (Vec<String>, Vec<TokenWarning>) {
    let mut taken: HashMap<String, String> = HashMap::new();
    let mut names = Vec::with_capacity(doc.color_palette.len());
    let mut warnings = Vec::new();

    for entry in &doc.color_palette {
        let identifier = sanitize_token_name(&entry.name);
        let name = match taken.get(&identifier) {
            None => identifier,
            Some(first) => {
                let renamed = next_free_identifier(&taken, &identifier);
                let warning = TokenWarning::PaletteCollision {
                    identifier,
                    first: first.clone(),
                    second: entry.name.clone(),
                    renamed_to: renamed.clone(),
                };
                warn!(%warning, "Palette class collision");
                warnings.push(warning);
                renamed
            }
        };
        taken.insert(name.clone(), entry.name.clone());
        names.push(name);
    }

    (names, warnings)
}

fn color_rules(
    doc: &CanvasDocument,
    serializer: &Serializer,
) -> (Vec<String>, Vec<TokenWarning>) {
    let (names, warnings) = palette_class_names(doc);
    let mut blocks = Vec::new();
    for (entry, name) in doc.color_palette.iter().zip(&names) {
        for (prefix, property) in [
            ("bg", "background-color"),
            ("text", "color"),
            ("border", "border-color"),
        ] {
            blocks.push(serializer.render_rule(
                &format!(".{}-{}", prefix, name),
                &[Declaration::new(property, entry.color.clone())],
            ));
        }
    }
    (blocks, warnings)
}

fn typography_rules(doc: &CanvasDocument, serializer: &Serializer) -> Vec<String> {
    let mut blocks = Vec::new();
    for (key, prefix, property) in [
        ("fontSize", "font-size", "font-size"),
        ("fontWeight", "font-weight", "font-weight"),
    ] {
        for value in distinct_text_values(doc, key) {
            blocks.push(serializer.render_rule(
                &format!(".{}-{}", prefix, sanitize_token_name(&value)),
                &[Declaration::new(property, value)],
            ));
        }
    }
    blocks
}

/// Render `utilities.css` along with any palette class collisions
pub fn render_utilities(
    doc: &CanvasDocument,
    serializer: &Serializer,
) -> (String, Vec<TokenWarning>) {
    let mut blocks = spacing_rules(doc.canvas.grid.size, serializer);
    let (colors, warnings) = color_rules(doc, serializer);
    blocks.extend(colors);
    blocks.extend(typography_rules(doc, serializer));
    (blocks.join("\n"), warnings)
}
