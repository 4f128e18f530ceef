//! Color palette derived from tokens and element styles.
//!
//! The palette is deduplicated by color value; the first name seen for a
//! color stays its canonical name.

use crate::element::CanvasElement;
use crate::tokens::DesignTokens;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorUsage {
    Token,
    Background,
    Border,
    Text,
}

impl ColorUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorUsage::Token => "token",
            ColorUsage::Background => "background",
            ColorUsage::Border => "border",
            ColorUsage::Text => "text",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPaletteEntry {
    pub name: String,
    pub color: String,
    pub usage: ColorUsage,
}

impl ColorPaletteEntry {
    pub fn new(name: impl Into<String>, color: impl Into<String>, usage: ColorUsage) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            usage,
        }
    }
}

const NAMED_COLORS: &[&str] = &[
    "black", "white", "red", "green", "blue", "yellow", "orange", "purple", "pink", "gray",
    "grey", "silver", "navy", "teal", "maroon", "olive", "lime", "aqua", "fuchsia", "cyan",
    "magenta", "brown", "gold", "indigo", "violet", "coral", "salmon", "crimson", "tomato",
    "transparent",
];

/// Rough check that a CSS value is a literal color
pub fn is_color(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    ["rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "oklch(", "lab("]
        .iter()
        .any(|prefix| value.starts_with(prefix))
        || NAMED_COLORS.contains(&value.as_str())
}

fn color_key(color: &str) -> String {
    color.trim().to_ascii_lowercase()
}

/// Append-only palette that ignores colors it has already seen
#[derive(Debug, Default)]
pub struct PaletteBuilder {
    entries: Vec<ColorPaletteEntry>,
    seen: HashSet<String>,
}

impl PaletteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry; returns false when its color is already present
    pub fn push(&mut self, entry: ColorPaletteEntry) -> bool {
        if self.seen.insert(color_key(&entry.color)) {
            self.entries.push(entry);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn build(self) -> Vec<ColorPaletteEntry> {
        self.entries
    }
}

/// Merge two palettes; on equal colors the entry from `existing` wins
pub fn merge_palettes(
    existing: &[ColorPaletteEntry],
    fresh: &[ColorPaletteEntry],
) -> Vec<ColorPaletteEntry> {
    let mut builder = PaletteBuilder::new();
    for entry in existing.iter().chain(fresh.iter()) {
        builder.push(entry.clone());
    }
    builder.build()
}

/// Derive a palette: token colors first, then fills, strokes and text colors
pub fn extract_palette(elements: &[CanvasElement], tokens: &DesignTokens) -> Vec<ColorPaletteEntry> {
    let mut builder = PaletteBuilder::new();

    for (name, value) in &tokens.colors {
        if is_color(value) {
            builder.push(ColorPaletteEntry::new(name.clone(), value.clone(), ColorUsage::Token));
        }
    }

    let sources = [
        ("fill", ColorUsage::Background),
        ("stroke", ColorUsage::Border),
        ("textColor", ColorUsage::Text),
    ];
    let mut counters = [0usize; 3];

    for element in elements {
        for (index, (key, usage)) in sources.iter().enumerate() {
            let Some(value) = element.style.get(*key) else {
                continue;
            };
            if !is_color(value) {
                continue;
            }
            let name = format!("{}-{}", usage.as_str(), counters[index] + 1);
            if builder.push(ColorPaletteEntry::new(name, value.clone(), *usage)) {
                counters[index] += 1;
            }
        }
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;

    #[test]
    fn test_merge_palettes_first_name_wins() {
        let existing = vec![ColorPaletteEntry::new("a", "#fff", ColorUsage::Token)];
        let fresh = vec![
            ColorPaletteEntry::new("b", "#fff", ColorUsage::Background),
            ColorPaletteEntry::new("c", "#000", ColorUsage::Text),
        ];

        let merged = merge_palettes(&existing, &fresh);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "a");
        assert_eq!(merged[1].name, "c");
    }

    #[test]
    fn test_merge_is_case_insensitive_on_color() {
        let existing = vec![ColorPaletteEntry::new("brand", "#3366FF", ColorUsage::Token)];
        let fresh = vec![ColorPaletteEntry::new("background-1", "#3366ff", ColorUsage::Background)];
        let merged = merge_palettes(&existing, &fresh);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "brand");
    }

    #[test]
    fn test_is_color() {
        assert!(is_color("#eee"));
        assert!(is_color("#3366FF"));
        assert!(is_color("rgba(0, 0, 0, 0.1)"));
        assert!(is_color("White"));
        assert!(!is_color("#zzz"));
        assert!(!is_color("16px"));
        assert!(!is_color("var(--brand)"));
        assert!(!is_color("1px solid #ddd"));
    }

    #[test]
    fn test_extract_palette_orders_tokens_first() {
        let mut tokens = DesignTokens::default();
        tokens.colors.insert("primary".to_string(), "#3366ff".to_string());

        let elements = vec![
            CanvasElement::new("1", ElementType::Rectangle, ".a")
                .with_style("fill", "#3366FF")
                .with_style("stroke", "#ddd"),
            CanvasElement::new("2", ElementType::Text, ".b").with_style("textColor", "#111"),
            CanvasElement::new("3", ElementType::Rectangle, ".c").with_style("fill", "var(--x)"),
        ];

        let palette = extract_palette(&elements, &tokens);
        let names: Vec<&str> = palette.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["primary", "border-1", "text-1"]);
        assert_eq!(palette[1].usage, ColorUsage::Border);
    }
}
