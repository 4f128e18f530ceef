//! # Stylesheet Generation
//!
//! Turns a canvas document back into CSS: design tokens, per-element
//! components, layouts with responsive breakpoints and utility classes.
//!
//! Generation is a pure function of the document. Running it twice on an
//! unchanged document produces byte-identical files.

pub mod components;
pub mod error;
pub mod layouts;
pub mod utilities;
pub mod writer;

pub use error::{CompileError, CompileResult};
pub use writer::write_stylesheets;

use std::collections::BTreeMap;
use stylebridge_canvas::{export_tokens, CanvasDocument, TokenWarning};
use stylebridge_parser::Serializer;
use tracing::{instrument, warn};

pub const TOKENS_CSS: &str = "design-tokens.css";
pub const TOKENS_SCSS: &str = "design-tokens.scss";
pub const TOKENS_JSON: &str = "design-tokens.json";
pub const COMPONENTS_CSS: &str = "components.css";
pub const LAYOUTS_CSS: &str = "layouts.css";
pub const UTILITIES_CSS: &str = "utilities.css";

const HEADER: &str = "/* Generated by stylebridge. Do not edit. */\n\n";

/// Which files `generate` produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub generate_tokens: bool,
    pub generate_components: bool,
    pub generate_layouts: bool,
    pub generate_utilities: bool,
    /// Also emit `design-tokens.scss` alongside the token CSS
    pub generate_scss: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            generate_tokens: true,
            generate_components: true,
            generate_layouts: true,
            generate_utilities: true,
            generate_scss: false,
        }
    }
}

/// Generated files keyed by file name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratedStylesheets {
    files: BTreeMap<String, String>,
    pub warnings: Vec<TokenWarning>,
}

impl GeneratedStylesheets {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn insert_css(&mut self, name: &str, body: &str) {
        let mut css = String::with_capacity(HEADER.len() + body.len());
        css.push_str(HEADER);
        css.push_str(body);
        self.files.insert(name.to_string(), css);
    }
}

/// Generate every enabled stylesheet for a document
#[instrument(skip_all, fields(elements = doc.elements.len()))]
pub fn generate(doc: &CanvasDocument, options: &GenerateOptions) -> CompileResult<GeneratedStylesheets> {
    let grid_size = doc.canvas.grid.size;
    if !(grid_size > 0.0 && grid_size.is_finite()) {
        return Err(CompileError::InvalidGridSize(grid_size));
    }

    let serializer = Serializer::new();
    let mut out = GeneratedStylesheets::default();

    if options.generate_tokens {
        let export = export_tokens(&doc.design_tokens, options.generate_scss)?;
        for warning in &export.warnings {
            warn!(%warning, "Token export warning");
        }
        out.insert_css(TOKENS_CSS, &export.css);
        if let Some(scss) = &export.scss {
            out.insert_css(TOKENS_SCSS, scss);
        }
        out.files.insert(TOKENS_JSON.to_string(), export.json);
        out.warnings = export.warnings;
    }

    if options.generate_components {
        out.insert_css(
            COMPONENTS_CSS,
            &components::render_components(&doc.elements, &serializer),
        );
    }

    if options.generate_layouts {
        out.insert_css(LAYOUTS_CSS, &layouts::render_layouts(doc, &serializer));
    }

    if options.generate_utilities {
        let (css, warnings) = utilities::render_utilities(doc, &serializer);
        out.insert_css(UTILITIES_CSS, &css);
        out.warnings.extend(warnings);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylebridge_canvas::{CanvasElement, ElementType, TokenCategory};

    fn sample() -> CanvasDocument {
        let mut doc = CanvasDocument::new();
        doc.design_tokens
            .insert(TokenCategory::Colors, "primary", "#3366ff");
        doc.elements.push(
            CanvasElement::new("1", ElementType::Rectangle, ".btn")
                .with_content("Btn")
                .with_style("fill", "#3366ff"),
        );
        doc
    }

    #[test]
    fn test_default_file_set() {
        let sheets = generate(&sample(), &GenerateOptions::default()).unwrap();
        let names: Vec<&str> = sheets.names().collect();
        assert_eq!(
            names,
            vec![COMPONENTS_CSS, TOKENS_CSS, TOKENS_JSON, LAYOUTS_CSS, UTILITIES_CSS]
        );
        assert!(sheets.get(COMPONENTS_CSS).unwrap().starts_with(HEADER));
        assert!(sheets.get(TOKENS_JSON).unwrap().starts_with('{'));
    }

    #[test]
    fn test_scss_is_opt_in() {
        let options = GenerateOptions {
            generate_scss: true,
            ..Default::default()
        };
        let sheets = generate(&sample(), &options).unwrap();
        assert!(sheets.get(TOKENS_SCSS).unwrap().contains("$color-primary: #3366ff;"));
    }

    #[test]
    fn test_disabled_outputs_are_skipped() {
        let options = GenerateOptions {
            generate_tokens: false,
            generate_layouts: false,
            generate_utilities: false,
            ..Default::default()
        };
        let sheets = generate(&sample(), &options).unwrap();
        assert_eq!(sheets.names().collect::<Vec<_>>(), vec![COMPONENTS_CSS]);
    }

    #[test]
    fn test_invalid_grid_size() {
        let mut doc = sample();
        doc.canvas.grid.size = 0.0;
        let err = generate(&doc, &GenerateOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidGridSize(size) if size == 0.0));
    }
}
