use crate::style_mapping::{label_from_selector, map_rule};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use stylebridge_canvas::tokens::tokens_from_stylesheet;
use stylebridge_canvas::{CanvasElement, DesignTokens, ElementType};
use stylebridge_common::FileSystem;
use stylebridge_parser::{parse, CssRule, Declaration, IdGenerator, ParseError, Stylesheet};
use thiserror::Error;
use tracing::{debug, info, instrument};

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        /// Stylesheet text, kept for pretty error rendering
        source_text: String,
        #[source]
        source: ParseError,
    },
}

/// Everything one stylesheet contributes to the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedFile {
    pub path: String,
    pub elements: Vec<CanvasElement>,
    pub tokens: DesignTokens,
}

/// Selectors that never become elements
const RESET_SELECTORS: &[&str] = &["*", "html", "body", ":root"];

fn skip_reason(rule: &CssRule) -> Option<&'static str> {
    if rule.media_query.is_some() {
        return Some("responsive variant");
    }
    let all_resets = rule
        .selector
        .split(',')
        .all(|part| RESET_SELECTORS.contains(&part.trim()));
    if all_resets {
        return Some("reset or root selector");
    }
    if has_pseudo(&rule.selector) {
        return Some("pseudo selector");
    }
    if rule.declarations.iter().all(Declaration::is_custom_property) {
        return Some("custom properties only");
    }
    None
}

/// A `:` outside attribute brackets and quotes marks a pseudo-class or
/// pseudo-element
fn has_pseudo(selector: &str) -> bool {
    let mut brackets = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in selector.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match (quote, c) {
            (_, '\\') => escaped = true,
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => brackets += 1,
            (None, ']') => brackets = brackets.saturating_sub(1),
            (None, ':') if brackets == 0 => return true,
            _ => {}
        }
    }
    false
}

/// Read and ingest one stylesheet through the file system capability
#[instrument(skip(fs, path), fields(path = %path.display()))]
pub fn parse_file(fs: &dyn FileSystem, path: &Path) -> IngestResult<IngestedFile> {
    let source = fs.read_to_string(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(&source, path)
}

/// Ingest stylesheet text that was read elsewhere
pub fn parse_source(source: &str, path: &Path) -> IngestResult<IngestedFile> {
    let sheet = parse(source).map_err(|source_error| IngestError::Parse {
        path: path.to_path_buf(),
        source_text: source.to_string(),
        source: source_error,
    })?;

    let source_file = path.to_string_lossy().to_string();
    let elements = elements_from_stylesheet(&sheet, &source_file);
    let tokens = tokens_from_stylesheet(&sheet);

    info!(
        elements = elements.len(),
        tokens = tokens.len(),
        "Ingested stylesheet"
    );

    Ok(IngestedFile {
        path: source_file,
        elements,
        tokens,
    })
}

/// Draft elements for a parsed stylesheet, with fresh ids
pub fn elements_from_stylesheet(sheet: &Stylesheet, source_file: &str) -> Vec<CanvasElement> {
    let mut ids = IdGenerator::new(source_file);
    elements_with_ids(sheet, source_file, &mut ids)
}

/// Same as [`elements_from_stylesheet`] with a caller-provided id generator
pub fn elements_with_ids(
    sheet: &Stylesheet,
    source_file: &str,
    ids: &mut IdGenerator,
) -> Vec<CanvasElement> {
    // Rules sharing a selector collapse into one, later declarations last
    let mut order: Vec<&str> = Vec::new();
    let mut merged: HashMap<&str, Vec<Declaration>> = HashMap::new();

    for rule in &sheet.rules {
        if let Some(reason) = skip_reason(rule) {
            debug!(selector = %rule.selector, reason, "Skipping rule");
            continue;
        }
        let selector = rule.selector.as_str();
        let declarations = merged.entry(selector).or_insert_with(|| {
            order.push(selector);
            Vec::new()
        });
        declarations.extend(rule.declarations.iter().cloned());
    }

    order
        .into_iter()
        .filter_map(|selector| {
            let declarations = merged.remove(selector)?;
            Some(draft_element(selector, &declarations, source_file, ids.new_id()))
        })
        .collect()
}

fn draft_element(
    selector: &str,
    declarations: &[Declaration],
    source_file: &str,
    id: String,
) -> CanvasElement {
    let mapped = map_rule(declarations);

    let mut element = CanvasElement::new(id, mapped.element_type, selector)
        .with_source_file(source_file);
    element.size = mapped.size;
    element.style = mapped.style;
    element.layout = mapped.layout;

    match mapped.element_type {
        ElementType::Text => element.content = Some(label_from_selector(selector)),
        ElementType::Rectangle if mapped.has_text => {
            element.content = Some(label_from_selector(selector))
        }
        _ => {}
    }

    debug!(
        id = %element.id,
        selector,
        element_type = element.element_type.as_str(),
        "Drafted element"
    );
    element
}
