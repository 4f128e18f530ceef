//! # Token Store
//!
//! Design tokens live in stylesheets as custom properties
//! (`--brand-primary: #3366ff`). Extraction is a pure function of the CSS
//! text; export renders the tokens back as CSS, SCSS and JSON.

use crate::error::CanvasResult;
use crate::palette::is_color;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use stylebridge_parser::{parse, Declaration, Serializer, Stylesheet};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    Colors,
    Spacing,
    Typography,
    Other,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 4] = [
        TokenCategory::Colors,
        TokenCategory::Spacing,
        TokenCategory::Typography,
        TokenCategory::Other,
    ];

    /// Prefix used for exported identifiers
    pub fn prefix(&self) -> &'static str {
        match self {
            TokenCategory::Colors => "color",
            TokenCategory::Spacing => "spacing",
            TokenCategory::Typography => "font",
            TokenCategory::Other => "token",
        }
    }
}

/// Token key -> raw value, namespaced by category
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DesignTokens {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default)]
    pub spacing: BTreeMap<String, String>,
    #[serde(default)]
    pub typography: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

impl DesignTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(&self, category: TokenCategory) -> &BTreeMap<String, String> {
        match category {
            TokenCategory::Colors => &self.colors,
            TokenCategory::Spacing => &self.spacing,
            TokenCategory::Typography => &self.typography,
            TokenCategory::Other => &self.other,
        }
    }

    fn category_mut(&mut self, category: TokenCategory) -> &mut BTreeMap<String, String> {
        match category {
            TokenCategory::Colors => &mut self.colors,
            TokenCategory::Spacing => &mut self.spacing,
            TokenCategory::Typography => &mut self.typography,
            TokenCategory::Other => &mut self.other,
        }
    }

    /// Insert a token; a key lives in exactly one category
    pub fn insert(&mut self, category: TokenCategory, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        for other in TokenCategory::ALL {
            if other != category {
                self.category_mut(other).remove(&key);
            }
        }
        self.category_mut(category).insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        TokenCategory::ALL
            .iter()
            .find_map(|c| self.category(*c).get(key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        TokenCategory::ALL.iter().map(|c| self.category(*c).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Union with `other`; values from `other` win per key
    pub fn merge(&mut self, other: &DesignTokens) {
        for category in TokenCategory::ALL {
            for (key, value) in other.category(category) {
                self.insert(category, key.clone(), value.clone());
            }
        }
    }

    /// (category, key, value) in category order, keys sorted
    pub fn iter(&self) -> impl Iterator<Item = (TokenCategory, &String, &String)> {
        TokenCategory::ALL
            .into_iter()
            .flat_map(move |c| self.category(c).iter().map(move |(k, v)| (c, k, v)))
    }
}

/// Pick a category from the token name and value
pub fn categorize(name: &str, value: &str) -> TokenCategory {
    let name = name.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| name.contains(n));

    if is_color(value) || has(&["color", "colour", "bg", "background"]) {
        TokenCategory::Colors
    } else if has(&["font", "line-height", "letter-spacing", "text", "leading", "tracking"]) {
        TokenCategory::Typography
    } else if has(&["space", "spacing", "gap", "margin", "padding", "size", "radius"])
        || is_length(value)
    {
        TokenCategory::Spacing
    } else {
        TokenCategory::Other
    }
}

fn is_length(value: &str) -> bool {
    let value = value.trim();
    ["px", "rem", "em", "%", "vh", "vw"].iter().any(|unit| {
        value
            .strip_suffix(unit)
            .map_or(false, |n| !n.is_empty() && n.parse::<f64>().is_ok())
    })
}

/// Extract tokens from CSS text
pub fn extract_tokens(css: &str) -> CanvasResult<DesignTokens> {
    let sheet = parse(css)?;
    Ok(tokens_from_stylesheet(&sheet))
}

/// Collect top-level custom properties; later declarations win
pub fn tokens_from_stylesheet(sheet: &Stylesheet) -> DesignTokens {
    let mut tokens = DesignTokens::new();
    for rule in sheet.top_level_rules() {
        for declaration in rule.declarations.iter().filter(|d| d.is_custom_property()) {
            let key = declaration.property.trim_start_matches("--");
            if key.is_empty() {
                continue;
            }
            tokens.insert(categorize(key, &declaration.value), key, declaration.value.clone());
        }
    }
    tokens
}

/// Deterministic identifier for a raw token name
pub fn sanitize_token_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;

    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if out.is_empty() {
        "unnamed".to_string()
    } else {
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenWarning {
    /// Two raw names sanitize to the same identifier
    NameCollision {
        identifier: String,
        first: String,
        second: String,
        renamed_to: String,
    },
    /// Two palette entry names sanitize to the same utility class suffix
    PaletteCollision {
        identifier: String,
        first: String,
        second: String,
        renamed_to: String,
    },
}

impl fmt::Display for TokenWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenWarning::NameCollision {
                identifier,
                first,
                second,
                renamed_to,
            } => write!(
                f,
                "token names '{}' and '{}' both sanitize to '{}'; exporting '{}' as '{}'",
                first, second, identifier, second, renamed_to
            ),
            TokenWarning::PaletteCollision {
                identifier,
                first,
                second,
                renamed_to,
            } => write!(
                f,
                "palette names '{}' and '{}' both sanitize to '{}'; emitting classes for '{}' as '{}'",
                first, second, identifier, second, renamed_to
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenExport {
    pub css: String,
    pub scss: Option<String>,
    pub json: String,
    pub warnings: Vec<TokenWarning>,
}

/// First `<identifier>-N` (N >= 2) not yet in `taken`
pub fn next_free_identifier<V>(taken: &HashMap<String, V>, identifier: &str) -> String {
    let mut suffix = 2;
    let mut candidate = format!("{}-{}", identifier, suffix);
    while taken.contains_key(&candidate) {
        suffix += 1;
        candidate = format!("{}-{}", identifier, suffix);
    }
    candidate
}

/// Resolved export identifier per token, in export order
fn export_identifiers(tokens: &DesignTokens) -> (Vec<(String, String)>, Vec<TokenWarning>) {
    let mut taken: HashMap<String, String> = HashMap::new();
    let mut resolved = Vec::with_capacity(tokens.len());
    let mut warnings = Vec::new();

    for (category, key, value) in tokens.iter() {
        let sanitized = sanitize_token_name(key);
        let prefix = category.prefix();
        let identifier = if sanitized == prefix || sanitized.starts_with(&format!("{}-", prefix)) {
            sanitized
        } else {
            format!("{}-{}", prefix, sanitized)
        };

        let final_identifier = match taken.get(&identifier) {
            None => identifier,
            Some(first) => {
                let candidate = next_free_identifier(&taken, &identifier);
                let warning = TokenWarning::NameCollision {
                    identifier: identifier.clone(),
                    first: first.clone(),
                    second: key.clone(),
                    renamed_to: candidate.clone(),
                };
                warn!(%warning, "Token name collision");
                warnings.push(warning);
                candidate
            }
        };

        taken.insert(final_identifier.clone(), key.clone());
        resolved.push((final_identifier, value.clone()));
    }

    (resolved, warnings)
}

/// Render tokens as CSS custom properties, optional SCSS variables, and JSON
pub fn export_tokens(tokens: &DesignTokens, include_scss: bool) -> CanvasResult<TokenExport> {
    let (resolved, warnings) = export_identifiers(tokens);

    let declarations: Vec<Declaration> = resolved
        .iter()
        .map(|(identifier, value)| Declaration::new(format!("--{}", identifier), value.clone()))
        .collect();
    let mut css = String::from("/* Design tokens */\n");
    css.push_str(&Serializer::new().render_rule(":root", &declarations));

    let scss = include_scss.then(|| {
        let mut scss = String::from("// Design tokens\n");
        for (identifier, value) in &resolved {
            scss.push_str(&format!("${}: {};\n", identifier, value));
        }
        scss
    });

    let mut json = serde_json::to_string_pretty(tokens)?;
    json.push('\n');

    Ok(TokenExport {
        css,
        scss,
        json,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tokens_categorizes() {
        let css = r#"
:root {
  --brand-primary: #3366FF;
  --space-md: 16px;
  --font-body: "Inter", sans-serif;
  --line-height-base: 1.5;
  --z-modal: 100;
  --surface: white;
}
.card { --ignored-inside-rule-still-counts: 4px; padding: var(--space-md); }
"#;
        let tokens = extract_tokens(css).unwrap();
        assert_eq!(tokens.colors.get("brand-primary").map(String::as_str), Some("#3366FF"));
        assert_eq!(tokens.colors.get("surface").map(String::as_str), Some("white"));
        assert_eq!(tokens.spacing.get("space-md").map(String::as_str), Some("16px"));
        assert!(tokens.typography.contains_key("font-body"));
        assert!(tokens.typography.contains_key("line-height-base"));
        assert!(tokens.spacing.contains_key("ignored-inside-rule-still-counts"));
        assert_eq!(tokens.other.get("z-modal").map(String::as_str), Some("100"));
    }

    #[test]
    fn test_media_overrides_are_not_tokens() {
        let css = ":root { --gap: 8px; } @media (min-width: 900px) { :root { --gap: 16px; } }";
        let tokens = extract_tokens(css).unwrap();
        assert_eq!(tokens.get("gap"), Some("8px"));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut base = DesignTokens::new();
        base.insert(TokenCategory::Colors, "primary", "#000");
        base.insert(TokenCategory::Spacing, "sm", "4px");

        let mut update = DesignTokens::new();
        update.insert(TokenCategory::Colors, "primary", "#fff");
        update.insert(TokenCategory::Other, "sm", "small");

        base.merge(&update);
        assert_eq!(base.get("primary"), Some("#fff"));
        assert_eq!(base.get("sm"), Some("small"));
        assert!(!base.spacing.contains_key("sm"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_sanitize_token_name() {
        assert_eq!(sanitize_token_name("Brand Primary"), "brand-primary");
        assert_eq!(sanitize_token_name("brand__primary"), "brand-primary");
        assert_eq!(sanitize_token_name("--weird--"), "weird");
        assert_eq!(sanitize_token_name("!!!"), "unnamed");
    }

    #[test]
    fn test_export_css_and_scss() {
        let mut tokens = DesignTokens::new();
        tokens.insert(TokenCategory::Colors, "primary", "#3366ff");
        tokens.insert(TokenCategory::Spacing, "spacing-md", "16px");

        let export = export_tokens(&tokens, true).unwrap();
        assert!(export.css.contains("--color-primary: #3366ff;"));
        assert!(export.css.contains("--spacing-md: 16px;"));
        let scss = export.scss.unwrap();
        assert!(scss.contains("$color-primary: #3366ff;"));
        assert!(export.warnings.is_empty());

        let parsed: DesignTokens = serde_json::from_str(&export.json).unwrap();
        assert_eq!(parsed, tokens);
    }

    #[test]
    fn test_export_without_scss() {
        let export = export_tokens(&DesignTokens::new(), false).unwrap();
        assert!(export.scss.is_none());
        assert!(export.css.contains(":root {"));
    }

    #[test]
    fn test_export_reports_collisions() {
        let mut tokens = DesignTokens::new();
        tokens.insert(TokenCategory::Colors, "Brand Primary", "#111");
        tokens.insert(TokenCategory::Colors, "brand-primary", "#222");

        let export = export_tokens(&tokens, false).unwrap();
        assert_eq!(export.warnings.len(), 1);
        assert!(export.css.contains("--color-brand-primary: #111;"));
        assert!(export.css.contains("--color-brand-primary-2: #222;"));
        match &export.warnings[0] {
            TokenWarning::NameCollision { first, second, .. } => {
                assert_eq!(first, "Brand Primary");
                assert_eq!(second, "brand-primary");
            }
            other => panic!("unexpected warning {:?}", other),
        }
    }

    #[test]
    fn test_export_is_deterministic() {
        let mut tokens = DesignTokens::new();
        tokens.insert(TokenCategory::Colors, "b", "#222");
        tokens.insert(TokenCategory::Colors, "a", "#111");
        assert_eq!(export_tokens(&tokens, true).unwrap(), export_tokens(&tokens, true).unwrap());
    }
}
