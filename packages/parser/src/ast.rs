use serde::{Deserialize, Serialize};

/// Byte range of a rule in its source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A parsed stylesheet: style rules in source order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stylesheet {
    pub rules: Vec<CssRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules outside any `@media` block
    pub fn top_level_rules(&self) -> impl Iterator<Item = &CssRule> {
        self.rules.iter().filter(|r| r.media_query.is_none())
    }

    /// All custom property declarations (`--name: value`) in source order
    pub fn custom_properties(&self) -> impl Iterator<Item = &Declaration> {
        self.rules
            .iter()
            .flat_map(|r| r.declarations.iter())
            .filter(|d| d.is_custom_property())
    }
}

/// One selector block with its declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<Declaration>,
    pub media_query: Option<String>,
    pub span: Span,
}

impl CssRule {
    /// Value of the last declaration for `property`, mirroring CSS "last wins"
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn has(&self, property: &str) -> bool {
        self.declarations.iter().any(|d| d.property == property)
    }

    /// True when every declaration is a custom property
    pub fn only_custom_properties(&self) -> bool {
        !self.declarations.is_empty() && self.declarations.iter().all(|d| d.is_custom_property())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
    #[serde(default)]
    pub important: bool,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            important: false,
        }
    }

    pub fn is_custom_property(&self) -> bool {
        self.property.starts_with("--")
    }
}
