//! Mapping from CSS declarations to canvas element fields.
//!
//! Each rule is reduced to an element type, a style map with canvas
//! property names, an optional layout container spec and a size.

use stylebridge_canvas::{is_color, ElementType, FlexDirection, LayoutSpec, Size, StyleMap};
use stylebridge_parser::Declaration;

/// Properties that make an element read as text
const TEXT_PROPERTIES: &[&str] = &[
    "color",
    "font-size",
    "font-weight",
    "font-family",
    "font-style",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-transform",
    "text-decoration",
];

const SURFACE_PROPERTIES: &[&str] = &[
    "background",
    "background-color",
    "border",
    "border-color",
    "border-width",
];

/// Layout properties consumed by a flex or grid container
const LAYOUT_PROPERTIES: &[&str] = &[
    "display",
    "flex-direction",
    "gap",
    "justify-content",
    "align-items",
    "flex-wrap",
    "grid-template-columns",
];

/// Declarations of one selector, with CSS "last wins" lookup
pub struct DeclarationSet<'a> {
    declarations: &'a [Declaration],
}

impl<'a> DeclarationSet<'a> {
    pub fn new(declarations: &'a [Declaration]) -> Self {
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&'a str> {
        self.declarations
            .iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value.as_str())
    }

    pub fn has_any(&self, properties: &[&str]) -> bool {
        self.declarations
            .iter()
            .any(|d| properties.contains(&d.property.as_str()))
    }

    fn iter(&self) -> impl Iterator<Item = &'a Declaration> {
        self.declarations.iter().filter(|d| !d.is_custom_property())
    }
}

/// Element fields derived from one rule
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRule {
    pub element_type: ElementType,
    pub style: StyleMap,
    pub layout: Option<LayoutSpec>,
    pub size: Size,
    pub has_text: bool,
}

fn is_layout_display(value: &str) -> bool {
    matches!(value, "flex" | "inline-flex" | "grid" | "inline-grid")
}

/// Decide the element type; first matching heuristic wins
pub fn classify(set: &DeclarationSet<'_>) -> ElementType {
    if set.get("border-radius") == Some("50%") {
        return ElementType::Circle;
    }
    if set.get("display").map_or(false, is_layout_display) {
        return ElementType::Group;
    }
    if set.has_any(TEXT_PROPERTIES) && !set.has_any(SURFACE_PROPERTIES) {
        return ElementType::Text;
    }
    ElementType::Rectangle
}

/// `font-size` -> `fontSize`
pub fn camel_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len());
    let mut upper = false;
    for c in property.chars() {
        if c == '-' {
            upper = !out.is_empty();
            continue;
        }
        if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Pixel or unitless length as a number
pub fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite() && *n >= 0.0)
}

/// Split a `border` shorthand into stroke properties
fn map_border(value: &str, style: &mut StyleMap) {
    let value = value.trim();
    if value == "none" || value == "0" {
        style.insert("strokeWidth".to_string(), "0".to_string());
        return;
    }

    // Functional colors contain spaces; pull them out before splitting
    let mut rest = value.to_string();
    if let (Some(open), Some(close)) = (value.find('('), value.rfind(')')) {
        if open < close {
            let start = value[..open].rfind(char::is_whitespace).map_or(0, |i| i + 1);
            let color = &value[start..=close];
            if is_color(color) {
                style.insert("stroke".to_string(), color.to_string());
                rest = format!("{} {}", &value[..start], &value[close + 1..]);
            }
        }
    }

    for part in rest.split_whitespace() {
        if is_color(part) {
            style.insert("stroke".to_string(), part.to_string());
        } else if part.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
            style.insert("strokeWidth".to_string(), part.to_string());
        } else {
            style.insert("strokeStyle".to_string(), part.to_string());
        }
    }
}

fn map_layout(set: &DeclarationSet<'_>) -> Option<LayoutSpec> {
    let display = set.get("display")?;
    let mut layout = match display {
        "flex" | "inline-flex" => {
            let direction = match set.get("flex-direction") {
                Some(d) if d.starts_with("column") => FlexDirection::Column,
                _ => FlexDirection::Row,
            };
            LayoutSpec::flexbox(direction)
        }
        "grid" | "inline-grid" => {
            let mut grid = LayoutSpec::grid();
            grid.columns = set.get("grid-template-columns").map(str::to_string);
            grid
        }
        _ => return None,
    };

    layout.gap = set.get("gap").map(str::to_string);
    layout.justify_content = set.get("justify-content").map(str::to_string);
    layout.align_items = set.get("align-items").map(str::to_string);
    layout.wrap = set.get("flex-wrap").map(str::to_string);
    Some(layout)
}

/// Map every declaration of a rule onto canvas fields
pub fn map_rule(declarations: &[Declaration]) -> MappedRule {
    let set = DeclarationSet::new(declarations);
    let element_type = classify(&set);
    let layout = map_layout(&set);
    let mut size = element_type.default_size();
    let mut style = StyleMap::new();

    for declaration in set.iter() {
        let value = declaration.value.as_str();
        match declaration.property.as_str() {
            "background" | "background-color" => {
                style.insert("fill".to_string(), value.to_string());
            }
            "border" => map_border(value, &mut style),
            "border-color" => {
                style.insert("stroke".to_string(), value.to_string());
            }
            "border-width" => {
                style.insert("strokeWidth".to_string(), value.to_string());
            }
            "color" => {
                style.insert("textColor".to_string(), value.to_string());
            }
            "box-shadow" => {
                style.insert("shadow".to_string(), value.to_string());
            }
            "width" => {
                if let Some(width) = parse_length(value) {
                    size.width = width;
                }
            }
            "height" => {
                if let Some(height) = parse_length(value) {
                    size.height = height;
                }
            }
            property if layout.is_some() && LAYOUT_PROPERTIES.contains(&property) => {}
            property => {
                style.insert(camel_case(property), value.to_string());
            }
        }
    }

    MappedRule {
        element_type,
        style,
        layout,
        size,
        has_text: set.has_any(TEXT_PROPERTIES),
    }
}

/// Human label from the last compound of a selector: `.btn-primary` -> `Btn Primary`
pub fn label_from_selector(selector: &str) -> String {
    let last = selector
        .rsplit(|c: char| c.is_whitespace() || c == '>' || c == '+' || c == '~' || c == ',')
        .find(|s| !s.is_empty())
        .unwrap_or(selector);
    let name = last.rsplit(|c: char| c == '.' || c == '#').next().unwrap_or(last);

    let words: Vec<String> = name
        .split(|c: char| c == '-' || c == '_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        selector.trim().to_string()
    } else {
        words.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: &[(&str, &str)]) -> Vec<Declaration> {
        pairs.iter().map(|(p, v)| Declaration::new(*p, *v)).collect()
    }

    #[test]
    fn test_classify_first_match_wins() {
        let circle = decls(&[("display", "flex"), ("border-radius", "50%")]);
        assert_eq!(classify(&DeclarationSet::new(&circle)), ElementType::Circle);

        let group = decls(&[("display", "grid"), ("color", "red")]);
        assert_eq!(classify(&DeclarationSet::new(&group)), ElementType::Group);

        let text = decls(&[("font-size", "24px"), ("color", "#111")]);
        assert_eq!(classify(&DeclarationSet::new(&text)), ElementType::Text);

        let button = decls(&[("background", "#3366ff"), ("color", "white")]);
        assert_eq!(classify(&DeclarationSet::new(&button)), ElementType::Rectangle);
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("font-size"), "fontSize");
        assert_eq!(camel_case("padding"), "padding");
        assert_eq!(camel_case("-webkit-line-clamp"), "webkitLineClamp");
    }

    #[test]
    fn test_border_shorthand() {
        let mapped = map_rule(&decls(&[("border", "1px solid #ddd")]));
        assert_eq!(mapped.style.get("strokeWidth").map(String::as_str), Some("1px"));
        assert_eq!(mapped.style.get("stroke").map(String::as_str), Some("#ddd"));
        assert_eq!(mapped.style.get("strokeStyle").map(String::as_str), Some("solid"));
    }

    #[test]
    fn test_border_with_functional_color() {
        let mapped = map_rule(&decls(&[("border", "2px dashed rgba(0, 0, 0, 0.2)")]));
        assert_eq!(mapped.style.get("strokeWidth").map(String::as_str), Some("2px"));
        assert_eq!(
            mapped.style.get("stroke").map(String::as_str),
            Some("rgba(0, 0, 0, 0.2)")
        );
    }

    #[test]
    fn test_layout_properties_feed_layout() {
        let mapped = map_rule(&decls(&[
            ("display", "flex"),
            ("flex-direction", "column"),
            ("gap", "16px"),
            ("padding", "24px"),
        ]));
        let layout = mapped.layout.unwrap();
        assert_eq!(layout.direction, Some(FlexDirection::Column));
        assert_eq!(layout.gap.as_deref(), Some("16px"));
        assert!(!mapped.style.contains_key("display"));
        assert!(!mapped.style.contains_key("gap"));
        assert_eq!(mapped.style.get("padding").map(String::as_str), Some("24px"));
    }

    #[test]
    fn test_size_from_pixels_or_defaults() {
        let mapped = map_rule(&decls(&[("width", "240px"), ("height", "80"), ("background", "red")]));
        assert_eq!(mapped.size, Size::new(240.0, 80.0));

        let relative = map_rule(&decls(&[("width", "50%"), ("font-size", "14px")]));
        assert_eq!(relative.element_type, ElementType::Text);
        assert_eq!(relative.size, Size::new(200.0, 24.0));
    }

    #[test]
    fn test_label_from_selector() {
        assert_eq!(label_from_selector(".btn-primary"), "Btn Primary");
        assert_eq!(label_from_selector(".nav > .nav_item"), "Nav Item");
        assert_eq!(label_from_selector("button"), "Button");
    }
}
