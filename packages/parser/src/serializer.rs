use crate::ast::*;

/// Serializer renders rules and declarations back to CSS text.
///
/// Output is fully determined by its input: declarations keep the order
/// they are given in, so callers that need stable output pass sorted input.
pub struct Serializer {
    indent_string: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_string: "  ".to_string(), // 2 spaces
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_string: indent.to_string(),
        }
    }

    /// Serialize a whole stylesheet, regrouping consecutive media rules
    pub fn serialize(&self, sheet: &Stylesheet) -> String {
        let mut blocks: Vec<String> = Vec::new();
        let mut index = 0;

        while index < sheet.rules.len() {
            let rule = &sheet.rules[index];
            match &rule.media_query {
                None => {
                    blocks.push(self.render_rule(&rule.selector, &rule.declarations));
                    index += 1;
                }
                Some(query) => {
                    let mut group: Vec<(String, Vec<Declaration>)> = Vec::new();
                    while index < sheet.rules.len()
                        && sheet.rules[index].media_query.as_ref() == Some(query)
                    {
                        let r = &sheet.rules[index];
                        group.push((r.selector.clone(), r.declarations.clone()));
                        index += 1;
                    }
                    blocks.push(self.render_media(query, &group));
                }
            }
        }

        blocks.join("\n")
    }

    /// Render one rule at top level
    pub fn render_rule(&self, selector: &str, declarations: &[Declaration]) -> String {
        self.render_rule_at(selector, declarations, 0)
    }

    /// Render an `@media` block containing the given rules
    pub fn render_media(&self, query: &str, rules: &[(String, Vec<Declaration>)]) -> String {
        let mut output = format!("@media {} {{\n", query);
        let inner: Vec<String> = rules
            .iter()
            .map(|(selector, declarations)| self.render_rule_at(selector, declarations, 1))
            .collect();
        output.push_str(&inner.join("\n"));
        output.push_str("}\n");
        output
    }

    /// Render declarations, one per line, at the given nesting depth
    pub fn render_declarations(&self, declarations: &[Declaration], depth: usize) -> String {
        let indent = self.indent_string.repeat(depth);
        let mut output = String::new();
        for declaration in declarations {
            output.push_str(&indent);
            output.push_str(&declaration.property);
            output.push_str(": ");
            output.push_str(&declaration.value);
            if declaration.important {
                output.push_str(" !important");
            }
            output.push_str(";\n");
        }
        output
    }

    fn render_rule_at(&self, selector: &str, declarations: &[Declaration], depth: usize) -> String {
        let indent = self.indent_string.repeat(depth);
        let mut output = String::new();
        output.push_str(&indent);
        output.push_str(selector);
        output.push_str(" {\n");
        output.push_str(&self.render_declarations(declarations, depth + 1));
        output.push_str(&indent);
        output.push_str("}\n");
        output
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a stylesheet with default formatting
pub fn serialize(sheet: &Stylesheet) -> String {
    Serializer::new().serialize(sheet)
}
