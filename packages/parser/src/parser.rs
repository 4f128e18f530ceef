use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use std::borrow::Cow;
use std::ops::Range;

/// Parser for CSS stylesheets
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: tokenize(source),
            pos: 0,
        }
    }

    /// Parse a complete stylesheet
    pub fn parse_stylesheet(&mut self) -> ParseResult<Stylesheet> {
        let mut sheet = Stylesheet::new();
        self.parse_rule_list(None, false, &mut sheet.rules)?;
        Ok(sheet)
    }

    fn parse_rule_list(
        &mut self,
        media: Option<&str>,
        nested: bool,
        out: &mut Vec<CssRule>,
    ) -> ParseResult<()> {
        loop {
            match self.peek() {
                None if nested => {
                    return Err(ParseError::unexpected_eof(self.source.len(), "'}'"));
                }
                None => return Ok(()),
                Some(Token::RBrace) if nested => {
                    self.advance();
                    return Ok(());
                }
                Some(Token::RBrace) => {
                    return Err(ParseError::unexpected_token(
                        self.peek_start(),
                        "selector or at-rule",
                        "}",
                    ));
                }
                Some(Token::Semicolon) => self.advance(),
                Some(Token::AtKeyword(name)) => self.parse_at_rule(name, media, out)?,
                Some(_) => {
                    let rule = self.parse_style_rule(media)?;
                    out.push(rule);
                }
            }
        }
    }

    /// Parse an at-rule. Only `@media` contributes rules; statements such as
    /// `@import` are dropped and other blocks are skipped whole.
    fn parse_at_rule(
        &mut self,
        name: &str,
        media: Option<&str>,
        out: &mut Vec<CssRule>,
    ) -> ParseResult<()> {
        let at_start = self.peek_start();
        let prelude_start = self.peek_end();
        self.advance();

        let mut depth = 0usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::unexpected_eof(
                        self.source.len(),
                        format!("'{{' or ';' after @{}", name),
                    ));
                }
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) => depth = depth.saturating_sub(1),
                Some(Token::Semicolon) if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                Some(Token::LBrace) if depth == 0 => break,
                Some(Token::RBrace) if depth == 0 => {
                    return Err(ParseError::unexpected_token(
                        self.peek_start(),
                        format!("'{{' or ';' after @{}", name),
                        "}",
                    ));
                }
                _ => {}
            }
            self.advance();
        }

        let prelude =
            normalize_whitespace(&strip_comments(&self.source[prelude_start..self.peek_start()]));
        self.advance(); // consume '{'

        if name.eq_ignore_ascii_case("media") {
            let query = match media {
                Some(outer) => format!("{} and {}", outer, prelude),
                None => prelude,
            };
            self.parse_rule_list(Some(&query), true, out)
        } else {
            self.skip_block(at_start)
        }
    }

    fn parse_style_rule(&mut self, media: Option<&str>) -> ParseResult<CssRule> {
        let start = self.peek_start();
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::unexpected_eof(
                        self.source.len(),
                        "'{' after selector",
                    ));
                }
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) => depth = depth.saturating_sub(1),
                Some(Token::LBrace) if depth == 0 => break,
                Some(tok @ (Token::Semicolon | Token::RBrace)) if depth == 0 => {
                    return Err(ParseError::unexpected_token(
                        self.peek_start(),
                        "'{' after selector",
                        tok.to_string(),
                    ));
                }
                _ => {}
            }
            self.advance();
        }

        let selector =
            normalize_whitespace(&strip_comments(&self.source[start..self.peek_start()]));
        if selector.is_empty() {
            return Err(ParseError::invalid_syntax(
                start,
                "declaration block without a selector",
            ));
        }
        self.advance(); // consume '{'

        let declarations = self.parse_declarations()?;
        let end = self.prev_end();

        Ok(CssRule {
            selector,
            declarations,
            media_query: media.map(str::to_string),
            span: Span::new(start, end),
        })
    }

    /// Parse declarations up to and including the closing '}'
    fn parse_declarations(&mut self) -> ParseResult<Vec<Declaration>> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::unexpected_eof(self.source.len(), "'}'"));
                }
                Some(Token::RBrace) => {
                    self.advance();
                    return Ok(declarations);
                }
                Some(Token::Semicolon) => self.advance(),
                Some(_) => {
                    if let Some(declaration) = self.parse_declaration()? {
                        declarations.push(declaration);
                    }
                }
            }
        }
    }

    fn parse_declaration(&mut self) -> ParseResult<Option<Declaration>> {
        let start = self.peek_start();
        let mut colon: Option<usize> = None;
        let mut depth = 0usize;

        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::unexpected_eof(self.source.len(), "'}'"));
                }
                Some(Token::LParen) => depth += 1,
                Some(Token::RParen) => depth = depth.saturating_sub(1),
                Some(Token::Colon) if depth == 0 && colon.is_none() => {
                    colon = Some(self.peek_start());
                }
                Some(Token::Semicolon | Token::RBrace) if depth == 0 => break,
                Some(Token::LBrace) if depth == 0 => {
                    // Nested rule blocks are not modelled
                    let block_start = self.peek_start();
                    self.advance();
                    self.skip_block(block_start)?;
                    return Ok(None);
                }
                _ => {}
            }
            self.advance();
        }

        let end = self.peek_start();
        let colon = colon.ok_or_else(|| {
            ParseError::invalid_syntax(
                start,
                format!(
                    "expected ':' in declaration '{}'",
                    self.source[start..end].trim()
                ),
            )
        })?;

        let raw_property = strip_comments(&self.source[start..colon]);
        let raw_property = raw_property.trim();
        if raw_property.is_empty() {
            return Err(ParseError::invalid_syntax(start, "missing property name"));
        }
        let property = if raw_property.starts_with("--") {
            raw_property.to_string()
        } else {
            raw_property.to_ascii_lowercase()
        };

        let mut value = normalize_whitespace(&strip_comments(&self.source[colon + 1..end]));
        let important = strip_important(&mut value);
        if value.is_empty() {
            return Ok(None);
        }

        Ok(Some(Declaration {
            property,
            value,
            important,
        }))
    }

    /// Skip tokens up to the '}' matching an already consumed '{'
    fn skip_block(&mut self, block_start: usize) -> ParseResult<()> {
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::invalid_syntax(
                        block_start,
                        "unterminated block",
                    ));
                }
                Some(Token::LBrace) => depth += 1,
                Some(Token::RBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn peek(&self) -> Option<Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| *t)
    }

    fn peek_start(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    fn peek_end(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.end)
            .unwrap_or(self.source.len())
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(|(_, span)| span.end)
            .unwrap_or(0)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }
}

/// Parse CSS source text into a stylesheet
pub fn parse(source: &str) -> ParseResult<Stylesheet> {
    Parser::new(source).parse_stylesheet()
}

/// Drop `/* ... */` comments from a raw source slice, leaving quoted
/// strings intact. Each comment becomes a single space.
fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains("/*") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut quote: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        match quote {
            Some(q) => {
                if c == '\\' {
                    let escaped: String = rest.chars().take(2).collect();
                    out.push_str(&escaped);
                    rest = &rest[escaped.len()..];
                    continue;
                }
                if c == q {
                    quote = None;
                }
            }
            None if c == '"' || c == '\'' => quote = Some(c),
            None if rest.starts_with("/*") => {
                rest = match rest[2..].find("*/") {
                    Some(close) => &rest[2 + close + 2..],
                    None => "",
                };
                out.push(' ');
                continue;
            }
            None => {}
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }

    Cow::Owned(out)
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a trailing `!important` flag, returning whether it was present
fn strip_important(value: &mut String) -> bool {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            value.truncate(bang);
            let trimmed = value.trim_end().len();
            value.truncate(trimmed);
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_rule() {
        let sheet = parse(".card { display: flex; background: #eee }").unwrap();

        assert_eq!(sheet.rules.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selector, ".card");
        assert_eq!(rule.get("display"), Some("flex"));
        assert_eq!(rule.get("background"), Some("#eee"));
        assert!(rule.media_query.is_none());
    }

    #[test]
    fn test_parse_multiple_rules_in_order() {
        let source = r#"
.header { height: 64px; }
.header .title { font-size: 24px; font-weight: 600; }
.footer { height: 48px; }
"#;
        let sheet = parse(source).unwrap();
        let selectors: Vec<&str> = sheet.rules.iter().map(|r| r.selector.as_str()).collect();
        assert_eq!(selectors, vec![".header", ".header .title", ".footer"]);
    }

    #[test]
    fn test_selector_whitespace_is_normalized() {
        let sheet = parse(".a,\n   .b   > .c { color: red; }").unwrap();
        assert_eq!(sheet.rules[0].selector, ".a, .b > .c");
    }

    #[test]
    fn test_pseudo_selector() {
        let sheet = parse(".btn:hover { opacity: 0.9; }").unwrap();
        assert_eq!(sheet.rules[0].selector, ".btn:hover");
        assert_eq!(sheet.rules[0].get("opacity"), Some("0.9"));
    }

    #[test]
    fn test_media_rules_carry_query() {
        let source = r#"
.a { color: red; }
@media (max-width: 768px) {
  .a { color: blue; }
  .b { display: none; }
}
"#;
        let sheet = parse(source).unwrap();
        assert_eq!(sheet.rules.len(), 3);
        assert_eq!(sheet.rules[1].media_query.as_deref(), Some("(max-width: 768px)"));
        assert_eq!(sheet.rules[2].media_query.as_deref(), Some("(max-width: 768px)"));
        assert_eq!(sheet.top_level_rules().count(), 1);
    }

    #[test]
    fn test_other_at_rules_are_skipped() {
        let source = r#"
@charset "utf-8";
@import url("reset.css");
@keyframes spin { from { transform: rotate(0deg); } to { transform: rotate(360deg); } }
@font-face { font-family: Inter; src: url(inter.woff2); }
.spinner { animation: spin 1s linear infinite; }
"#;
        let sheet = parse(source).unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert_eq!(sheet.rules[0].selector, ".spinner");
    }

    #[test]
    fn test_important_flag() {
        let sheet = parse(".x { color: red !important; margin: 0 ! IMPORTANT }").unwrap();
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
        assert_eq!(decls[1].value, "0");
        assert!(decls[1].important);
    }

    #[test]
    fn test_values_with_parens_and_colons() {
        let sheet = parse(".hero { background: url(https://cdn.example.com/a.png) no-repeat; }")
            .unwrap();
        assert_eq!(
            sheet.rules[0].get("background"),
            Some("url(https://cdn.example.com/a.png) no-repeat")
        );
    }

    #[test]
    fn test_custom_properties_keep_case() {
        let sheet = parse(":root { --Brand-Primary: #3366FF; COLOR: red; }").unwrap();
        let rule = &sheet.rules[0];
        assert_eq!(rule.declarations[0].property, "--Brand-Primary");
        assert_eq!(rule.declarations[1].property, "color");
        assert_eq!(sheet.custom_properties().count(), 1);
    }

    #[test]
    fn test_empty_value_is_dropped() {
        let sheet = parse(".x { color: ; margin: 0; }").unwrap();
        assert_eq!(sheet.rules[0].declarations.len(), 1);
    }

    #[test]
    fn test_nested_blocks_are_ignored() {
        let sheet = parse(".card { padding: 8px; &:hover { opacity: 1; } color: red; }").unwrap();
        let rule = &sheet.rules[0];
        assert_eq!(rule.get("padding"), Some("8px"));
        assert_eq!(rule.get("color"), Some("red"));
        assert_eq!(rule.declarations.len(), 2);
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let err = parse(".card { color: red;").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_stray_closing_brace_is_an_error() {
        let err = parse(".a { color: red; } }").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_missing_colon_is_an_error() {
        let err = parse(".a { color red; }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_block_without_selector_is_an_error() {
        let err = parse("{ color: red; }").unwrap_err();
        assert!(matches!(err, ParseError::InvalidSyntax { .. }));
    }

    #[test]
    fn test_rule_span_covers_block() {
        let source = "  .a { color: red; }  ";
        let sheet = parse(source).unwrap();
        let span = sheet.rules[0].span;
        assert_eq!(&source[span.start..span.end], ".a { color: red; }");
    }

    #[test]
    fn test_comment_inside_value_is_dropped() {
        let sheet = parse(".card { background: #eee /* brand */; color: /* ink */ red; }").unwrap();
        let rule = &sheet.rules[0];
        assert_eq!(rule.get("background"), Some("#eee"));
        assert_eq!(rule.get("color"), Some("red"));
    }

    #[test]
    fn test_comment_inside_selector_list_is_dropped() {
        let sheet = parse(".a, /* legacy */ .b { color: red; }").unwrap();
        assert_eq!(sheet.rules[0].selector, ".a, .b");

        let sheet = parse(".a { /* note */ color: red; }").unwrap();
        assert_eq!(sheet.rules[0].declarations[0].property, "color");
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let sheet = parse(r#".q { content: "/* not a comment */"; }"#).unwrap();
        assert_eq!(sheet.rules[0].get("content"), Some(r#""/* not a comment */""#));
    }

    #[test]
    fn test_empty_source() {
        let sheet = parse("  /* nothing */  ").unwrap();
        assert!(sheet.rules.is_empty());
    }
}
