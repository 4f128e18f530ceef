//! # Stylebridge Parser
//!
//! Turns CSS text into selector/declaration records and renders
//! declarations back to CSS text.
//!
//! Coverage is intentionally shallow: plain style rules, `@media` blocks,
//! and custom properties. Other at-rules are skipped as balanced blocks.

pub mod ast;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::{CssRule, Declaration, Span, Stylesheet};
pub use error::{ParseError, ParseResult};
pub use id_generator::{get_document_id, IdGenerator};
pub use parser::{parse, Parser};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let source = ".card { color: red; }";
        let tokens = tokenize(source);
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_parse_then_serialize() {
        let sheet = parse(".card { display: flex; background: #eee; }").unwrap();
        let css = serialize(&sheet);
        assert_eq!(css, ".card {\n  display: flex;\n  background: #eee;\n}\n");
    }
}
