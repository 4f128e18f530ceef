use logos::Logos;
use std::fmt;

/// Structural CSS tokens.
///
/// Values and selectors are not tokenized finely; the parser slices the
/// original source between structural tokens instead.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("/")]
    Slash,

    // At-keywords, without the leading '@'
    #[regex(r"@[a-zA-Z-]+", |lex| &lex.slice()[1..])]
    AtKeyword(&'src str),

    // Quoted strings (either quote style)
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r#"'([^'\\]|\\.)*'"#, |lex| lex.slice())]
    String(&'src str),

    // Anything else up to the next structural character
    #[regex(r#"[^{}();:,"'@/ \t\n\r\f]+"#, |lex| lex.slice())]
    Text(&'src str),
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Semicolon => write!(f, ";"),
            Token::Colon => write!(f, ":"),
            Token::Comma => write!(f, ","),
            Token::Slash => write!(f, "/"),
            Token::AtKeyword(name) => write!(f, "at-rule '@{}'", name),
            Token::String(s) => write!(f, "string {}", s),
            Token::Text(t) => write!(f, "'{}'", t),
        }
    }
}

/// Tokenize a source string
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_structure() {
        let tokens = tokenize(".btn:hover { color: red }");
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();

        assert_eq!(
            kinds,
            vec![
                Token::Text(".btn"),
                Token::Colon,
                Token::Text("hover"),
                Token::LBrace,
                Token::Text("color"),
                Token::Colon,
                Token::Text("red"),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let tokens = tokenize("/* header */ .a { /* inner ** */ color: red; }");
        assert_eq!(tokens[0].0, Token::Text(".a"));
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_at_keyword() {
        let tokens = tokenize("@media (max-width: 768px) {}");
        assert_eq!(tokens[0].0, Token::AtKeyword("media"));
        assert_eq!(tokens[1].0, Token::LParen);
    }

    #[test]
    fn test_strings() {
        let tokens = tokenize(r#"content: "a;b" 'c}d'"#);
        assert_eq!(tokens[2].0, Token::String("\"a;b\""));
        assert_eq!(tokens[3].0, Token::String("'c}d'"));
    }

    #[test]
    fn test_spans_point_into_source() {
        let source = ".title { font-size: 24px; }";
        let tokens = tokenize(source);
        let (_, span) = &tokens[4];
        assert_eq!(&source[span.clone()], "24px");
    }
}
