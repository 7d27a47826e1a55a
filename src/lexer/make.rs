//! Makefile family lexer rules.
//!
//! Ported from `MAKE_rules`. The original guards `make_comment` with a
//! negative lookbehind (`(?<!\\)#...`) that the `regex` crate cannot express;
//! it is dropped here because `make_escaped` is tried first and already
//! consumes any `\#` as a single punctuation token, so by the time the
//! cursor could reach a bare `#` it is never preceded by an unconsumed `\`.

use super::common;
use super::engine::Rule;
use super::token::TokenKind;
use std::sync::OnceLock;

const MAKE_IDENTIFIER: &str = r"[A-Z0-9_]+";
const MAKE_MINOR_IDENTIFIER: &str = r"[a-zA-Z0-9_][a-zA-Z0-9_-]*";
const MAKE_SINGLE_QUOTE_STRING: &str = r"'*?'";
const MAKE_ESCAPED: &str = r#"\\[#"']"#;
const MAKE_PUNCTUATION: &str = r"[~\\`\[\](){}<>.,:;|%$^@&?!+*/=-]";
const MAKE_COMMENT: &str = r"#(\\\s*\n|[^\n])*\n";

fn make_string() -> String {
    format!("(({MAKE_SINGLE_QUOTE_STRING})|({}))", common::c_string())
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

pub fn rules() -> &'static [Rule] {
    RULES
        .get_or_init(|| {
            vec![
                Rule::always(common::WHITESPACE, TokenKind::Whitespace),
                Rule::always(MAKE_ESCAPED, TokenKind::Punctuation),
                Rule::always(MAKE_COMMENT, TokenKind::Comment),
                Rule::always(&make_string(), TokenKind::String),
                Rule::always(MAKE_IDENTIFIER, TokenKind::Identifier),
                Rule::always(MAKE_MINOR_IDENTIFIER, TokenKind::Special),
                Rule::always(MAKE_PUNCTUATION, TokenKind::Punctuation),
            ]
        })
        .as_slice()
}
