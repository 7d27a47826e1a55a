//! Family-aware lexical analysis (spec §4.1).
//!
//! Grounded on `elixir/lexers.py`: one rule-based longest-first matching
//! engine (`engine`) shared by five per-family rule tables (`c`, `dts`,
//! `kconfig`, `gas`, `make`), routed by path via `dispatch`.

pub mod c;
mod common;
pub mod dispatch;
pub mod dts;
pub mod engine;
pub mod gas;
pub mod kconfig;
pub mod make;
pub mod token;

pub use dispatch::{rules_for_path, storage_family};
pub use engine::lex;
pub use token::{Token, TokenKind};

/// Tokenize `code` for `path` using whichever family rule set applies, if
/// any. Blobs with no lexer (per [`dispatch::rules_for_path`]) are not
/// tokenized for references — they simply return `None`.
pub fn tokenize_path(path: &str, code: &str) -> Option<Vec<Token>> {
    rules_for_path(path).map(|rules| lex(rules, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_path_is_not_tokenized() {
        assert!(tokenize_path("README.md", "hello\n").is_none());
    }

    #[test]
    fn c_path_is_tokenized() {
        let tokens = tokenize_path("a.c", "int x;\n").unwrap();
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Identifier && t.text == "x"));
    }
}
