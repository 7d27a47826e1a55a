//! C/C++ family lexer rules.
//!
//! Grounded on `C_rules` in the original lexer module, with one addition the
//! distilled contract calls for that the original does not have: preprocessor
//! keywords (`#if`, `#ifdef`, ...) tagged `special`, first-in-line only,
//! alongside the original's angled `#include` and `#warning`/`#error` rules.

use super::common;
use super::engine::{Rule, Trigger};
use super::token::TokenKind;
use std::sync::OnceLock;

const C_PUNCTUATION: &str = r"[!#%&`()*+,./:;<=>?\[\]\\^_{|}~-]";
// arch/sh and arch/arm asm-in-macro headers use $ and @ outside strings.
const C_PUNCTUATION_EXTRA: &str = r"[$\\@]";
const C_WARNING_AND_ERROR: &str = r"#\s*(warning|error)(\\\s*\n|[^\n])*\n";
const C_PREPROC_KEYWORD: &str = r"#\s*(ifndef|ifdef|if|elif|else|define|undef|endif)\b";

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

pub fn rules() -> &'static [Rule] {
    RULES
        .get_or_init(|| {
            vec![
                Rule::always(common::WHITESPACE, TokenKind::Whitespace),
                Rule::always(&common::c_comment(), TokenKind::Comment),
                Rule::always(&common::c_string_and_char(), TokenKind::String),
                Rule::always(&common::c_number(), TokenKind::Number),
                Rule::always(common::C_IDENTIFIER, TokenKind::Identifier),
                Rule::first_in_line(common::C_ANGLED_INCLUDE, TokenKind::Special),
                Rule::first_in_line(C_WARNING_AND_ERROR, TokenKind::Special),
                Rule::first_in_line(C_PREPROC_KEYWORD, TokenKind::Special),
                Rule::always(C_PUNCTUATION, TokenKind::Punctuation),
                Rule::always(C_PUNCTUATION_EXTRA, TokenKind::Punctuation),
            ]
        })
        .as_slice()
}
