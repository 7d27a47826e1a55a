//! Device-tree source family lexer rules.
//!
//! Grounded on `DTS_rules`, keeping the original's unit-address split
//! (`dts_unit_address`, `split_by_groups`) and adding the special-keyword
//! rule (`/include/`, `/dts-v1/`, `/memreserve/`, `/delete-node/`,
//! `/delete-property/`) the distilled contract calls for. Labels
//! (`name:`), label references (`&name`) and node references
//! (`&{/path@unit}`) need no dedicated rule: `dts_punctuation` already
//! contains `:`, `&`, `{`, `}` and `/`, so the generic rules split them into
//! the right token kinds on their own.

use super::common;
use super::engine::{Rule, Trigger};
use super::token::{Token, TokenKind};
use std::sync::OnceLock;

const DTS_IDENTIFIER: &str = r"[0-9a-zA-Z_][0-9a-zA-Z,._+?#-]*[0-9a-zA-Z_]";
const DTS_SINGLE_CHAR_IDENTIFIER: &str = r"[0-9a-zA-Z_]";
const DTS_PUNCTUATION: &str = r"[#@:;{}\[\]()^<>=+*/%&\\|~!?,-]";
const DTS_SPECIAL_KEYWORD: &str = r"/(include|dts-v1|memreserve|delete-node|delete-property)/";
const DTS_UNIT_ADDRESS: &str = r"(@)([0-9a-zA-Z,._+-]+)";

fn unit_address_callback(buf: &str, pos: usize, match_end: usize, line: u32) -> Vec<Token> {
    // The rule itself guarantees an `@` followed by one-or-more address
    // chars; re-find the split point rather than threading capture groups
    // through the engine's generic callback signature.
    let at_end = pos + 1;
    debug_assert_eq!(&buf[pos..at_end], "@");
    vec![
        Token::new(TokenKind::Punctuation, &buf[pos..at_end], (pos, at_end), line),
        Token::new(TokenKind::Special, &buf[at_end..match_end], (at_end, match_end), line),
    ]
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

pub fn rules() -> &'static [Rule] {
    RULES
        .get_or_init(|| {
            vec![
                Rule::always(common::WHITESPACE, TokenKind::Whitespace),
                Rule::always(&common::c_comment(), TokenKind::Comment),
                Rule::always(&common::c_string_and_char(), TokenKind::String),
                Rule::always(&common::c_number(), TokenKind::Number),
                Rule::always(DTS_SPECIAL_KEYWORD, TokenKind::Special),
                Rule::always(DTS_IDENTIFIER, TokenKind::Identifier),
                Rule::always(common::C_ANGLED_INCLUDE, TokenKind::Special),
                Rule::callback(DTS_UNIT_ADDRESS, Trigger::Always, unit_address_callback),
                Rule::always(DTS_PUNCTUATION, TokenKind::Punctuation),
                Rule::always(DTS_SINGLE_CHAR_IDENTIFIER, TokenKind::Identifier),
            ]
        })
        .as_slice()
}
