//! GNU assembler family lexer rules, parameterized by architecture.
//!
//! The original lexer module hard-codes one `GASM_rules` table built around
//! five architectures' comment conventions folded into one best-effort regex
//! (`gasm_hash_comment`, `gasm_semicolon_comment`, `gasm_exclamation_comment`,
//! `gasm_at_comment`). This rewrite keeps those four regex shapes but makes
//! the comment-character set a per-architecture table instead of one fixed
//! alternation, so a `#` can be a first-in-line-only comment marker for one
//! architecture (arm32) while being an always-on one for another (powerpc).

use super::common;
use super::engine::{Rule, Trigger};
use super::token::TokenKind;
use std::collections::HashMap;
use std::sync::OnceLock;

/// How a comment character behaves once it is recognized as a comment
/// starter at all (column position is handled separately via [`Trigger`]).
#[derive(Clone, Copy)]
enum CommentStyle {
    /// `#(\s*\n|\s+[^0-9\s].*\n)` — the char alone on a line, or followed by
    /// whitespace and non-numeric text (numeric first word is a line marker,
    /// not a comment, per the original's note on assembler line directives).
    Hash,
    /// `X\s+[a-zA-Z0-9](\s*\n|\s*[^0-9\s].*\n)` — requires a space and an
    /// alphanumeric before any text counts as a comment (so stray uses of the
    /// character as an operator, e.g. `|` for bitwise-or, are not swallowed).
    Strict,
}

#[derive(Clone, Copy)]
struct CommentChar {
    ch: char,
    style: CommentStyle,
    trigger: Trigger,
}

struct Arch {
    comment_chars: &'static [CommentChar],
}

fn escape(c: char) -> String {
    regex::escape(&c.to_string())
}

fn comment_pattern(cc: &CommentChar) -> String {
    let esc = escape(cc.ch);
    match cc.style {
        CommentStyle::Hash => format!(r"{esc}(\s*\n|\s+[^0-9\s].*\n)"),
        CommentStyle::Strict => format!(r"{esc}\s+[a-zA-Z0-9](\s*\n|\s*[^0-9\s].*\n)"),
    }
}

const GASM_IDENTIFIER: &str = r"[a-zA-Z0-9_][a-zA-Z0-9_$.]*";
const GASM_FLONUM: &str = r"0?\.[a-zA-Z][+-][0-9]*\.[0-9]*([eE][+-]*[0-9]+)?";
const GASM_CHAR: &str = r"'(\\.|.|\n)";
// TODO: support `#digits`/`#SCREAM_CASE` immediate operands without a preceding space
// (seen on arm/psci.S); currently tokenized as punctuation `#` + number/identifier.
const GASM_PUNCTUATION: &str = r"[.,\[\]()<>{}%&+*!|@#$;:^/\\=~-]";
// Widened from the original's (define|ifdef|ifndef|undef|if|else|elif) to also
// recognize `#endif`, matching the keyword set the C family tags `special`.
const GASM_PREPROC: &str = r"#[ \t]*(define|ifndef|ifdef|undef|endif|if|else|elif)\b";

fn archs() -> &'static HashMap<&'static str, Arch> {
    static ARCHS: OnceLock<HashMap<&'static str, Arch>> = OnceLock::new();
    ARCHS.get_or_init(|| {
        let mut m = HashMap::new();
        m.insert(
            "generic",
            Arch { comment_chars: &[] },
        );
        m.insert(
            "arm",
            Arch {
                comment_chars: &[
                    CommentChar { ch: '#', style: CommentStyle::Hash, trigger: Trigger::FirstInLine },
                    CommentChar { ch: '@', style: CommentStyle::Strict, trigger: Trigger::Always },
                ],
            },
        );
        m.insert(
            "powerpc",
            Arch {
                comment_chars: &[CommentChar { ch: '#', style: CommentStyle::Hash, trigger: Trigger::Always }],
            },
        );
        m.insert(
            "m68k",
            Arch {
                comment_chars: &[CommentChar { ch: '|', style: CommentStyle::Hash, trigger: Trigger::Always }],
            },
        );
        m.insert(
            "sh",
            Arch {
                comment_chars: &[CommentChar { ch: '!', style: CommentStyle::Strict, trigger: Trigger::Always }],
            },
        );
        m.insert(
            "sparc",
            Arch {
                comment_chars: &[CommentChar { ch: '!', style: CommentStyle::Strict, trigger: Trigger::Always }],
            },
        );
        m.insert(
            "parisc",
            Arch {
                comment_chars: &[CommentChar { ch: ';', style: CommentStyle::Strict, trigger: Trigger::Always }],
            },
        );
        m
    })
}

fn build_rules(arch: &Arch) -> Vec<Rule> {
    let mut rules = vec![
        Rule::always(common::WHITESPACE, TokenKind::Whitespace),
        // macro token-pasting, never a comment start even when `#` is a comment char.
        Rule::always(r"##", TokenKind::Punctuation),
        Rule::always(r"\|\|", TokenKind::Punctuation),
        Rule::first_in_line(GASM_PREPROC, TokenKind::Special),
    ];

    for cc in arch.comment_chars {
        let pattern = comment_pattern(cc);
        match cc.trigger {
            Trigger::Always => rules.push(Rule::always(&pattern, TokenKind::Comment)),
            Trigger::FirstInLine => rules.push(Rule::first_in_line(&pattern, TokenKind::Comment)),
        }
    }

    let gasm_number = format!(
        "(({})|({})|({})|({}))",
        common::c_hexidecimal_integer(),
        common::c_binary_integer(),
        common::c_decimal_integer(),
        GASM_FLONUM
    );
    let gasm_string = format!("(({})|({}))", common::c_string(), GASM_CHAR);

    rules.push(Rule::always(&gasm_string, TokenKind::String));
    rules.push(Rule::always(&gasm_number, TokenKind::Number));
    rules.push(Rule::always(GASM_IDENTIFIER, TokenKind::Identifier));
    rules.push(Rule::always(GASM_PUNCTUATION, TokenKind::Punctuation));
    rules
}

/// Rules for a named architecture (e.g. `"arm"`), falling back to `"generic"`
/// for unrecognized names (dispatch derives the name from `arch/<name>/`).
pub fn rules_for_arch(arch: &str) -> &'static [Rule] {
    static TABLE: OnceLock<HashMap<String, Vec<Rule>>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        archs().iter().map(|(name, a)| (name.to_string(), build_rules(a))).collect()
    });
    table
        .get(arch)
        .or_else(|| table.get("generic"))
        .expect("generic gas rule set always present")
        .as_slice()
}

#[cfg(test)]
mod tests {
    use super::super::engine::lex;
    use super::*;

    #[test]
    fn arm32_hash_comment_only_first_in_line() {
        let tokens = lex(rules_for_arch("arm"), "#if 1\n    add r0,#4 @ comment\n#endif\n");
        let kinds: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text.as_str()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Special, "#if"),
                (TokenKind::Identifier, "add"),
                (TokenKind::Identifier, "r0"),
                (TokenKind::Punctuation, ","),
                (TokenKind::Punctuation, "#"),
                (TokenKind::Number, "4"),
                (TokenKind::Comment, "@ comment\n"),
                (TokenKind::Special, "#endif"),
            ]
        );
    }

    #[test]
    fn generic_has_no_hash_comment_rule() {
        let tokens = lex(rules_for_arch("generic"), "add r0,#4\n");
        let idents: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Identifier).map(|t| t.text.as_str()).collect();
        assert_eq!(idents, vec!["add", "r0"]);
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Comment));
    }

    #[test]
    fn double_hash_never_starts_comment() {
        let tokens = lex(rules_for_arch("powerpc"), "a ## b\n");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Punctuation && t.text == "##"));
    }

    #[test]
    fn unknown_arch_falls_back_to_generic() {
        let tokens = lex(rules_for_arch("nonexistent-arch"), "foo\n");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
    }
}
