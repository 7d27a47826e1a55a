//! Kconfig family lexer rules.
//!
//! Grounded on `KCONFIG_rules` and `parse_kconfig_help_text` in the original
//! lexer module, ported near line-for-line: the `help`/`---help---` callback
//! still switches into a whitespace-scoped body scanner that ends at the
//! first non-empty line whose indentation (tabs counted as 8 columns) is
//! less than the first body line's indentation.

use super::engine::{Rule, Trigger};
use super::token::{Token, TokenKind};
use regex::Regex;
use std::sync::OnceLock;

const HASH_COMMENT: &str = r"#(\\\s*\n|[^\n])*\n";
const KCONFIG_IDENTIFIER: &str = r"[A-Z0-9_][A-Z0-9a-z_-]*";
const KCONFIG_MINOR_IDENTIFIER: &str = r"[a-zA-Z0-9_/][a-zA-Z0-9_/.-]*";
const KCONFIG_PUNCTUATION: &str = r"[|&!=$()/_.+<>,-]";
const KCONFIG_DOUBLE_QUOTE_STRING: &str = r#""[^\n]*?""#;
const KCONFIG_SINGLE_QUOTE_STRING: &str = r"'[^\n]*?'";
const HELP_KEYWORD_DASHED: &str = r"-*help-*";
const HELP_KEYWORD_BARE: &str = r"help";
const CATCH_ALL: &str = r"[^\n]+";

fn kconfig_string() -> String {
    format!("(({KCONFIG_DOUBLE_QUOTE_STRING})|({KCONFIG_SINGLE_QUOTE_STRING}))")
}

fn whitespace_after_help_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*?\n").unwrap())
}

fn line_matcher_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\n]*\n").unwrap())
}

fn count_help_whitespace(s: &str) -> usize {
    let tabs = s.chars().filter(|&c| c == '\t').count();
    let spaces = s.chars().filter(|&c| c == ' ').count();
    8 * tabs + spaces + (s.chars().count() - tabs - spaces)
}

fn leading_whitespace(line: &str) -> &str {
    let end = line.char_indices().find(|&(_, c)| !c.is_whitespace()).map(|(i, _)| i).unwrap_or(line.len());
    &line[..end]
}

/// Ported from `parse_kconfig_help_text`: emits the `help`/`---help---`
/// keyword token, then (if followed by only whitespace to end of line) a
/// single `comment` token spanning the indented help body.
fn help_text_callback(buf: &str, pos: usize, match_end: usize, line: u32) -> Vec<Token> {
    let mut tokens = vec![Token::new(TokenKind::Identifier, &buf[pos..match_end], (pos, match_end), line)];
    let mut cur_line = line + buf[pos..match_end].matches('\n').count() as u32;

    let Some(m) = whitespace_after_help_re().find(&buf[match_end..]) else {
        return tokens;
    };
    if m.start() != 0 {
        return tokens;
    }
    let ws_end = match_end + m.end();
    let ws_text = &buf[match_end..ws_end];
    tokens.push(Token::new(TokenKind::Whitespace, ws_text, (match_end, ws_end), cur_line));
    cur_line += ws_text.matches('\n').count() as u32;

    let start_help_text = ws_end;
    let mut current = ws_end;
    let mut min_whitespace: Option<usize> = None;

    loop {
        if current >= buf.len() {
            break;
        }
        let Some(lm) = line_matcher_re().find(&buf[current..]) else {
            break;
        };
        if lm.start() != 0 {
            break;
        }
        let line_text = &buf[current..current + lm.end()];
        let line_end = current + lm.end();

        if line_text == "\n" {
            current = line_end;
            continue;
        }

        let leading = leading_whitespace(line_text);
        let cur_whitespace = count_help_whitespace(leading);
        match min_whitespace {
            None => {
                min_whitespace = Some(cur_whitespace);
                current = line_end;
            }
            Some(min_ws) if cur_whitespace < min_ws => break,
            Some(_) => current = line_end,
        }
    }

    tokens.push(Token::new(TokenKind::Comment, &buf[start_help_text..current], (start_help_text, current), cur_line));
    tokens
}

static RULES: OnceLock<Vec<Rule>> = OnceLock::new();

pub fn rules() -> &'static [Rule] {
    RULES
        .get_or_init(|| {
            vec![
                Rule::always(r"\s+", TokenKind::Whitespace),
                Rule::always(HASH_COMMENT, TokenKind::Comment),
                Rule::always(&kconfig_string(), TokenKind::String),
                // u-boot kconfigs sometimes spell this `---help---`.
                Rule::callback(HELP_KEYWORD_DASHED, Trigger::FirstInLine, help_text_callback),
                Rule::always(KCONFIG_PUNCTUATION, TokenKind::Punctuation),
                Rule::callback(HELP_KEYWORD_BARE, Trigger::FirstInLine, help_text_callback),
                Rule::always(KCONFIG_IDENTIFIER, TokenKind::Identifier),
                Rule::always(KCONFIG_MINOR_IDENTIFIER, TokenKind::Special),
                // Unmatched text is probably a macro call; both shell-call and
                // warning/error macro forms would need a dedicated parser.
                Rule::always(CATCH_ALL, TokenKind::Special),
            ]
        })
        .as_slice()
}

#[cfg(test)]
mod tests {
    use super::super::engine::lex;
    use super::*;

    #[test]
    fn config_and_identifier() {
        let tokens = lex(rules(), "config HAS_FOO\n\tbool\n\tdefault y\n");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Identifier && t.text == "HAS_FOO"));
    }

    #[test]
    fn help_body_ends_at_lower_indentation() {
        let src = "config FOO\n\thelp\n\t  line one\n\t  line two\nconfig BAR\n";
        let tokens = lex(rules(), src);
        let comment = tokens.iter().find(|t| t.kind == TokenKind::Comment).expect("help body token");
        assert!(comment.text.contains("line one"));
        assert!(comment.text.contains("line two"));
        assert!(!comment.text.contains("config BAR"));
    }

    #[test]
    fn dashed_help_keyword_recognized() {
        let tokens = lex(rules(), "---help---\n  text\n");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Identifier && t.text == "---help---"));
    }
}
