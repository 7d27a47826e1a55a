//! Rule-based longest-first-attempt lexing engine (spec §4.1).
//!
//! Behavior ported from `original_source/elixir/lexers.py`'s `lex()` /
//! `LexerContext`: rules are tried *in order* (not by longest match across all
//! rules — "first rule that matches wins", which is how the Python engine and
//! every per-family rule table here is actually ordered so that the most
//! specific pattern comes first), the cursor advances by the matched span,
//! and a callback rule may consume more than its own match (the Kconfig help
//! scanner, the DTS unit-address splitter).

use super::token::{Token, TokenKind};
use regex::Regex;

/// What a matched rule produces.
pub enum Action {
    /// Emit a single token of this kind spanning the whole match.
    Kind(TokenKind),
    /// Run a callback that may emit one or more tokens and advance the cursor
    /// past its own match (e.g. the Kconfig `help` body scanner).
    Callback(CallbackFn),
}

/// `(code, match_start, match_end, line)` -> tokens, each carrying its own
/// absolute span. The last token's `span.1` becomes the engine's next cursor
/// position; the last token's line (plus its own embedded newlines) becomes
/// the next line counter.
pub type CallbackFn = fn(&str, usize, usize, u32) -> Vec<Token>;

/// Whether a rule may fire anywhere, or only when the bytes since the last
/// newline (or start of input) are all whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Always,
    FirstInLine,
}

pub struct Rule {
    pub regex: Regex,
    pub action: Action,
    pub trigger: Trigger,
}

impl Rule {
    pub fn always(pattern: &str, kind: TokenKind) -> Rule {
        Rule {
            regex: Regex::new(pattern).expect("static lexer rule pattern must compile"),
            action: Action::Kind(kind),
            trigger: Trigger::Always,
        }
    }

    pub fn first_in_line(pattern: &str, kind: TokenKind) -> Rule {
        Rule {
            regex: Regex::new(pattern).expect("static lexer rule pattern must compile"),
            action: Action::Kind(kind),
            trigger: Trigger::FirstInLine,
        }
    }

    pub fn callback(pattern: &str, trigger: Trigger, callback: CallbackFn) -> Rule {
        Rule {
            regex: Regex::new(pattern).expect("static lexer rule pattern must compile"),
            action: Action::Callback(callback),
            trigger,
        }
    }
}

/// Tokenize `code` against `rules`. Mirrors `lex()` in the original Python
/// implementation: a trailing newline is appended if missing, every byte is
/// covered exactly once (unmatched bytes become single-byte `error` tokens),
/// and line numbers are 1-based and monotonically non-decreasing.
pub fn lex(rules: &[Rule], code: &str) -> Vec<Token> {
    if code.is_empty() {
        return Vec::new();
    }

    let mut buf = code.to_string();
    if !buf.ends_with('\n') {
        buf.push('\n');
    }

    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line = 1u32;
    let mut line_start = 0usize;
    let len = buf.len();

    while pos < len {
        let first_in_line = buf[line_start..pos].bytes().all(|b| b == b' ' || b == b'\t' || b == b'\r');
        let mut matched = false;

        for rule in rules {
            if rule.trigger == Trigger::FirstInLine && !first_in_line {
                continue;
            }
            let Some(m) = rule.regex.find(&buf[pos..]) else {
                continue;
            };
            if m.start() != 0 {
                // Only anchored-at-cursor matches count; regex::find on the
                // suffix slice always starts the search at 0 relative to pos.
                continue;
            }
            let span_end = pos + m.end();
            if span_end == pos {
                // Zero-width match: cannot make progress, try the next rule.
                continue;
            }

            matched = true;
            match &rule.action {
                Action::Kind(kind) => {
                    let text = &buf[pos..span_end];
                    tokens.push(Token::new(*kind, text, (pos, span_end), line));
                    line += text.matches('\n').count() as u32;
                    advance_line_start(&buf, pos, span_end, &mut line_start);
                    pos = span_end;
                }
                Action::Callback(callback) => {
                    let produced = callback(&buf, pos, span_end, line);
                    if produced.is_empty() {
                        // Callback declined; fall through to error-byte handling.
                        matched = false;
                        break;
                    }
                    for tok in &produced {
                        advance_line_start(&buf, tok.span.0, tok.span.1, &mut line_start);
                    }
                    let last = produced.last().unwrap();
                    line = last.line + last.text.matches('\n').count() as u32;
                    pos = last.span.1;
                    tokens.extend(produced);
                }
            }
            break;
        }

        if !matched {
            let ch_len = next_char_len(&buf, pos);
            let span_end = pos + ch_len;
            let text = &buf[pos..span_end];
            tokens.push(Token::new(TokenKind::Error, text, (pos, span_end), line));
            if text == "\n" {
                line += 1;
                line_start = span_end;
            }
            pos = span_end;
        }
    }

    tokens
}

fn next_char_len(buf: &str, pos: usize) -> usize {
    buf[pos..].chars().next().map(|c| c.len_utf8()).unwrap_or(1)
}

/// After emitting a token spanning `[start, end)`, move `line_start` to just
/// past the last newline inside that span, if any.
fn advance_line_start(buf: &str, start: usize, end: usize, line_start: &mut usize) {
    if let Some(rel) = buf[start..end].rfind('\n') {
        *line_start = start + rel + 1;
    }
}
