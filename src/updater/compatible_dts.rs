//! Device-tree `compatible` string extraction (spec §4.4, `comps`/`comps_docs`).
//!
//! The original implementation's `FindCompatibleDTS` parser (invoked over
//! `get-blob` output, not a dedicated collaborator subcommand — see
//! `non_gen_update.py`'s `get_comps`/`get_comps_docs`) isn't itself part of
//! the filtered reference corpus, so this is a from-scratch, in-process
//! reconstruction of its observable contract: scan blob text for DT
//! `compatible = "vendor,model";` property assignments (family `D`) or
//! `compatible` entries inside binding documentation prose (family `B`),
//! and return each `vendor,model` string alongside its 1-based line.
//!
//! Both shapes share the same `"vendor,model"` string grammar, so one
//! regex covers both families — only the caller's choice of storage
//! family (`D` vs `B`) differs.

use crate::types::Family;
use regex::Regex;
use std::sync::OnceLock;

fn compatible_string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([A-Za-z0-9_.+-]+,[A-Za-z0-9_.+-]+)""#).unwrap())
}

/// Every `vendor,model` compatible string found in `text`, paired with its
/// 1-based line number. `family` only documents intent at the call site —
/// the lexical shape scanned for is identical either way.
pub fn extract(text: &str, _family: Family) -> Vec<(String, u32)> {
    let mut out = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if !line.contains("compatible") {
            continue;
        }
        for caps in compatible_string_re().captures_iter(line) {
            out.push((caps[1].to_string(), (idx + 1) as u32));
        }
    }
    out
}
