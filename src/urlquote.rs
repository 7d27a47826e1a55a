//! Minimal percent-encoding for DT-compatible identifiers used as store
//! keys (spec §4.5: "URL-quoting `ident` for the key"). Grounded on the
//! original's `QuotedKeyConverter` (`data.py`), which exists because
//! compatible strings like `"acme,widget"` contain a comma the original
//! on-disk key format couldn't otherwise round-trip safely.
//!
//! Mirrors Python's `urllib.parse.quote` default safe set (`/`) plus the
//! usual unreserved characters; nothing else in this crate needs a general
//! percent-encoder, so this stays local rather than pulling in a crate.

const UNRESERVED: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_.-~/";

pub fn quote(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    for byte in ident.bytes() {
        if UNRESERVED.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

pub fn unquote(encoded: &str) -> Option<String> {
    let bytes = encoded.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = encoded.get(i + 1..i + 3)?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
