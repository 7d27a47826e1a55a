//! Stage 2 — parallel per-blob extraction (spec §4.4).
//!
//! Each new blob is independent of every other: no shared mutable state
//! is touched here, which is what lets the caller dispatch this over a
//! worker pool (`mod.rs` uses `rayon`) with the merge left strictly to
//! Stage 3. A blob whose collaborator calls fail is dropped wholesale —
//! per spec, "if any worker fails on a blob, that blob's contribution is
//! dropped; the update proceeds."

use crate::collaborator::Collaborator;
use crate::lexer::{self, TokenKind};
use crate::types::{is_ident, BlobId, DefType, Family};
use crate::updater::compatible_dts;
use crate::updater::enumerate::NewBlob;
use std::collections::HashMap;
use tracing::warn;

pub struct ExtractedBlob {
    pub blob_id: BlobId,
    /// `None` when the path has no storage family (spec §4.1 dispatcher):
    /// defs/docs/comps/refs are all empty, but `comps_docs` may still hold
    /// hits, since the original scans every blob for binding-doc
    /// compatible strings regardless of its own family.
    pub family: Option<Family>,
    pub defs: Vec<(String, DefType, u32)>,
    pub docs: Vec<(String, u32)>,
    pub comps: Vec<(String, u32)>,
    /// identifier -> ascending line numbers referencing it in this blob.
    pub refs: HashMap<String, Vec<u32>>,
    /// Candidate `compatibledts_docs` hits — family `B` is assigned
    /// out-of-band here, never via the path dispatcher (ported from
    /// `non_gen_update.py`'s `get_comps_docs`, which hardcodes `family =
    /// 'B'` and runs over every blob, not just ones the dispatcher
    /// recognizes).
    pub comps_docs: Vec<(String, u32)>,
}

/// Returns `None` only when a collaborator call genuinely failed; a blob
/// with no recognized storage family still contributes `comps_docs` hits.
pub fn extract_blob(collaborator: &dyn Collaborator, blob: &NewBlob) -> Option<ExtractedBlob> {
    let family = lexer::storage_family(&blob.path);

    let mut defs = Vec::new();
    let mut docs = Vec::new();
    let mut comps = Vec::new();

    if let Some(family) = family {
        if family != Family::M {
            match collaborator.parse_defs(&blob.hash, &blob.path, family) {
                Ok(hits) => defs.extend(
                    hits.into_iter()
                        .filter(|h| is_ident(h.ident.as_bytes()))
                        .map(|h| (h.ident, h.def_type, h.line)),
                ),
                Err(e) => {
                    warn!(hash = %blob.hash, path = %blob.path, error = %e, "parse-defs failed, dropping blob");
                    return None;
                }
            }
            match collaborator.parse_docs(&blob.hash, &blob.path) {
                Ok(hits) => docs.extend(
                    hits.into_iter().filter(|h| is_ident(h.ident.as_bytes())).map(|h| (h.ident, h.line)),
                ),
                Err(e) => {
                    warn!(hash = %blob.hash, path = %blob.path, error = %e, "parse-docs failed, dropping blob");
                    return None;
                }
            }
        }
    }

    let code = match collaborator.get_blob(&blob.hash) {
        Ok(bytes) => String::from_utf8(bytes).ok(),
        Err(e) => {
            warn!(hash = %blob.hash, path = %blob.path, error = %e, "get-blob failed, dropping blob");
            return None;
        }
    };

    let Some(code) = code else {
        return Some(ExtractedBlob {
            blob_id: blob.blob_id,
            family,
            defs,
            docs,
            comps,
            refs: HashMap::new(),
            comps_docs: Vec::new(),
        });
    };

    if let Some(family) = family {
        if family != Family::K && family != Family::M {
            comps = compatible_dts::extract(&code, family);
        }
    }

    let refs = family.map(|f| extract_refs(&blob.path, &code, f)).unwrap_or_default();
    let comps_docs = compatible_dts::extract(&code, Family::B);

    Some(ExtractedBlob { blob_id: blob.blob_id, family, defs, docs, comps, refs, comps_docs })
}

fn extract_refs(path: &str, code: &str, family: Family) -> HashMap<String, Vec<u32>> {
    let mut refs: HashMap<String, Vec<u32>> = HashMap::new();
    let Some(tokens) = lexer::tokenize_path(path, code) else {
        return refs;
    };

    for token in tokens {
        if !matches!(token.kind, TokenKind::Identifier | TokenKind::Special) {
            continue;
        }
        if !is_ident(token.text.as_bytes()) {
            continue;
        }

        let ident = match family {
            Family::K => format!("CONFIG_{}", token.text),
            Family::M => {
                if !token.text.starts_with("CONFIG_") {
                    continue;
                }
                token.text.clone()
            }
            _ => token.text.clone(),
        };

        let lines = refs.entry(ident).or_default();
        if lines.last() != Some(&token.line) {
            lines.push(token.line);
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{DefHit, DocHit, FakeCollaborator};

    #[test]
    fn unrecognized_path_still_yields_comps_docs_candidates() {
        let collaborator = FakeCollaborator::new();
        collaborator.set_blob_content("h1", b"- compatible: \"acme,sensor\"\n".to_vec());
        let blob = NewBlob { blob_id: BlobId::new(0), hash: "h1".into(), path: "Documentation/devicetree/bindings/acme.yaml".into() };

        let extracted = extract_blob(&collaborator, &blob).unwrap();
        assert!(extracted.family.is_none());
        assert!(extracted.defs.is_empty());
        assert_eq!(extracted.comps_docs, vec![("acme,sensor".to_string(), 1)]);
    }

    #[test]
    fn kconfig_refs_get_config_prefix() {
        let collaborator = FakeCollaborator::new();
        collaborator.set_blob_content("h1", b"config FOO\n\tdepends on BAR\n".to_vec());
        let blob = NewBlob { blob_id: BlobId::new(0), hash: "h1".into(), path: "arch/x86/Kconfig".into() };

        let extracted = extract_blob(&collaborator, &blob).unwrap();
        assert_eq!(extracted.family, Some(Family::K));
        assert!(extracted.refs.contains_key("CONFIG_BAR"));
    }

    #[test]
    fn makefile_refs_keep_only_config_prefixed() {
        let collaborator = FakeCollaborator::new();
        collaborator.set_blob_content("h1", b"obj-$(CONFIG_FOO) += foo.o\nother := bar\n".to_vec());
        let blob = NewBlob { blob_id: BlobId::new(0), hash: "h1".into(), path: "drivers/Makefile".into() };

        let extracted = extract_blob(&collaborator, &blob).unwrap();
        assert!(extracted.refs.contains_key("CONFIG_FOO"));
        assert!(!extracted.refs.contains_key("other"));
        assert!(!extracted.refs.contains_key("bar"));
    }

    #[test]
    fn get_blob_failure_drops_the_whole_blob() {
        let collaborator = FakeCollaborator::new();
        let blob = NewBlob { blob_id: BlobId::new(0), hash: "missing".into(), path: "a.c".into() };
        assert!(extract_blob(&collaborator, &blob).is_none());
    }

    #[test]
    fn c_family_collects_def_and_ref_hits() {
        let collaborator = FakeCollaborator::new();
        collaborator.set_blob_content("h1", b"int foo(void) { return bar(); }\n".to_vec());
        collaborator.set_defs("h1", vec![DefHit { ident: "foo".into(), def_type: DefType::Function, line: 1 }]);
        collaborator.set_docs("h1", vec![DocHit { ident: "foo".into(), line: 1 }]);
        let blob = NewBlob { blob_id: BlobId::new(0), hash: "h1".into(), path: "a.c".into() };

        let extracted = extract_blob(&collaborator, &blob).unwrap();
        assert_eq!(extracted.defs, vec![("foo".to_string(), DefType::Function, 1)]);
        assert_eq!(extracted.docs, vec![("foo".to_string(), 1)]);
        assert!(extracted.refs.contains_key("bar"));
    }
}
