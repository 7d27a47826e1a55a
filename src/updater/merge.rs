//! Stage 3 — merge (spec §4.4, single-threaded).
//!
//! Ordering matters and is enforced by the order these functions are
//! called in: defs, then docs, then comps, then comps_docs (filtered
//! against `compatibledts`), then refs last (refs subtract def sites from
//! their own blob so a site is either a def or a ref, never both).
//! Ported from `non_gen_update.py`'s `PartialDBState.add_defs`/`add_docs`/
//! `add_comps`/`add_comps_docs`/`add_refs`.

use crate::codec::{DefList, RefList};
use crate::error::IndexResult;
use crate::store::{tables, Store};
use crate::types::{BlobId, DefType, Family};
use crate::updater::extract::ExtractedBlob;
use std::collections::{HashMap, HashSet};

/// (BlobId, line) sites already claimed by a definition, keyed by
/// identifier — refs at the same site are suppressed.
pub type DefSites = HashMap<String, HashSet<(BlobId, u32)>>;

pub fn merge(store: &impl Store, extracted: &[ExtractedBlob]) -> IndexResult<DefSites> {
    let def_sites = merge_defs(store, extracted)?;
    merge_refslike(store, tables::DOCCOMMENTS, group_docs(extracted), false)?;
    merge_refslike(store, tables::COMPATIBLE_DTS, group_comps(extracted), true)?;
    merge_comps_docs(store, extracted)?;
    merge_refs(store, extracted, &def_sites)?;
    Ok(def_sites)
}

fn merge_defs(store: &impl Store, extracted: &[ExtractedBlob]) -> IndexResult<DefSites> {
    let mut def_sites: DefSites = HashMap::new();
    let mut grouped: HashMap<&str, Vec<(BlobId, DefType, u32, Family)>> = HashMap::new();

    for blob in extracted {
        let Some(family) = blob.family else { continue };
        for (ident, def_type, line) in &blob.defs {
            grouped.entry(ident.as_str()).or_default().push((blob.blob_id, *def_type, *line, family));
            def_sites.entry(ident.clone()).or_default().insert((blob.blob_id, *line));
        }
    }

    for (ident, entries) in grouped {
        let existing = store.get(tables::DEFINITIONS, ident.as_bytes())?;
        let mut list = match existing {
            Some(bytes) => DefList::decode(&bytes)?,
            None => DefList::new(),
        };
        for (blob_id, def_type, line, family) in entries {
            list.append(blob_id, def_type, line, family);
        }
        store.put(tables::DEFINITIONS, ident.as_bytes(), &list.encode())?;
    }

    Ok(def_sites)
}

fn group_docs(extracted: &[ExtractedBlob]) -> HashMap<&str, Vec<(BlobId, u32, Family)>> {
    let mut grouped: HashMap<&str, Vec<(BlobId, u32, Family)>> = HashMap::new();
    for blob in extracted {
        let Some(family) = blob.family else { continue };
        for (ident, line) in &blob.docs {
            grouped.entry(ident.as_str()).or_default().push((blob.blob_id, *line, family));
        }
    }
    grouped
}

fn group_comps(extracted: &[ExtractedBlob]) -> HashMap<&str, Vec<(BlobId, u32, Family)>> {
    let mut grouped: HashMap<&str, Vec<(BlobId, u32, Family)>> = HashMap::new();
    for blob in extracted {
        let Some(family) = blob.family else { continue };
        for (ident, line) in &blob.comps {
            grouped.entry(ident.as_str()).or_default().push((blob.blob_id, *line, family));
        }
    }
    grouped
}

/// `quote_key` is `true` for `compatibledts` (spec §4.5: DT-compatible
/// lookups are keyed by a percent-encoded identifier, since the string
/// itself — e.g. `"acme,widget"` — contains a comma).
fn merge_refslike(
    store: &impl Store,
    table: &str,
    grouped: HashMap<&str, Vec<(BlobId, u32, Family)>>,
    quote_key: bool,
) -> IndexResult<()> {
    for (ident, entries) in grouped {
        let key = if quote_key { crate::urlquote::quote(ident) } else { ident.to_string() };
        let existing = store.get(table, key.as_bytes())?;
        let mut list = match existing {
            Some(bytes) => RefList::decode(&bytes)?,
            None => RefList::new(),
        };
        for (blob_id, line, family) in entries {
            list.append(blob_id, &line.to_string(), family);
        }
        store.put(table, key.as_bytes(), &list.encode())?;
    }
    Ok(())
}

/// `comps_docs` candidates only survive if `ident` already has a
/// `compatibledts` entry (spec §4.4: "only keep identifiers that already
/// exist in `compatibledts`") — checked against the table *after*
/// `merge_comps` above has run, so a compatible string introduced in this
/// same tag update is visible to its own binding-doc pass.
fn merge_comps_docs(store: &impl Store, extracted: &[ExtractedBlob]) -> IndexResult<()> {
    let mut grouped: HashMap<&str, Vec<(BlobId, u32)>> = HashMap::new();
    for blob in extracted {
        for (ident, line) in &blob.comps_docs {
            grouped.entry(ident.as_str()).or_default().push((blob.blob_id, *line));
        }
    }

    for (ident, entries) in grouped {
        let key = crate::urlquote::quote(ident);
        if !store.exists(tables::COMPATIBLE_DTS, key.as_bytes())? {
            continue;
        }
        let existing = store.get(tables::COMPATIBLE_DTS_DOCS, key.as_bytes())?;
        let mut list = match existing {
            Some(bytes) => RefList::decode(&bytes)?,
            None => RefList::new(),
        };
        for (blob_id, line) in entries {
            list.append(blob_id, &line.to_string(), Family::B);
        }
        store.put(tables::COMPATIBLE_DTS_DOCS, key.as_bytes(), &list.encode())?;
    }
    Ok(())
}

fn merge_refs(store: &impl Store, extracted: &[ExtractedBlob], def_sites: &DefSites) -> IndexResult<()> {
    let mut grouped: HashMap<&str, Vec<(BlobId, Family, Vec<u32>)>> = HashMap::new();

    for blob in extracted {
        let Some(family) = blob.family else { continue };
        for (ident, lines) in &blob.refs {
            let claimed = def_sites.get(ident);
            let mut filtered: Vec<u32> = lines
                .iter()
                .copied()
                .filter(|line| !claimed.is_some_and(|sites| sites.contains(&(blob.blob_id, *line))))
                .collect();
            if filtered.is_empty() {
                continue;
            }
            filtered.sort_unstable();
            filtered.dedup();
            grouped.entry(ident.as_str()).or_default().push((blob.blob_id, family, filtered));
        }
    }

    for (ident, entries) in grouped {
        let existing = store.get(tables::REFERENCES, ident.as_bytes())?;
        let mut list = match existing {
            Some(bytes) => RefList::decode(&bytes)?,
            None => RefList::new(),
        };
        for (blob_id, family, lines) in entries {
            let joined = lines.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
            list.append(blob_id, &joined, family);
        }
        store.put(tables::REFERENCES, ident.as_bytes(), &list.encode())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LmdbStore;
    use std::collections::HashMap as Map;

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    fn blob(id: u64, family: Option<Family>) -> ExtractedBlob {
        ExtractedBlob {
            blob_id: BlobId::new(id),
            family,
            defs: Vec::new(),
            docs: Vec::new(),
            comps: Vec::new(),
            refs: Map::new(),
            comps_docs: Vec::new(),
        }
    }

    #[test]
    fn def_site_suppresses_ref_at_same_line() {
        let (_dir, store) = open_temp();
        let mut b = blob(1, Some(Family::C));
        b.defs.push(("foo".to_string(), DefType::Function, 10));
        b.refs.insert("foo".to_string(), vec![10, 20]);

        let extracted = vec![b];
        merge(&store, &extracted).unwrap();

        let refs = RefList::decode(&store.get(tables::REFERENCES, b"foo").unwrap().unwrap()).unwrap();
        let entries = refs.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].lines, "20");
    }

    #[test]
    fn comps_docs_filtered_to_known_compatible_idents() {
        let (_dir, store) = open_temp();
        let mut dts_blob = blob(1, Some(Family::D));
        dts_blob.comps.push(("acme,widget".to_string(), 3));

        let mut doc_blob = blob(2, None);
        doc_blob.comps_docs.push(("acme,widget".to_string(), 5));
        doc_blob.comps_docs.push(("acme,unknown".to_string(), 7));

        merge(&store, &[dts_blob, doc_blob]).unwrap();

        let known_key = crate::urlquote::quote("acme,widget");
        let unknown_key = crate::urlquote::quote("acme,unknown");
        assert!(store.exists(tables::COMPATIBLE_DTS_DOCS, known_key.as_bytes()).unwrap());
        assert!(!store.exists(tables::COMPATIBLE_DTS_DOCS, unknown_key.as_bytes()).unwrap());
    }
}
