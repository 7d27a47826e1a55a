//! Named queries the (absent) web layer would call (spec §4.5).
//!
//! Every function here is deterministic and side-effect free: store reads
//! plus a collaborator call, no mutation. Grounded on `data.py`'s
//! `get_ident`/`get_versions`/`get_type`/`get_dir`/`get_file` query
//! functions, restructured as free functions over `&impl Store` instead of
//! methods on a `DB` object so the query layer has no hidden dependency on
//! how the store was opened.

use crate::codec::{DefList, PathList, RefList};
use crate::collaborator::{Collaborator, DirEntry, PathType};
use crate::error::IndexResult;
use crate::lexer;
use crate::store::{tables, Store};
use crate::types::{Family, FamilySelector, SymbolInstance};
use crate::urlquote;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Nested `major -> minor -> [tag]` structure (spec §4.5 `versions`).
pub type VersionTree = IndexMap<String, IndexMap<String, Vec<String>>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct IdentResult {
    pub definitions: Vec<SymbolInstance>,
    pub references: Vec<SymbolInstance>,
    pub doccomments: Vec<SymbolInstance>,
}

/// `latest` (spec §4.5): the last tag the collaborator lists.
pub fn latest(collaborator: &impl Collaborator) -> IndexResult<Option<String>> {
    Ok(collaborator.list_tags()?.into_iter().last())
}

/// `versions` (spec §4.5): tags grouped by their dotted version prefix.
pub fn versions(collaborator: &impl Collaborator) -> IndexResult<VersionTree> {
    let mut tree: VersionTree = IndexMap::new();
    for tag in collaborator.list_tags()? {
        let (major, minor) = split_version(&tag);
        tree.entry(major).or_default().entry(minor).or_default().push(tag);
    }
    Ok(tree)
}

fn split_version(tag: &str) -> (String, String) {
    let digits_and_dots: String = tag
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let mut parts = digits_and_dots.splitn(3, '.');
    let major = parts.next().filter(|s| !s.is_empty()).unwrap_or("unknown").to_string();
    let minor = parts.next().filter(|s| !s.is_empty()).unwrap_or("0").to_string();
    (major, minor)
}

/// `type(tag, path)` (spec §4.5).
pub fn path_type(collaborator: &impl Collaborator, tag: &str, path: &str) -> IndexResult<Option<PathType>> {
    Ok(collaborator.path_type(tag, path)?)
}

/// `dir(tag, path)` (spec §4.5).
pub fn dir(collaborator: &impl Collaborator, tag: &str, path: &str) -> IndexResult<Vec<DirEntry>> {
    Ok(collaborator.dir(tag, path)?)
}

/// `file(tag, path)` (spec §4.5).
pub fn file(collaborator: &impl Collaborator, tag: &str, path: &str) -> IndexResult<String> {
    Ok(collaborator.file(tag, path)?)
}

/// `family(filename)` (spec §4.5): the storage family, if any, a path
/// would be dispatched to — `None` for paths the lexer/store never tags
/// (e.g. `.S` assembler sources, which are lexed but not storage-tagged).
pub fn family(filename: &str) -> Option<Family> {
    lexer::storage_family(filename)
}

/// `dts-comp` (spec §4.5): does this project maintain the DT-compatible tables?
pub fn dts_comp(collaborator: &impl Collaborator) -> IndexResult<bool> {
    Ok(collaborator.dts_comp()?)
}

/// `keys(table_name)` (spec §4.5): ordered keys in a table, for autocomplete.
pub fn keys(store: &impl Store, table: &str) -> IndexResult<Vec<Vec<u8>>> {
    Ok(store.iterate_from(table, b"")?.into_iter().map(|(k, _)| k).collect())
}

/// `ident(tag, ident, family)` (spec §4.5): the central read path.
pub fn ident(store: &impl Store, tag: &str, ident: &str, selector: FamilySelector) -> IndexResult<IdentResult> {
    let Some(manifest_bytes) = store.get(tables::VERSIONS, tag.as_bytes())? else {
        return Ok(IdentResult::default());
    };
    let manifest = PathList::decode(&manifest_bytes)?.as_map()?;

    if matches!(selector, FamilySelector::One(Family::B)) {
        return ident_dts_compatible(store, ident, &manifest);
    }

    let definitions = match store.get(tables::DEFINITIONS, ident.as_bytes())? {
        Some(bytes) => DefList::decode(&bytes)?
            .entries()?
            .into_iter()
            .filter(|e| e.family.matches_selector(selector))
            .filter_map(|e| {
                manifest.get(&e.blob_id).map(|path| SymbolInstance::new(e.def_type.name(), path.clone(), e.line.to_string()))
            })
            .collect(),
        None => Vec::new(),
    };

    let references = reflist_hits_by_key(store, tables::REFERENCES, ident, selector, &manifest, "reference")?;
    let doccomments = reflist_hits_by_key(store, tables::DOCCOMMENTS, ident, selector, &manifest, "doccomment")?;

    Ok(IdentResult { definitions, references, doccomments })
}

fn ident_dts_compatible(store: &impl Store, ident: &str, manifest: &HashMap<crate::types::BlobId, String>) -> IndexResult<IdentResult> {
    let key = urlquote::quote(ident);
    let references = reflist_hits_by_key(store, tables::COMPATIBLE_DTS, &key, FamilySelector::All, manifest, "reference")?;
    let doccomments = reflist_hits_by_key(store, tables::COMPATIBLE_DTS_DOCS, &key, FamilySelector::All, manifest, "doccomment")?;
    Ok(IdentResult { definitions: Vec::new(), references, doccomments })
}

fn reflist_hits_by_key(
    store: &impl Store,
    table: &str,
    key: &str,
    selector: FamilySelector,
    manifest: &HashMap<crate::types::BlobId, String>,
    kind: &str,
) -> IndexResult<Vec<SymbolInstance>> {
    let Some(bytes) = store.get(table, key.as_bytes())? else {
        return Ok(Vec::new());
    };
    Ok(RefList::decode(&bytes)?
        .entries()?
        .into_iter()
        .filter(|e| e.family.matches_selector(selector))
        .filter_map(|e| manifest.get(&e.blob_id).map(|path| SymbolInstance::new(kind, path.clone(), e.lines.clone())))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DefList, RefList};
    use crate::collaborator::FakeCollaborator;
    use crate::store::LmdbStore;
    use crate::types::{BlobId, DefType};

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn latest_is_the_last_listed_tag() {
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[]);
        collaborator.add_tag("v2", &[]);
        assert_eq!(latest(&collaborator).unwrap(), Some("v2".to_string()));
    }

    #[test]
    fn versions_groups_by_major_minor() {
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v5.10", &[]);
        collaborator.add_tag("v5.15", &[]);
        collaborator.add_tag("v6.1", &[]);
        let tree = versions(&collaborator).unwrap();
        assert_eq!(tree["5"]["10"], vec!["v5.10".to_string()]);
        assert_eq!(tree["5"]["15"], vec!["v5.15".to_string()]);
        assert_eq!(tree["6"]["1"], vec!["v6.1".to_string()]);
    }

    #[test]
    fn ident_joins_definitions_through_the_tag_manifest() {
        let (_dir, store) = open_temp();
        let mut path_list = PathList::new();
        path_list.append(BlobId::new(0), "a.c");
        store.put(tables::VERSIONS, b"v1", &path_list.encode()).unwrap();

        let mut defs = DefList::new();
        defs.append(BlobId::new(0), DefType::Function, 12, Family::C);
        store.put(tables::DEFINITIONS, b"foo", &defs.encode()).unwrap();

        let result = ident(&store, "v1", "foo", FamilySelector::All).unwrap();
        assert_eq!(result.definitions, vec![SymbolInstance::new("function", "a.c", "12")]);
    }

    #[test]
    fn ident_skips_entries_outside_the_tag_manifest() {
        let (_dir, store) = open_temp();
        let mut path_list = PathList::new();
        path_list.append(BlobId::new(0), "a.c");
        store.put(tables::VERSIONS, b"v1", &path_list.encode()).unwrap();

        let mut defs = DefList::new();
        defs.append(BlobId::new(0), DefType::Function, 12, Family::C);
        defs.append(BlobId::new(99), DefType::Function, 3, Family::C);
        store.put(tables::DEFINITIONS, b"foo", &defs.encode()).unwrap();

        let result = ident(&store, "v1", "foo", FamilySelector::All).unwrap();
        assert_eq!(result.definitions.len(), 1);
    }

    #[test]
    fn ident_for_family_b_resolves_against_compatible_dts_tables() {
        let (_dir, store) = open_temp();
        let mut path_list = PathList::new();
        path_list.append(BlobId::new(0), "board.dts");
        store.put(tables::VERSIONS, b"v1", &path_list.encode()).unwrap();

        let key = urlquote::quote("acme,widget");
        let mut refs = RefList::new();
        refs.append(BlobId::new(0), "7", Family::D);
        store.put(tables::COMPATIBLE_DTS, key.as_bytes(), &refs.encode()).unwrap();

        let result = ident(&store, "v1", "acme,widget", FamilySelector::One(Family::B)).unwrap();
        assert!(result.definitions.is_empty());
        assert_eq!(result.references, vec![SymbolInstance::new("reference", "board.dts", "7")]);
    }

    #[test]
    fn keys_lists_everything_in_a_table() {
        let (_dir, store) = open_temp();
        store.put(tables::FILENAMES, b"0", b"a.c").unwrap();
        store.put(tables::FILENAMES, b"1", b"b.c").unwrap();
        let all = keys(&store, tables::FILENAMES).unwrap();
        assert_eq!(all, vec![b"0".to_vec(), b"1".to_vec()]);
    }

    #[test]
    fn family_defers_to_the_path_dispatcher() {
        assert_eq!(family("drivers/net/e1000.c"), Some(Family::C));
        assert_eq!(family("arch/arm/boot/dts/foo.dtsi"), Some(Family::D));
        assert_eq!(family("arch/arm/kernel/head.S"), None);
    }
}
