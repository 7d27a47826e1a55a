//! Stage 4 — commit (spec §4.4, single-threaded).
//!
//! Writes the new blobs' identity rows, builds the tag's manifest, and
//! writes `versions[tag]`. Presence of that key is the sole signal a tag
//! is fully indexed — ported from `non_gen_update.py`'s final
//! `db.versions.put(tag, ...)` call at the end of `update_version`.

use crate::codec::PathList;
use crate::error::IndexResult;
use crate::store::{tables, Store};
use crate::types::BlobId;
use crate::updater::enumerate::{Enumeration, NewBlob};

pub fn commit(store: &impl Store, tag: &str, enumeration: &Enumeration) -> IndexResult<()> {
    for new_blob in &enumeration.new_blobs {
        write_identity(store, new_blob)?;
    }

    let mut manifest = enumeration.manifest.clone();
    manifest.sort_by_key(|(blob_id, _)| *blob_id);

    let mut path_list = PathList::new();
    for (blob_id, path) in &manifest {
        path_list.append(*blob_id, path);
    }
    store.put(tables::VERSIONS, tag.as_bytes(), &path_list.encode())?;

    store.sync()?;
    Ok(())
}

fn write_identity(store: &impl Store, new_blob: &NewBlob) -> IndexResult<()> {
    let id_text = new_blob.blob_id.get().to_string();
    store.put(tables::HASHES, id_text.as_bytes(), new_blob.hash.as_bytes())?;
    store.put(tables::FILENAMES, id_text.as_bytes(), new_blob.path.as_bytes())?;
    store.put(tables::BLOBS, new_blob.hash.as_bytes(), id_text.as_bytes())?;
    Ok(())
}

/// Is `tag` already fully indexed? A re-run of `update(db, tag)` is a no-op
/// when this is `true` (spec §4.4 Stage 4).
pub fn tag_already_indexed(store: &impl Store, tag: &str) -> IndexResult<bool> {
    Ok(store.exists(tables::VERSIONS, tag.as_bytes())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::LmdbStore;

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn commit_writes_identity_rows_and_manifest() {
        let (_dir, store) = open_temp();
        let enumeration = Enumeration {
            manifest: vec![(BlobId::new(1), "b.c".to_string()), (BlobId::new(0), "a.c".to_string())],
            new_blobs: vec![
                NewBlob { blob_id: BlobId::new(0), hash: "h0".into(), path: "a.c".into() },
                NewBlob { blob_id: BlobId::new(1), hash: "h1".into(), path: "b.c".into() },
            ],
        };

        commit(&store, "v1", &enumeration).unwrap();

        assert_eq!(store.get(tables::HASHES, b"0").unwrap().unwrap(), b"h0");
        assert_eq!(store.get(tables::BLOBS, b"h1").unwrap().unwrap(), b"1");
        assert!(tag_already_indexed(&store, "v1").unwrap());

        let manifest_bytes = store.get(tables::VERSIONS, b"v1").unwrap().unwrap();
        let manifest = PathList::decode(&manifest_bytes).unwrap().entries().unwrap();
        assert_eq!(manifest[0].path, "a.c");
        assert_eq!(manifest[1].path, "b.c");
    }

    #[test]
    fn unindexed_tag_reports_false() {
        let (_dir, store) = open_temp();
        assert!(!tag_already_indexed(&store, "v1").unwrap());
    }
}
