//! The 4-stage update algorithm (spec §4.4): enumerate, extract, merge, commit.
//!
//! Grounded on `non_gen_update.py`'s `update_version`, restructured around
//! `rayon` for Stage 2 instead of a `multiprocessing.Pool`: blobs are
//! independent of each other during extraction (no shared mutable state
//! is touched), which is exactly the precondition `par_iter` needs —
//! `bartolli-codanna/src/indexing/pipeline/mod.rs` takes the same
//! "parallel stage, then a single-threaded merge" shape with explicit
//! channels; this crate's Stage 2 has no cross-item coordination to
//! stream, so a plain `par_iter().collect()` replaces the channel
//! plumbing without changing the concurrency story.

pub mod commit;
pub mod compatible_dts;
pub mod enumerate;
pub mod extract;
pub mod merge;

use crate::collaborator::Collaborator;
use crate::config::IndexingConfig;
use crate::error::IndexResult;
use crate::store::Store;
use extract::ExtractedBlob;
use rayon::prelude::*;
use tracing::info;

/// Run the 4-stage update for `tag`. A no-op if `tag` is already indexed.
pub fn update(
    store: &(impl Store + Sync),
    collaborator: &(impl Collaborator + Sync),
    tag: &str,
    config: &IndexingConfig,
) -> IndexResult<()> {
    if commit::tag_already_indexed(store, tag)? {
        info!(tag, "already indexed, skipping");
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers.max(1))
        .build()
        .expect("building a scoped rayon pool");

    let enumeration = enumerate::enumerate(store, collaborator, tag)?;
    info!(tag, new_blobs = enumeration.new_blobs.len(), "enumerated");

    let extracted: Vec<ExtractedBlob> = pool.install(|| {
        enumeration
            .new_blobs
            .par_iter()
            .filter_map(|blob| extract::extract_blob(collaborator, blob))
            .collect()
    });
    info!(tag, extracted = extracted.len(), dropped = enumeration.new_blobs.len() - extracted.len(), "extracted");

    merge::merge(store, &extracted)?;
    info!(tag, "merged");

    commit::commit(store, tag, &enumeration)?;
    info!(tag, "committed");

    Ok(())
}

/// Run `update` for every tag the collaborator reports that isn't already
/// indexed. Ambient CLI convenience (spec §6's `elixir-xref update`).
pub fn update_all(
    store: &(impl Store + Sync),
    collaborator: &(impl Collaborator + Sync),
    config: &IndexingConfig,
) -> IndexResult<Vec<String>> {
    let mut updated = Vec::new();
    for tag in collaborator.list_tags()? {
        if commit::tag_already_indexed(store, &tag)? {
            continue;
        }
        update(store, collaborator, &tag, config)?;
        updated.push(tag);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborator::{DefHit, FakeCollaborator};
    use crate::store::{tables, LmdbStore};
    use crate::types::DefType;

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn full_update_cycle_indexes_a_tag() {
        let (_dir, store) = open_temp();
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[("h1", "a.c")]);
        collaborator.set_blob_content("h1", b"int foo(void) { return 0; }\n".to_vec());
        collaborator.set_defs("h1", vec![DefHit { ident: "foo".into(), def_type: DefType::Function, line: 1 }]);

        let config = IndexingConfig { workers: 2, blob_timeout_secs: 5, dts_comp_override: None };
        update(&store, &collaborator, "v1", &config).unwrap();

        assert!(commit::tag_already_indexed(&store, "v1").unwrap());
        assert!(store.exists(tables::DEFINITIONS, b"foo").unwrap());
    }

    #[test]
    fn rerunning_update_on_an_indexed_tag_is_a_noop() {
        let (_dir, store) = open_temp();
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[("h1", "a.c")]);
        collaborator.set_blob_content("h1", b"int foo(void) {}\n".to_vec());

        let config = IndexingConfig { workers: 2, blob_timeout_secs: 5, dts_comp_override: None };
        update(&store, &collaborator, "v1", &config).unwrap();
        let num_blobs_after_first = enumerate::read_num_blobs(&store).unwrap();

        update(&store, &collaborator, "v1", &config).unwrap();
        assert_eq!(enumerate::read_num_blobs(&store).unwrap(), num_blobs_after_first);
    }

    #[test]
    fn update_all_skips_already_indexed_tags() {
        let (_dir, store) = open_temp();
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[("h1", "a.c")]);
        collaborator.set_blob_content("h1", b"int foo(void) {}\n".to_vec());

        let config = IndexingConfig { workers: 2, blob_timeout_secs: 5, dts_comp_override: None };
        let updated_first = update_all(&store, &collaborator, &config).unwrap();
        assert_eq!(updated_first, vec!["v1".to_string()]);

        let updated_second = update_all(&store, &collaborator, &config).unwrap();
        assert!(updated_second.is_empty());
    }
}
