//! Stage 1 — blob enumeration (spec §4.4, single-threaded).
//!
//! Grounded on `non_gen_update.py`'s `build_partial_state`/`FileId`
//! assignment: walk the collaborator's blob list for a tag, assign a
//! fresh `BlobId` to every hash not already known, and advance
//! `variables.numBlobs` before any per-blob work starts so an interrupted
//! update leaves only harmless reserved IDs behind.

use crate::collaborator::Collaborator;
use crate::error::{IndexError, IndexResult};
use crate::store::tables;
use crate::store::Store;
use crate::types::BlobId;

const NUM_BLOBS_KEY: &[u8] = b"numBlobs";

/// A blob newly observed while enumerating `tag`: needs Stage 2 extraction.
pub struct NewBlob {
    pub blob_id: BlobId,
    pub hash: String,
    pub path: String,
}

pub struct Enumeration {
    /// Every (BlobId, path) in `tag`, both new and already-known.
    pub manifest: Vec<(BlobId, String)>,
    pub new_blobs: Vec<NewBlob>,
}

pub fn read_num_blobs(store: &impl Store) -> IndexResult<u64> {
    match store.get(tables::VARIABLES, NUM_BLOBS_KEY)? {
        Some(bytes) => {
            let text = String::from_utf8(bytes).map_err(|_| IndexError::Store(crate::error::StoreError::Corrupt {
                table: "variables",
                key: "numBlobs".to_string(),
                reason: "not utf8".to_string(),
            }))?;
            text.parse().map_err(|_| {
                IndexError::Store(crate::error::StoreError::Corrupt {
                    table: "variables",
                    key: "numBlobs".to_string(),
                    reason: format!("not a number: '{text}'"),
                })
            })
        }
        None => Ok(0),
    }
}

fn write_num_blobs(store: &impl Store, value: u64) -> IndexResult<()> {
    store.put(tables::VARIABLES, NUM_BLOBS_KEY, value.to_string().as_bytes())?;
    Ok(())
}

pub fn enumerate(
    store: &impl Store,
    collaborator: &impl Collaborator,
    tag: &str,
) -> IndexResult<Enumeration> {
    let listing = collaborator.list_blobs(tag)?;
    let mut next_id = read_num_blobs(store)?;

    let mut manifest = Vec::with_capacity(listing.len());
    let mut new_blobs = Vec::new();

    for entry in listing {
        let key = entry.hash.as_bytes();
        let blob_id = match store.get(tables::BLOBS, key)? {
            Some(bytes) => decode_blob_id(&bytes)?,
            None => {
                let assigned = BlobId::new(next_id);
                next_id += 1;
                new_blobs.push(NewBlob { blob_id: assigned, hash: entry.hash.clone(), path: entry.path.clone() });
                assigned
            }
        };
        manifest.push((blob_id, entry.path));
    }

    // Reserve the ID range before any per-blob work, per §4.4 Stage 1.
    write_num_blobs(store, next_id)?;

    Ok(Enumeration { manifest, new_blobs })
}

fn decode_blob_id(bytes: &[u8]) -> IndexResult<BlobId> {
    let text = std::str::from_utf8(bytes).map_err(|_| {
        IndexError::Store(crate::error::StoreError::Corrupt {
            table: "blobs",
            key: String::new(),
            reason: "not utf8".to_string(),
        })
    })?;
    text.parse::<u64>().map(BlobId::new).map_err(|_| {
        IndexError::Store(crate::error::StoreError::Corrupt {
            table: "blobs",
            key: String::new(),
            reason: format!("not a number: '{text}'"),
        })
    })
}
