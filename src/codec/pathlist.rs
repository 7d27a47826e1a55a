//! `PathList`: a tag's manifest (spec §4.2).
//!
//! Wire format: newline-terminated entries `blobId path\n`, inserted in
//! BlobId-ascending order at commit time — ported from `data.py`'s
//! `PathList`.

use crate::error::{StoreError, StoreResult};
use crate::types::BlobId;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub blob_id: BlobId,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct PathList {
    body: String,
}

impl PathList {
    pub fn new() -> PathList {
        PathList::default()
    }

    pub fn decode(bytes: &[u8]) -> StoreResult<PathList> {
        if bytes.is_empty() {
            return Ok(PathList::new());
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| corrupt(format!("non-utf8 PathList bytes: {e}")))?;
        Ok(PathList { body: text.to_string() })
    }

    /// Caller is responsible for appending in BlobId-ascending order
    /// (spec §4.2: "Inserted in BlobId-ascending order at commit time").
    pub fn append(&mut self, blob_id: BlobId, path: &str) {
        self.body.push_str(&format!("{} {}\n", blob_id.get(), path));
    }

    pub fn encode(&self) -> Vec<u8> {
        self.body.as_bytes().to_vec()
    }

    pub fn entries(&self) -> StoreResult<Vec<PathEntry>> {
        let mut out = Vec::new();
        for line in self.body.split('\n') {
            if line.is_empty() {
                continue;
            }
            let Some((id_str, path)) = line.split_once(' ') else {
                return Err(corrupt(format!("malformed PathList entry '{line}'")));
            };
            let blob_id: u64 = id_str.parse().map_err(|_| corrupt(format!("bad blob id in '{line}'")))?;
            out.push(PathEntry { blob_id: BlobId::new(blob_id), path: path.to_string() });
        }
        Ok(out)
    }

    /// BlobId -> path, for the `ident` query's manifest join (spec §4.5).
    pub fn as_map(&self) -> StoreResult<HashMap<BlobId, String>> {
        Ok(self.entries()?.into_iter().map(|e| (e.blob_id, e.path)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

fn corrupt(reason: impl Into<String>) -> StoreError {
    StoreError::Corrupt { table: "versions", key: String::new(), reason: reason.into() }
}
