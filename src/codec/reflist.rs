//! `RefList`: per-identifier list of references or doc-comments (spec §4.2).
//!
//! Wire format: newline-terminated entries `blobId:line-list:family\n`,
//! where `line-list` is a comma-separated ascending list of 1-based line
//! numbers — ported from `data.py`'s `RefList`.

use crate::error::{StoreError, StoreResult};
use crate::types::{BlobId, Family};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefEntry {
    pub blob_id: BlobId,
    /// Comma-joined ascending line numbers, kept as text: the query layer
    /// re-emits this exact string as a `SymbolInstance.line` value (spec §4.5).
    pub lines: String,
    pub family: Family,
}

#[derive(Debug, Clone, Default)]
pub struct RefList {
    body: String,
}

impl RefList {
    pub fn new() -> RefList {
        RefList::default()
    }

    pub fn decode(bytes: &[u8]) -> StoreResult<RefList> {
        if bytes.is_empty() {
            return Ok(RefList::new());
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|e| corrupt(format!("non-utf8 RefList bytes: {e}")))?;
        Ok(RefList { body: text.to_string() })
    }

    pub fn append(&mut self, blob_id: BlobId, lines: &str, family: Family) {
        self.body.push_str(&format!("{}:{}:{}\n", blob_id.get(), lines, family.code()));
    }

    pub fn encode(&self) -> Vec<u8> {
        self.body.as_bytes().to_vec()
    }

    /// Decoded entries, sorted ascending by `BlobId`.
    pub fn entries(&self) -> StoreResult<Vec<RefEntry>> {
        let mut out = Vec::new();
        for line in self.body.split('\n') {
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ':');
            let (Some(id_str), Some(lines), Some(family_str)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(corrupt(format!("malformed RefList entry '{line}'")));
            };
            let blob_id: u64 = id_str.parse().map_err(|_| corrupt(format!("bad blob id in '{line}'")))?;
            let family_ch = family_str.chars().next().ok_or_else(|| corrupt("empty family letter"))?;
            let family = Family::from_code(family_ch).ok_or_else(|| corrupt(format!("unknown family letter '{family_ch}'")))?;
            out.push(RefEntry { blob_id: BlobId::new(blob_id), lines: lines.to_string(), family });
        }
        out.sort_by_key(|e| e.blob_id);
        Ok(out)
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

fn corrupt(reason: impl Into<String>) -> StoreError {
    StoreError::Corrupt { table: "references", key: String::new(), reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_decodes_to_empty() {
        let list = RefList::decode(b"").unwrap();
        assert!(list.entries().unwrap().is_empty());
    }

    #[test]
    fn round_trips_and_sorts_by_blob_id() {
        let mut list = RefList::new();
        list.append(BlobId::new(5), "3,7", Family::C);
        list.append(BlobId::new(2), "1", Family::C);
        let encoded = list.encode();

        let decoded = RefList::decode(&encoded).unwrap();
        let entries = decoded.entries().unwrap();
        assert_eq!(entries[0].blob_id, BlobId::new(2));
        assert_eq!(entries[1].blob_id, BlobId::new(5));
        assert_eq!(entries[1].lines, "3,7");
    }

    #[test]
    fn malformed_entry_is_reported() {
        let list = RefList { body: "not-an-entry\n".to_string() };
        assert!(list.entries().is_err());
    }
}
