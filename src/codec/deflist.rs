//! `DefList`: per-identifier list of definitions (spec §4.2).
//!
//! Wire format: comma-separated entries, each `<blobId><defType-letter><line>
//! <family-letter>`, followed by a single `#` and a comma-separated family
//! summary — ported from `data.py`'s `DefList` (`deflist_regex`,
//! `add_family`). The in-memory family summary is a [`FamilySet`] bitflags
//! value instead of the original's byte-string set: same wire shape, O(1)
//! membership test instead of a linear scan over a comma-split list.

use crate::error::{StoreError, StoreResult};
use crate::types::{BlobId, DefType, Family};
use bitflags::bitflags;
use regex::bytes::Regex;
use std::sync::OnceLock;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FamilySet: u8 {
        const C = 0b0_0001;
        const K = 0b0_0010;
        const D = 0b0_0100;
        const M = 0b0_1000;
        const B = 0b1_0000;
    }
}

impl FamilySet {
    pub fn of(family: Family) -> FamilySet {
        match family {
            Family::C => FamilySet::C,
            Family::K => FamilySet::K,
            Family::D => FamilySet::D,
            Family::M => FamilySet::M,
            Family::B => FamilySet::B,
        }
    }

    pub fn has(self, family: Family) -> bool {
        self.contains(FamilySet::of(family))
    }

    fn letters(self) -> Vec<char> {
        [Family::C, Family::K, Family::D, Family::M, Family::B]
            .into_iter()
            .filter(|&f| self.has(f))
            .map(|f| f.code())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefEntry {
    pub blob_id: BlobId,
    pub def_type: DefType,
    pub line: u32,
    pub family: Family,
}

#[derive(Debug, Clone, Default)]
pub struct DefList {
    body: String,
    families: FamilySet,
}

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)([A-Za-z])(\d+)([A-Za-z]),?").unwrap())
}

impl DefList {
    pub fn new() -> DefList {
        DefList::default()
    }

    /// Decode a stored record. Empty bytes decode to an empty list.
    pub fn decode(bytes: &[u8]) -> StoreResult<DefList> {
        if bytes.is_empty() {
            return Ok(DefList::new());
        }
        let text = std::str::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
            table: "definitions",
            key: String::new(),
            reason: format!("non-utf8 DefList bytes: {e}"),
        })?;
        let Some((body, family_csv)) = text.split_once('#') else {
            return Err(StoreError::Corrupt {
                table: "definitions",
                key: String::new(),
                reason: "missing '#' family-summary separator".to_string(),
            });
        };

        let mut families = FamilySet::empty();
        for letter in family_csv.split(',') {
            if letter.is_empty() {
                continue;
            }
            let ch = letter.chars().next().unwrap();
            let family = Family::from_code(ch).ok_or_else(|| StoreError::Corrupt {
                table: "definitions",
                key: String::new(),
                reason: format!("unknown family letter '{ch}' in summary"),
            })?;
            families |= FamilySet::of(family);
        }

        Ok(DefList { body: body.to_string(), families })
    }

    pub fn append(&mut self, blob_id: BlobId, def_type: DefType, line: u32, family: Family) {
        let entry = format!("{}{}{}{}", blob_id.get(), def_type.code(), line, family.code());
        if !self.body.is_empty() {
            self.body.push(',');
        }
        self.body.push_str(&entry);
        self.families |= FamilySet::of(family);
    }

    pub fn encode(&self) -> Vec<u8> {
        let summary: Vec<String> = self.families.letters().iter().map(|c| c.to_string()).collect();
        format!("{}#{}", self.body, summary.join(",")).into_bytes()
    }

    /// Decoded entries, sorted ascending by `BlobId` (spec §4.2: "iteration
    /// sorts by BlobId ascending" even though entries are appended in
    /// insertion order).
    pub fn entries(&self) -> StoreResult<Vec<DefEntry>> {
        let mut out = Vec::new();
        for caps in entry_regex().captures_iter(self.body.as_bytes()) {
            let blob_id: u64 = std::str::from_utf8(&caps[1]).unwrap().parse().map_err(|_| corrupt("bad blob id"))?;
            let def_type_ch = caps[2][0] as char;
            let line: u32 = std::str::from_utf8(&caps[3]).unwrap().parse().map_err(|_| corrupt("bad line"))?;
            let family_ch = caps[4][0] as char;

            let def_type = DefType::from_code(def_type_ch).ok_or_else(|| corrupt("bad def type letter"))?;
            let family = Family::from_code(family_ch).ok_or_else(|| corrupt("bad family letter"))?;

            out.push(DefEntry { blob_id: BlobId::new(blob_id), def_type, line, family });
        }
        out.sort_by_key(|e| e.blob_id);
        Ok(out)
    }

    /// O(1): the set of families any appended entry belongs to.
    pub fn families(&self) -> FamilySet {
        self.families
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

fn corrupt(reason: &str) -> StoreError {
    StoreError::Corrupt { table: "definitions", key: String::new(), reason: reason.to_string() }
}
