//! The ten named tables an index is built from (spec §4.3).
//!
//! Grounded on `original_source/elixir/data.py`'s `DB` class, which opens
//! one LMDB sub-database per name. Kept as plain `&'static str` constants
//! (not an enum) because `heed::Env::create_database` takes a `&str` name
//! directly and every caller already knows which table it wants at the
//! call site.

pub const VARIABLES: &str = "variables";
pub const BLOBS: &str = "blobs";
pub const HASHES: &str = "hashes";
pub const FILENAMES: &str = "filenames";
pub const VERSIONS: &str = "versions";
pub const DEFINITIONS: &str = "definitions";
pub const REFERENCES: &str = "references";
pub const DOCCOMMENTS: &str = "doccomments";
pub const COMPATIBLE_DTS: &str = "compatibledts";
pub const COMPATIBLE_DTS_DOCS: &str = "compatibledts_docs";

pub const ALL: &[&str] = &[
    VARIABLES,
    BLOBS,
    HASHES,
    FILENAMES,
    VERSIONS,
    DEFINITIONS,
    REFERENCES,
    DOCCOMMENTS,
    COMPATIBLE_DTS,
    COMPATIBLE_DTS_DOCS,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_every_named_table() {
        assert_eq!(ALL.len(), 10);
        assert!(ALL.contains(&DEFINITIONS));
        assert!(ALL.contains(&COMPATIBLE_DTS_DOCS));
    }
}
