//! The ordered key-value store an index is persisted to (spec §4.3).
//!
//! `Store` is the seam between the updater/query layers and whatever
//! backs them on disk. Grounded on `data.py`'s `DB` wrapper around LMDB:
//! one environment, one sub-database per table, read transactions for
//! queries and a single write transaction per commit.

pub mod lmdb;
pub mod tables;

pub use lmdb::LmdbStore;

use crate::error::StoreResult;

/// A single ordered key-value store, addressed by table name.
///
/// Keys and values are both opaque byte strings — table-specific codecs
/// (`crate::codec`, `crate::types`) own the meaning of the bytes. `Store`
/// itself only guarantees byte-for-byte storage and key-ordered iteration.
pub trait Store {
    /// `true` if `key` has a value in `table`.
    fn exists(&self, table: &str, key: &[u8]) -> StoreResult<bool>;

    /// The value stored under `key` in `table`, or `None` if absent.
    fn get(&self, table: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key` in `table`, replacing any prior value.
    fn put(&self, table: &str, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// All `(key, value)` pairs in `table` whose key starts with `prefix`,
    /// in key-ascending order. An empty `prefix` iterates the whole table.
    fn iterate_from(&self, table: &str, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>>;

    /// Flush any buffered writes to durable storage.
    fn sync(&self) -> StoreResult<()>;

    /// Release the underlying environment. A `Store` is unusable afterward.
    fn close(self) -> StoreResult<()>
    where
        Self: Sized;
}
