//! `heed`-backed `Store` (spec §4.3).
//!
//! Grounded on `Heyoub-caliber/caliber-storage/src/cache/lmdb_backend.rs`:
//! one `heed::Env`, opened once with `max_dbs` sized to the table count,
//! and one `Database<Bytes, Bytes>` per table name, opened eagerly so that
//! every later `get`/`put`/`iterate_from` call is a cheap map lookup
//! instead of a fallible `create_database` call per request.

use crate::error::{StoreError, StoreResult};
use crate::store::{tables, Store};
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default LMDB map size: generous enough for a full index without the
/// caller needing to size it per tag (spec §4.3 names no fixed limit).
const DEFAULT_MAP_SIZE: usize = 16 * 1024 * 1024 * 1024;

pub struct LmdbStore {
    env: Env,
    dbs: HashMap<&'static str, Database<Bytes, Bytes>>,
    path: PathBuf,
}

impl LmdbStore {
    pub fn open(path: impl AsRef<Path>) -> StoreResult<LmdbStore> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: impl AsRef<Path>, map_size: usize) -> StoreResult<LmdbStore> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path).map_err(|source| StoreError::Io { path: path.clone(), source })?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(tables::ALL.len() as u32)
                .open(&path)
        }
        .map_err(|source| StoreError::Open { path: path.clone(), source })?;

        let mut wtxn = env.write_txn().map_err(StoreError::Write)?;
        let mut dbs = HashMap::with_capacity(tables::ALL.len());
        for &table in tables::ALL {
            let db: Database<Bytes, Bytes> = env
                .create_database(&mut wtxn, Some(table))
                .map_err(|source| StoreError::OpenTable { table, source })?;
            dbs.insert(table, db);
        }
        wtxn.commit().map_err(StoreError::Write)?;

        Ok(LmdbStore { env, dbs, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn db(&self, table: &str) -> StoreResult<&Database<Bytes, Bytes>> {
        self.dbs.get(table).ok_or_else(|| StoreError::Corrupt {
            table: "<unknown>",
            key: table.to_string(),
            reason: "no such table".to_string(),
        })
    }
}

impl Store for LmdbStore {
    fn exists(&self, table: &str, key: &[u8]) -> StoreResult<bool> {
        Ok(self.get(table, key)?.is_some())
    }

    fn get(&self, table: &str, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let db = self.db(table)?;
        let rtxn = self.env.read_txn().map_err(StoreError::Read)?;
        let value = db.get(&rtxn, key).map_err(StoreError::Read)?;
        Ok(value.map(|v| v.to_vec()))
    }

    fn put(&self, table: &str, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let db = self.db(table)?;
        let mut wtxn = self.env.write_txn().map_err(StoreError::Write)?;
        db.put(&mut wtxn, key, value).map_err(StoreError::Write)?;
        wtxn.commit().map_err(StoreError::Write)?;
        Ok(())
    }

    fn iterate_from(&self, table: &str, prefix: &[u8]) -> StoreResult<Vec<(Vec<u8>, Vec<u8>)>> {
        let db = self.db(table)?;
        let rtxn = self.env.read_txn().map_err(StoreError::Read)?;
        let mut out = Vec::new();
        for result in db.iter(&rtxn).map_err(StoreError::Read)? {
            let (key, value) = result.map_err(StoreError::Read)?;
            if key.starts_with(prefix) {
                out.push((key.to_vec(), value.to_vec()));
            }
        }
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out)
    }

    fn sync(&self) -> StoreResult<()> {
        self.env.force_sync().map_err(StoreError::Write)
    }

    fn close(self) -> StoreResult<()> {
        self.sync()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, LmdbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        (dir, store)
    }

    #[test]
    fn put_then_get_round_trips() {
        let (_dir, store) = open_temp();
        store.put(tables::BLOBS, b"k", b"v").unwrap();
        assert_eq!(store.get(tables::BLOBS, b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn missing_key_is_none_not_error() {
        let (_dir, store) = open_temp();
        assert_eq!(store.get(tables::BLOBS, b"absent").unwrap(), None);
    }

    #[test]
    fn exists_reflects_put() {
        let (_dir, store) = open_temp();
        assert!(!store.exists(tables::VERSIONS, b"v1").unwrap());
        store.put(tables::VERSIONS, b"v1", b"data").unwrap();
        assert!(store.exists(tables::VERSIONS, b"v1").unwrap());
    }

    #[test]
    fn iterate_from_filters_by_prefix_and_sorts() {
        let (_dir, store) = open_temp();
        store.put(tables::FILENAMES, b"b", b"2").unwrap();
        store.put(tables::FILENAMES, b"a", b"1").unwrap();
        store.put(tables::FILENAMES, b"ax", b"3").unwrap();
        store.put(tables::FILENAMES, b"zz", b"4").unwrap();

        let got = store.iterate_from(tables::FILENAMES, b"a").unwrap();
        assert_eq!(got, vec![(b"a".to_vec(), b"1".to_vec()), (b"ax".to_vec(), b"3".to_vec())]);
    }

    #[test]
    fn tables_are_independent() {
        let (_dir, store) = open_temp();
        store.put(tables::DEFINITIONS, b"id", b"def").unwrap();
        assert_eq!(store.get(tables::REFERENCES, b"id").unwrap(), None);
    }

    #[test]
    fn reopening_an_existing_environment_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
            store.put(tables::HASHES, b"h", b"blob").unwrap();
        }
        let store = LmdbStore::open_with_map_size(dir.path(), 16 * 1024 * 1024).unwrap();
        assert_eq!(store.get(tables::HASHES, b"h").unwrap(), Some(b"blob".to_vec()));
    }
}
