//! A store that cannot be opened surfaces a structured error, not a panic.

use elixir_xref::error::StoreError;
use elixir_xref::store::LmdbStore;

#[test]
fn opening_an_index_under_a_plain_file_is_a_structured_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let blocking_file = dir.path().join("not-a-directory");
    std::fs::write(&blocking_file, b"occupied").unwrap();

    let index_path = blocking_file.join("index");
    let result = LmdbStore::open(&index_path);

    assert!(matches!(result, Err(StoreError::Io { .. })));
}
