//! Structured error taxonomy for the cross-referencer.
//!
//! Mirrors the teacher crate's split between a storage-specific error and a
//! crate-wide error that wraps it: every fallible public function returns
//! [`IndexResult<T>`] instead of a bare `String` or `Box<dyn Error>`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the index store (the ordered key-value engine in `store`).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open index environment at '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: heed::Error,
    },

    #[error("failed to open table '{table}': {source}")]
    OpenTable {
        table: &'static str,
        #[source]
        source: heed::Error,
    },

    #[error("read transaction failed: {0}")]
    Read(#[source] heed::Error),

    #[error("write transaction failed: {0}")]
    Write(#[source] heed::Error),

    #[error("corrupt record for key '{key}' in table '{table}': {reason}")]
    Corrupt {
        table: &'static str,
        key: String,
        reason: String,
    },

    #[error("io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised invoking the external repository collaborator (§6).
#[derive(Error, Debug)]
pub enum CollaboratorError {
    #[error("failed to spawn collaborator command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("collaborator command '{command}' exited with status {status}")]
    NonZeroExit { command: String, status: i32 },

    #[error("collaborator command '{command}' timed out after {timeout_secs}s")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("collaborator output was not valid UTF-8/line-structured: {reason}")]
    MalformedOutput { reason: String },
}

pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Crate-wide error type returned by the updater, query engine and CLI.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),

    #[error("data directory '{path}' does not exist or is not writable")]
    DataDir { path: PathBuf },

    #[error("tag '{tag}' is already indexed")]
    TagAlreadyIndexed { tag: String },
}

pub type IndexResult<T> = Result<T, IndexError>;
