//! The external repository collaborator boundary (spec §6).
//!
//! Everything the updater and the `dir`/`type`/`file` queries know about a
//! project's actual repository (git, mercurial, a plain directory of
//! tarballs, whatever) is behind this trait. The index store never talks
//! to a VCS directly — it talks to whatever implements `Collaborator`.

pub mod fake;
pub mod process;

pub use fake::FakeCollaborator;
pub use process::ProcessCollaborator;

use crate::error::CollaboratorResult;
use crate::types::{DefType, Family};
use serde::Serialize;

/// One entry of a `dir` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub kind: PathType,
    pub name: String,
    pub size: u64,
    /// POSIX file mode, as reported by the collaborator (e.g. `0o100644`).
    pub mode: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathType {
    Tree,
    Blob,
}

/// A single `parse-defs` hit: an identifier, its `DefType`, and its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefHit {
    pub ident: String,
    pub def_type: DefType,
    pub line: u32,
}

/// A single `parse-docs` hit: an identifier and a line it's documented at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocHit {
    pub ident: String,
    pub line: u32,
}

/// One (hash, path) pair as reported by `list-blobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobListing {
    pub hash: String,
    pub path: String,
}

/// The external interface the updater and read-path queries are built on
/// (spec §6's command table). Implementations are free to shell out to a
/// subprocess (`ProcessCollaborator`) or serve everything from memory
/// (`FakeCollaborator`, used in tests).
pub trait Collaborator: Send + Sync {
    fn list_tags(&self) -> CollaboratorResult<Vec<String>>;

    fn list_blobs(&self, tag: &str) -> CollaboratorResult<Vec<BlobListing>>;

    fn get_blob(&self, hash: &str) -> CollaboratorResult<Vec<u8>>;

    /// Skipped by the caller when `family` is `None` (unknown) or `Family::M`.
    fn parse_defs(&self, hash: &str, path: &str, family: Family) -> CollaboratorResult<Vec<DefHit>>;

    /// Skipped by the caller when `family` is `None` (unknown) or `Family::M`.
    fn parse_docs(&self, hash: &str, path: &str) -> CollaboratorResult<Vec<DocHit>>;

    /// `true` iff this project maintains the DT-compatible tables.
    fn dts_comp(&self) -> CollaboratorResult<bool>;

    fn dir(&self, tag: &str, path: &str) -> CollaboratorResult<Vec<DirEntry>>;

    fn path_type(&self, tag: &str, path: &str) -> CollaboratorResult<Option<PathType>>;

    fn file(&self, tag: &str, path: &str) -> CollaboratorResult<String>;
}
