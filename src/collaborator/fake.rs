//! An in-memory `Collaborator` for tests: no subprocess, no filesystem.
//!
//! Lets the updater and query-engine tests exercise the full pipeline
//! against fixture data instead of a real repository checkout.

use crate::collaborator::{BlobListing, Collaborator, DefHit, DirEntry, DocHit, PathType};
use crate::error::{CollaboratorError, CollaboratorResult};
use crate::types::Family;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeCollaborator {
    tags: Mutex<Vec<String>>,
    /// tag -> (hash, path) pairs backing that tag's manifest.
    blobs: Mutex<HashMap<String, Vec<(String, String)>>>,
    contents: Mutex<HashMap<String, Vec<u8>>>,
    defs: Mutex<HashMap<String, Vec<DefHit>>>,
    docs: Mutex<HashMap<String, Vec<DocHit>>>,
    dts_comp: Mutex<bool>,
}

impl FakeCollaborator {
    pub fn new() -> FakeCollaborator {
        FakeCollaborator::default()
    }

    pub fn add_tag(&self, tag: &str, entries: &[(&str, &str)]) {
        self.tags.lock().unwrap().push(tag.to_string());
        let rows = entries.iter().map(|&(hash, path)| (hash.to_string(), path.to_string())).collect();
        self.blobs.lock().unwrap().insert(tag.to_string(), rows);
    }

    pub fn set_blob_content(&self, hash: &str, content: impl Into<Vec<u8>>) {
        self.contents.lock().unwrap().insert(hash.to_string(), content.into());
    }

    pub fn set_defs(&self, hash: &str, hits: Vec<DefHit>) {
        self.defs.lock().unwrap().insert(hash.to_string(), hits);
    }

    pub fn set_docs(&self, hash: &str, hits: Vec<DocHit>) {
        self.docs.lock().unwrap().insert(hash.to_string(), hits);
    }

    pub fn set_dts_comp(&self, value: bool) {
        *self.dts_comp.lock().unwrap() = value;
    }
}

impl Collaborator for FakeCollaborator {
    fn list_tags(&self) -> CollaboratorResult<Vec<String>> {
        Ok(self.tags.lock().unwrap().clone())
    }

    fn list_blobs(&self, tag: &str) -> CollaboratorResult<Vec<BlobListing>> {
        let blobs = self.blobs.lock().unwrap();
        let rows = blobs.get(tag).cloned().unwrap_or_default();
        Ok(rows.into_iter().map(|(hash, path)| BlobListing { hash, path }).collect())
    }

    fn get_blob(&self, hash: &str) -> CollaboratorResult<Vec<u8>> {
        self.contents
            .lock()
            .unwrap()
            .get(hash)
            .cloned()
            .ok_or_else(|| CollaboratorError::MalformedOutput { reason: format!("no fixture blob for '{hash}'") })
    }

    fn parse_defs(&self, hash: &str, _path: &str, _family: Family) -> CollaboratorResult<Vec<DefHit>> {
        Ok(self.defs.lock().unwrap().get(hash).cloned().unwrap_or_default())
    }

    fn parse_docs(&self, hash: &str, _path: &str) -> CollaboratorResult<Vec<DocHit>> {
        Ok(self.docs.lock().unwrap().get(hash).cloned().unwrap_or_default())
    }

    fn dts_comp(&self) -> CollaboratorResult<bool> {
        Ok(*self.dts_comp.lock().unwrap())
    }

    fn dir(&self, _tag: &str, _path: &str) -> CollaboratorResult<Vec<DirEntry>> {
        Ok(Vec::new())
    }

    fn path_type(&self, tag: &str, path: &str) -> CollaboratorResult<Option<PathType>> {
        let blobs = self.blobs.lock().unwrap();
        let rows = blobs.get(tag).cloned().unwrap_or_default();
        Ok(rows.iter().find(|(_, p)| p == path).map(|_| PathType::Blob))
    }

    fn file(&self, tag: &str, path: &str) -> CollaboratorResult<String> {
        let blobs = self.blobs.lock().unwrap();
        let rows = blobs.get(tag).cloned().unwrap_or_default();
        let (hash, _path) = rows
            .iter()
            .find(|(_, p)| p == path)
            .ok_or_else(|| CollaboratorError::MalformedOutput { reason: format!("no file '{path}' in tag '{tag}'") })?;
        let bytes = self.get_blob(hash)?;
        String::from_utf8(bytes).map_err(|e| CollaboratorError::MalformedOutput { reason: e.to_string() })
    }
}

impl FakeCollaborator {
    /// All `(hash, path)` pairs for `tag`, for test setup that needs the
    /// manifest the updater's Stage 1/4 would build.
    pub fn manifest(&self, tag: &str) -> Vec<(String, String)> {
        self.blobs.lock().unwrap().get(tag).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_blobs_reflects_added_tag() {
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[("h1", "dir/a.c")]);
        let blobs = collaborator.list_blobs("v1").unwrap();
        assert_eq!(blobs.len(), 1);
        assert_eq!(blobs[0].hash, "h1");
        assert_eq!(blobs[0].path, "dir/a.c");
    }

    #[test]
    fn get_blob_missing_is_an_error_not_empty() {
        let collaborator = FakeCollaborator::new();
        assert!(collaborator.get_blob("missing").is_err());
    }

    #[test]
    fn file_resolves_path_through_manifest() {
        let collaborator = FakeCollaborator::new();
        collaborator.add_tag("v1", &[("h1", "dir/a.c")]);
        collaborator.set_blob_content("h1", b"int main() {}\n".to_vec());
        assert_eq!(collaborator.file("v1", "dir/a.c").unwrap(), "int main() {}\n");
    }
}
