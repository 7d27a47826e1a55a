//! Subprocess-backed `Collaborator` (spec §6): shells out to a single
//! configured command, passing the subcommand name and arguments, and
//! reads newline-delimited output from standard output.
//!
//! Grounded on the external-command pattern in
//! `Brahmastra-Labs-logicaffeine/src/project/build.rs` (spawn, wait,
//! inspect status/stderr), extended with a watchdog thread so a wedged
//! child can't hang the worker that's waiting on it (spec §5: "external
//! parser invocations must honor a per-blob timeout").

use crate::collaborator::{BlobListing, Collaborator, DefHit, DirEntry, DocHit, PathType};
use crate::error::{CollaboratorError, CollaboratorResult};
use crate::types::{DefType, Family};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

pub struct ProcessCollaborator {
    command: String,
    base_args: Vec<String>,
    timeout: Duration,
}

impl ProcessCollaborator {
    pub fn new(command: impl Into<String>, timeout: Duration) -> ProcessCollaborator {
        ProcessCollaborator { command: command.into(), base_args: Vec::new(), timeout }
    }

    /// Extra fixed arguments (e.g. a repository path) prepended to every invocation.
    pub fn with_base_args(mut self, base_args: Vec<String>) -> ProcessCollaborator {
        self.base_args = base_args;
        self
    }

    fn run(&self, args: &[&str]) -> CollaboratorResult<Vec<u8>> {
        let mut child = Command::new(&self.command)
            .args(&self.base_args)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CollaboratorError::Spawn { command: self.command.clone(), source })?;

        self.wait_with_timeout(&mut child)
    }

    fn wait_with_timeout(&self, child: &mut Child) -> CollaboratorResult<Vec<u8>> {
        let mut stdout = child.stdout.take().expect("stdout piped");
        let mut stderr = child.stderr.take().expect("stderr piped");

        let (tx, rx) = mpsc::channel();
        let reader = std::thread::spawn(move || {
            let mut out = Vec::new();
            let _ = stdout.read_to_end(&mut out);
            let mut err = String::new();
            let _ = stderr.read_to_string(&mut err);
            let _ = tx.send((out, err));
        });

        match rx.recv_timeout(self.timeout) {
            Ok((out, stderr)) => {
                let status = child.wait().map_err(|source| CollaboratorError::Spawn {
                    command: self.command.clone(),
                    source,
                })?;
                let _ = reader.join();
                if !status.success() {
                    return Err(CollaboratorError::NonZeroExit {
                        command: format!("{} ({stderr})", self.command),
                        status: status.code().unwrap_or(-1),
                    });
                }
                Ok(out)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(CollaboratorError::Timeout {
                    command: self.command.clone(),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(CollaboratorError::MalformedOutput {
                reason: "collaborator output thread vanished".to_string(),
            }),
        }
    }

    fn run_lines(&self, args: &[&str]) -> CollaboratorResult<Vec<String>> {
        let out = self.run(args)?;
        let text = String::from_utf8(out)
            .map_err(|e| CollaboratorError::MalformedOutput { reason: e.to_string() })?;
        Ok(text.lines().map(str::to_string).filter(|l| !l.is_empty()).collect())
    }
}

impl Collaborator for ProcessCollaborator {
    fn list_tags(&self) -> CollaboratorResult<Vec<String>> {
        self.run_lines(&["list-tags"])
    }

    fn list_blobs(&self, tag: &str) -> CollaboratorResult<Vec<BlobListing>> {
        self.run_lines(&["list-blobs", "-f", tag])?
            .into_iter()
            .map(|line| {
                let (hash, path) = line.split_once(' ').ok_or_else(|| CollaboratorError::MalformedOutput {
                    reason: format!("list-blobs line missing separator: '{line}'"),
                })?;
                Ok(BlobListing { hash: hash.to_string(), path: path.to_string() })
            })
            .collect()
    }

    fn get_blob(&self, hash: &str) -> CollaboratorResult<Vec<u8>> {
        self.run(&["get-blob", hash])
    }

    fn parse_defs(&self, hash: &str, path: &str, family: Family) -> CollaboratorResult<Vec<DefHit>> {
        Ok(self
            .run_lines(&["parse-defs", hash, path, &family.code().to_string()])?
            .into_iter()
            .filter_map(|line| parse_def_line(&line))
            .collect())
    }

    fn parse_docs(&self, hash: &str, path: &str) -> CollaboratorResult<Vec<DocHit>> {
        Ok(self
            .run_lines(&["parse-docs", hash, path])?
            .into_iter()
            .filter_map(|line| parse_doc_line(&line))
            .collect())
    }

    fn dts_comp(&self) -> CollaboratorResult<bool> {
        let lines = self.run_lines(&["dts-comp"])?;
        Ok(lines.first().map(|l| l.trim() == "1").unwrap_or(false))
    }

    fn dir(&self, tag: &str, path: &str) -> CollaboratorResult<Vec<DirEntry>> {
        self.run_lines(&["dir", tag, path])?
            .into_iter()
            .map(|line| parse_dir_line(&line))
            .collect()
    }

    fn path_type(&self, tag: &str, path: &str) -> CollaboratorResult<Option<PathType>> {
        let lines = self.run_lines(&["type", tag, path])?;
        Ok(match lines.first().map(String::as_str) {
            Some("tree") => Some(PathType::Tree),
            Some("blob") => Some(PathType::Blob),
            _ => None,
        })
    }

    fn file(&self, tag: &str, path: &str) -> CollaboratorResult<String> {
        let out = self.run(&["file", tag, path])?;
        String::from_utf8(out).map_err(|e| CollaboratorError::MalformedOutput { reason: e.to_string() })
    }
}

/// Skips (at debug level) rather than fails the whole extraction on a
/// malformed line — one bad line from the collaborator shouldn't cost the
/// blob every other def it reported.
fn parse_def_line(line: &str) -> Option<DefHit> {
    let mut parts = line.rsplitn(3, ' ');
    let (Some(line_no), Some(type_code), Some(ident)) = (parts.next(), parts.next(), parts.next()) else {
        tracing::debug!(line, "skipping malformed parse-defs line");
        return None;
    };
    let Some(def_type) = type_code.chars().next().and_then(DefType::from_code) else {
        tracing::debug!(line, "skipping parse-defs line with unknown DefType letter");
        return None;
    };
    let Ok(line_num) = line_no.parse() else {
        tracing::debug!(line, "skipping parse-defs line with bad line number");
        return None;
    };
    Some(DefHit { ident: ident.to_string(), def_type, line: line_num })
}

fn parse_doc_line(line: &str) -> Option<DocHit> {
    let Some((ident, line_no)) = line.rsplit_once(' ') else {
        tracing::debug!(line, "skipping malformed parse-docs line");
        return None;
    };
    let Ok(line_num) = line_no.parse() else {
        tracing::debug!(line, "skipping parse-docs line with bad line number");
        return None;
    };
    Some(DocHit { ident: ident.to_string(), line: line_num })
}

fn parse_dir_line(line: &str) -> CollaboratorResult<DirEntry> {
    let mut parts = line.splitn(4, ' ');
    let (Some(kind), Some(name), Some(size), Some(mode)) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CollaboratorError::MalformedOutput { reason: format!("malformed dir line: '{line}'") });
    };
    let kind = match kind {
        "tree" => PathType::Tree,
        "blob" => PathType::Blob,
        other => {
            return Err(CollaboratorError::MalformedOutput { reason: format!("unknown dir entry kind '{other}'") })
        }
    };
    let size: u64 = size
        .parse()
        .map_err(|_| CollaboratorError::MalformedOutput { reason: format!("bad size in '{line}'") })?;
    let mode = u32::from_str_radix(mode, 8)
        .map_err(|_| CollaboratorError::MalformedOutput { reason: format!("bad octal mode in '{line}'") })?;
    Ok(DirEntry { kind, name: name.to_string(), size, mode })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_def_line_splits_from_the_right() {
        let hit = parse_def_line("some ident f 42").unwrap();
        assert_eq!(hit.ident, "some ident");
        assert_eq!(hit.def_type, DefType::Function);
        assert_eq!(hit.line, 42);
    }

    #[test]
    fn parse_def_line_skips_malformed_input_instead_of_erroring() {
        assert!(parse_def_line("not enough fields").is_none());
        assert!(parse_def_line("ident z 42").is_none());
        assert!(parse_def_line("ident f notanumber").is_none());
    }

    #[test]
    fn parse_dir_line_decodes_octal_mode() {
        let entry = parse_dir_line("blob Makefile 120 100644").unwrap();
        assert_eq!(entry.kind, PathType::Blob);
        assert_eq!(entry.mode, 0o100644);
        assert_eq!(entry.size, 120);
    }

    #[test]
    fn timeout_kills_a_sleeping_child() {
        let collaborator = ProcessCollaborator::new("sleep", Duration::from_millis(50));
        let err = collaborator.run(&["2"]).unwrap_err();
        assert!(matches!(err, CollaboratorError::Timeout { .. }));
    }

    #[test]
    fn nonzero_exit_is_reported() {
        let collaborator = ProcessCollaborator::new("false", Duration::from_secs(5));
        let err = collaborator.run(&[]).unwrap_err();
        assert!(matches!(err, CollaboratorError::NonZeroExit { .. }));
    }

    #[test]
    fn base_args_are_prepended() {
        let collaborator =
            ProcessCollaborator::new("echo", Duration::from_secs(5)).with_base_args(vec!["hello".to_string()]);
        let out = collaborator.run(&["world"]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "hello world");
    }
}
