//! Session plumbing shared by the generators.
//!
//! - [`Project`]: the configuration and resolved file locations of one site.
//! - [`Backup`]: copy of the index taken right before a commit, restored if
//!   that commit fails and removed once it succeeds.
//! - [`Changeset`]: every file a workflow writes is staged first and written
//!   in one commit at the end. If a write fails part way, the files already
//!   written are put back the way they were.
//! - [`WorkflowError`]: the error of a workflow, classified as recoverable
//!   (back to the menu, nothing written) or fatal (restore and exit).

use crate::config::{self, ConfigError, GalleryConfig, ProjectPaths};
use crate::naming::NamingError;
use crate::scan::ScanError;
use crate::splice::SpliceError;
use crate::store::StoreError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A required answer was missing or invalid.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Naming(#[from] NamingError),
    /// The operator declined a confirmation.
    #[error("{0}")]
    Cancelled(String),
    #[error("{0} not found. Run from the gallery's project directory or pass --root.")]
    MissingIndex(PathBuf),
    #[error("Collection {0} not found")]
    UnknownCollection(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Splice(#[from] SpliceError),
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Backup failed: {0}")]
    Backup(io::Error),
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),
}

impl WorkflowError {
    /// Whether the run must stop (restoring the backup) rather than return to
    /// the menu. Closed input counts as a cancellation: nothing was committed.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Validation(_) | Self::Naming(_) | Self::Cancelled(_) => false,
            Self::Io(e) => e.kind() != io::ErrorKind::UnexpectedEof,
            _ => true,
        }
    }

    pub fn is_input_closed(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}

/// Trimmed answer, or a validation error naming the field.
pub fn required(answer: String, message: &str) -> Result<String, WorkflowError> {
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Err(WorkflowError::Validation(message.to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

// ============================================================================
// Project
// ============================================================================

/// A gallery site on disk: its root, configuration and file locations.
#[derive(Debug, Clone)]
pub struct Project {
    pub config: GalleryConfig,
    pub paths: ProjectPaths,
}

impl Project {
    /// Load `gallery.toml` (if any) from `root` and check that the index page
    /// exists.
    pub fn open(root: &Path) -> Result<Self, WorkflowError> {
        let config = config::load_config(root)?;
        Self::with_config(root, config)
    }

    pub fn with_config(root: &Path, config: GalleryConfig) -> Result<Self, WorkflowError> {
        let paths = ProjectPaths::resolve(root, &config.paths);
        if !paths.index.is_file() {
            return Err(WorkflowError::MissingIndex(paths.index));
        }
        tracing::debug!(root = %root.display(), "opened project");
        Ok(Self { config, paths })
    }

    pub fn read_index(&self) -> Result<String, WorkflowError> {
        read(&self.paths.index)
    }

    /// Index path as shown to the operator (relative to the root).
    pub fn index_name(&self) -> &str {
        &self.config.paths.index
    }
}

pub fn read(path: &Path) -> Result<String, WorkflowError> {
    fs::read_to_string(path).map_err(|source| WorkflowError::Read {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Backup
// ============================================================================

/// Copy of the index document taken before it is edited.
#[derive(Debug)]
pub struct Backup {
    original: PathBuf,
    copy: PathBuf,
}

impl Backup {
    pub fn take(original: &Path, copy: &Path) -> Result<Self, WorkflowError> {
        fs::copy(original, copy).map_err(WorkflowError::Backup)?;
        tracing::info!(backup = %copy.display(), "backed up index");
        Ok(Self {
            original: original.to_path_buf(),
            copy: copy.to_path_buf(),
        })
    }

    /// Put the backed-up index back in place. The backup stays on disk.
    pub fn restore(&self) -> io::Result<()> {
        fs::copy(&self.copy, &self.original)?;
        tracing::warn!(index = %self.original.display(), "restored index from backup");
        Ok(())
    }

    /// Remove the backup file once the edit it guarded is committed.
    pub fn discard(self) -> io::Result<()> {
        match fs::remove_file(&self.copy) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

// ============================================================================
// Changeset
// ============================================================================

/// File writes staged by a workflow, committed together.
#[derive(Debug, Default)]
pub struct Changeset {
    writes: Vec<(PathBuf, String)>,
}

/// What a path held before the commit touched it.
enum Snapshot {
    Absent,
    Present(Vec<u8>),
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `contents` for `path`, replacing anything staged for it before.
    pub fn stage(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        let path = path.into();
        let contents = contents.into();
        match self.writes.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = contents,
            None => self.writes.push((path, contents)),
        }
    }

    /// Write every staged file in staging order.
    ///
    /// On the first failure the files already written are restored to their
    /// previous contents (or removed, if they did not exist) and the error is
    /// returned. Returns the written paths on success.
    pub fn commit(self) -> Result<Vec<PathBuf>, WorkflowError> {
        let mut done: Vec<(PathBuf, Snapshot)> = Vec::with_capacity(self.writes.len());

        for (path, contents) in self.writes {
            let snapshot = match fs::read(&path) {
                Ok(bytes) => Snapshot::Present(bytes),
                // NotFound, or a parent that is not a directory
                Err(_) if !path.exists() => Snapshot::Absent,
                Err(source) => {
                    rollback(done);
                    return Err(WorkflowError::Read { path, source });
                }
            };

            let result = match path.parent() {
                Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
                _ => Ok(()),
            }
            .and_then(|()| fs::write(&path, contents.as_bytes()));

            if let Err(source) = result {
                rollback(done);
                return Err(WorkflowError::Write { path, source });
            }
            tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
            done.push((path, snapshot));
        }

        Ok(done.into_iter().map(|(p, _)| p).collect())
    }
}

fn rollback(done: Vec<(PathBuf, Snapshot)>) {
    for (path, snapshot) in done.into_iter().rev() {
        let result = match snapshot {
            Snapshot::Present(bytes) => fs::write(&path, bytes),
            Snapshot::Absent => fs::remove_file(&path),
        };
        match result {
            Ok(()) => tracing::warn!(path = %path.display(), "rolled back write"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "rollback failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn validation_is_not_fatal() {
        assert!(!WorkflowError::Validation("x".into()).is_fatal());
        assert!(!WorkflowError::Cancelled("x".into()).is_fatal());
        assert!(!WorkflowError::Naming(NamingError::Empty).is_fatal());
        assert!(WorkflowError::UnknownCollection("x".into()).is_fatal());
        assert!(WorkflowError::MissingIndex("index.html".into()).is_fatal());
    }

    #[test]
    fn closed_input_is_not_fatal() {
        let eof = WorkflowError::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "eof"));
        assert!(!eof.is_fatal());
        assert!(eof.is_input_closed());
        let broken = WorkflowError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe"));
        assert!(broken.is_fatal());
    }

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("  Name ".into(), "x").unwrap(), "Name");
        let err = required("   ".into(), "Collection name is required").unwrap_err();
        assert_eq!(err.to_string(), "Collection name is required");
    }

    #[test]
    fn project_requires_index() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Project::open(tmp.path()),
            Err(WorkflowError::MissingIndex(_))
        ));
        fs::write(tmp.path().join("index.html"), "<html></html>").unwrap();
        let project = Project::open(tmp.path()).unwrap();
        assert_eq!(project.paths.store, tmp.path().join("collections.json"));
        assert_eq!(project.index_name(), "index.html");
    }

    #[test]
    fn backup_restore_and_discard() {
        let tmp = TempDir::new().unwrap();
        let index = tmp.path().join("index.html");
        let copy = tmp.path().join("index.html.backup");
        fs::write(&index, "original").unwrap();

        let backup = Backup::take(&index, &copy).unwrap();
        fs::write(&index, "edited").unwrap();
        backup.restore().unwrap();
        assert_eq!(fs::read_to_string(&index).unwrap(), "original");

        backup.discard().unwrap();
        assert!(!copy.exists());
    }

    #[test]
    fn staging_twice_keeps_last_contents() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.html");
        let b = tmp.path().join("b.html");
        let mut changes = Changeset::new();
        changes.stage(&a, "one");
        changes.stage(&b, "two");
        changes.stage(&a, "three");
        assert_eq!(changes.commit().unwrap(), vec![a.clone(), b.clone()]);
        assert_eq!(fs::read_to_string(&a).unwrap(), "three");
        assert_eq!(fs::read_to_string(&b).unwrap(), "two");
    }

    #[test]
    fn commit_writes_and_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let page = tmp.path().join("collections/new.html");
        let mut changes = Changeset::new();
        changes.stage(&page, "<html></html>");
        let written = changes.commit().unwrap();
        assert_eq!(written, vec![page.clone()]);
        assert_eq!(fs::read_to_string(&page).unwrap(), "<html></html>");
    }

    #[test]
    fn failed_commit_rolls_back_earlier_writes() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("collections.json");
        let created = tmp.path().join("new.html");
        let blocked = tmp.path().join("a-directory");
        fs::write(&existing, "{}").unwrap();
        fs::create_dir(&blocked).unwrap();

        let mut changes = Changeset::new();
        changes.stage(&existing, "{\"changed\": true}");
        changes.stage(&created, "new page");
        changes.stage(&blocked, "cannot write over a directory");

        let err = changes.commit().unwrap_err();
        assert!(matches!(err, WorkflowError::Write { .. } | WorkflowError::Read { .. }));
        assert_eq!(fs::read_to_string(&existing).unwrap(), "{}");
        assert!(!created.exists());
        assert!(blocked.is_dir());
    }
}
