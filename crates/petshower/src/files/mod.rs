//! Rooted filesystem access for attachments and loose files.
//!
//! A [`FileVault`] is the snapshot engine's only window onto the
//! filesystem: every path is relative to the vault root, and anything
//! that escapes the root is rejected before touching the disk.
//!
//! Restore never writes into the live tree directly. It stages every file
//! payload into a hidden directory via [`RestoreStage`] and swaps the
//! managed sub-path over the live one only after the relational commit
//! succeeds — so a restore that fails relationally leaves the live
//! filesystem untouched.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, warn};

/// The managed sub-path under the vault root.
///
/// All attachment payloads and loose files live under this directory;
/// it is the unit the restore swap replaces.
pub const MANAGED_DIR: &str = "uploads";

/// Errors from vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The relative path is absolute, escapes the root, or falls outside
    /// the managed sub-path where one is required.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The offending path as given.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An I/O operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// The path the operation touched.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl VaultError {
    fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    fn invalid(path: &str, reason: &'static str) -> Self {
        Self::InvalidPath { path: path.to_owned(), reason }
    }
}

/// Filesystem access rooted at a storage directory.
#[derive(Debug, Clone)]
pub struct FileVault {
    root: PathBuf,
}

impl FileVault {
    /// Create a vault rooted at the given directory.
    ///
    /// The directory itself is created lazily by the first write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against a base, rejecting anything that
    /// could step outside it.
    fn resolve(base: &Path, rel: &str) -> Result<PathBuf, VaultError> {
        let rel_path = Path::new(rel);
        if rel_path.is_absolute() {
            return Err(VaultError::invalid(rel, "absolute paths are not allowed"));
        }
        for component in rel_path.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => return Err(VaultError::invalid(rel, "path escapes the storage root")),
            }
        }
        Ok(base.join(rel_path))
    }

    /// Read a file's bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the file is missing or unreadable —
    /// the snapshot builder treats that as fatal, since a document must
    /// never claim a file it cannot retrieve.
    pub fn read(&self, rel: &str) -> Result<Vec<u8>, VaultError> {
        let path = Self::resolve(&self.root, rel)?;
        fs::read(&path).map_err(|e| VaultError::io(path, e))
    }

    /// Write a file, creating intermediate directories as needed.
    pub fn write(&self, rel: &str, bytes: &[u8]) -> Result<(), VaultError> {
        let path = Self::resolve(&self.root, rel)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| VaultError::io(path, e))
    }

    /// List every file under a relative directory, recursively.
    ///
    /// Returns root-relative paths with `/` separators, sorted. A missing
    /// directory yields an empty list — absence of loose files is not an
    /// error.
    pub fn list(&self, rel_dir: &str) -> Result<Vec<String>, VaultError> {
        let dir = Self::resolve(&self.root, rel_dir)?;
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut found = Vec::new();
        self.walk(&dir, &mut found)?;
        found.sort();
        Ok(found)
    }

    fn walk(&self, dir: &Path, found: &mut Vec<String>) -> Result<(), VaultError> {
        let entries = fs::read_dir(dir).map_err(|e| VaultError::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| VaultError::io(dir, e))?;
            let path = entry.path();
            if path.is_dir() {
                self.walk(&path, found)?;
            } else if let Ok(rel) = path.strip_prefix(&self.root) {
                let parts: Vec<String> =
                    rel.components().map(|c| c.as_os_str().to_string_lossy().into_owned()).collect();
                found.push(parts.join("/"));
            }
        }
        Ok(())
    }

    /// Open a staging area for a restore.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Io`] if the staging directory cannot be
    /// created.
    pub fn stage(&self) -> Result<RestoreStage, VaultError> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        let dir = self.root.join(format!(".restore-stage-{nanos}"));
        fs::create_dir_all(&dir).map_err(|e| VaultError::io(&dir, e))?;
        debug!(stage = %dir.display(), "opened restore staging area");
        Ok(RestoreStage { root: self.root.clone(), dir, active: true })
    }
}

/// A staging area for restore file writes.
///
/// Writes land in a hidden directory beside the live tree. [`promote`]
/// swaps the staged managed sub-path over the live one in two renames;
/// [`discard`] (or drop) removes the staging directory without touching
/// live data.
///
/// [`promote`]: RestoreStage::promote
/// [`discard`]: RestoreStage::discard
#[derive(Debug)]
pub struct RestoreStage {
    root: PathBuf,
    dir: PathBuf,
    active: bool,
}

impl RestoreStage {
    /// Stage a file payload.
    ///
    /// The path must fall under the managed sub-path; the swap only
    /// promotes that directory, and silently losing a staged file outside
    /// it would break the restore contract.
    pub fn write(&mut self, rel: &str, bytes: &[u8]) -> Result<(), VaultError> {
        let under_managed = Path::new(rel)
            .components()
            .next()
            .is_some_and(|c| c.as_os_str() == MANAGED_DIR);
        if !under_managed {
            return Err(VaultError::invalid(rel, "path is outside the managed sub-path"));
        }
        let path = FileVault::resolve(&self.dir, rel)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VaultError::io(parent, e))?;
        }
        fs::write(&path, bytes).map_err(|e| VaultError::io(path, e))
    }

    /// Swap the staged managed sub-path over the live one.
    ///
    /// Called only after the relational commit. The old live directory is
    /// moved aside, the staged one renamed into place, and the tombstone
    /// removed. If no files were staged the live directory is replaced by
    /// an empty one — a restore with no payloads still wipes the managed
    /// sub-path.
    pub fn promote(mut self) -> Result<(), VaultError> {
        self.active = false;
        let live = self.root.join(MANAGED_DIR);
        let staged = self.dir.join(MANAGED_DIR);
        if !staged.exists() {
            fs::create_dir_all(&staged).map_err(|e| VaultError::io(&staged, e))?;
        }

        let tombstone = self.dir.join(".old");
        if live.exists() {
            fs::rename(&live, &tombstone).map_err(|e| VaultError::io(&live, e))?;
        }
        if let Err(e) = fs::rename(&staged, &live) {
            // Put the old tree back before reporting; best effort.
            if tombstone.exists() {
                if let Err(undo) = fs::rename(&tombstone, &live) {
                    warn!(error = %undo, "failed to restore previous managed directory");
                }
            }
            return Err(VaultError::io(staged, e));
        }
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            warn!(error = %e, stage = %self.dir.display(), "failed to remove staging directory");
        }
        Ok(())
    }

    /// Remove the staging area without touching live data.
    pub fn discard(mut self) {
        self.active = false;
        if let Err(e) = fs::remove_dir_all(&self.dir) {
            warn!(error = %e, stage = %self.dir.display(), "failed to remove staging directory");
        }
    }
}

impl Drop for RestoreStage {
    fn drop(&mut self) {
        if self.active {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> (tempfile::TempDir, FileVault) {
        let dir = tempfile::tempdir().expect("tempdir");
        let vault = FileVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn read_back_what_was_written() {
        let (_dir, vault) = vault();
        vault.write("uploads/rex.jpg", b"jpeg bytes").expect("write");
        assert_eq!(vault.read("uploads/rex.jpg").expect("read"), b"jpeg bytes");
    }

    #[test]
    fn missing_file_is_an_error() {
        let (_dir, vault) = vault();
        assert!(matches!(vault.read("uploads/nope.png"), Err(VaultError::Io { .. })));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        let (_dir, vault) = vault();
        assert!(matches!(vault.read("../secret"), Err(VaultError::InvalidPath { .. })));
        assert!(matches!(vault.read("/etc/passwd"), Err(VaultError::InvalidPath { .. })));
    }

    #[test]
    fn list_is_recursive_sorted_and_tolerates_absence() {
        let (_dir, vault) = vault();
        assert!(vault.list(MANAGED_DIR).expect("list").is_empty());

        vault.write("uploads/b.txt", b"b").expect("write");
        vault.write("uploads/sub/a.txt", b"a").expect("write");
        assert_eq!(
            vault.list(MANAGED_DIR).expect("list"),
            vec!["uploads/b.txt".to_owned(), "uploads/sub/a.txt".to_owned()]
        );
    }

    #[test]
    fn promote_swaps_the_managed_dir() {
        let (_dir, vault) = vault();
        vault.write("uploads/old.txt", b"old").expect("write");

        let mut stage = vault.stage().expect("stage");
        stage.write("uploads/new.txt", b"new").expect("stage write");
        stage.promote().expect("promote");

        assert!(matches!(vault.read("uploads/old.txt"), Err(VaultError::Io { .. })));
        assert_eq!(vault.read("uploads/new.txt").expect("read"), b"new");
    }

    #[test]
    fn discard_leaves_live_tree_untouched() {
        let (dir, vault) = vault();
        vault.write("uploads/keep.txt", b"keep").expect("write");

        let mut stage = vault.stage().expect("stage");
        stage.write("uploads/doomed.txt", b"doomed").expect("stage write");
        stage.discard();

        assert_eq!(vault.read("uploads/keep.txt").expect("read"), b"keep");
        assert!(matches!(vault.read("uploads/doomed.txt"), Err(VaultError::Io { .. })));
        // Staging directory is gone.
        let hidden: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(".restore-stage-"))
            .collect();
        assert!(hidden.is_empty());
    }

    #[test]
    fn stage_rejects_paths_outside_managed_dir() {
        let (_dir, vault) = vault();
        let mut stage = vault.stage().expect("stage");
        assert!(matches!(
            stage.write("elsewhere/file.txt", b"x"),
            Err(VaultError::InvalidPath { .. })
        ));
        stage.discard();
    }

    #[test]
    fn promote_without_staged_files_still_wipes() {
        let (_dir, vault) = vault();
        vault.write("uploads/stale.txt", b"stale").expect("write");

        let stage = vault.stage().expect("stage");
        stage.promote().expect("promote");

        assert!(matches!(vault.read("uploads/stale.txt"), Err(VaultError::Io { .. })));
        assert!(vault.list(MANAGED_DIR).expect("list").is_empty());
    }
}
