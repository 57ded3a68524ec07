use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::Result;
use crate::fs::platform::{self, SystemFilePredicate};

/// File name of the synthetic parent entry.
pub const PARENT_NAME: &str = "..";

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Dir,
    /// Volume root, e.g. `C:\`.
    Drive,
    /// Synthetic `..` entry pointing at the parent directory.
    Parent,
}

/// Snapshot of one directory child, taken at enumeration time.
///
/// Goes stale after external filesystem changes until the next refresh.
#[derive(Debug, Clone)]
pub struct DirectoryEntry {
    /// Absolute path; for the parent entry this is `<root>/..`.
    pub path: PathBuf,
    /// Full file name including the extension.
    pub name: String,
    /// Everything before the last `.` (empty for dotfiles like `.bashrc`).
    pub base_name: String,
    /// Everything after the last `.`.
    pub suffix: String,
    pub kind: EntryKind,
    pub size: u64,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
    pub owner: String,
    pub group: String,
    /// Permission bits (`mode & 0o7777`).
    pub permissions: u32,
    pub is_hidden: bool,
    pub is_system: bool,
    pub is_writable: bool,
    pub is_symlink: bool,
}

/// Split a file name at its last dot into (complete base name, suffix).
pub fn split_name(name: &str) -> (String, String) {
    match name.rfind('.') {
        Some(pos) => (name[..pos].to_string(), name[pos + 1..].to_string()),
        None => (name.to_string(), String::new()),
    }
}

impl DirectoryEntry {
    /// Create an entry from a filesystem path, following symlinks.
    ///
    /// Broken symlinks fail with an I/O error.
    pub fn new(path: &Path, is_system: SystemFilePredicate) -> Result<Self> {
        let is_symlink = fs::symlink_metadata(path)?.file_type().is_symlink();
        let metadata = fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let kind = if metadata.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        };
        Ok(Self::from_metadata(path.to_path_buf(), name, kind, &metadata, is_system, is_symlink))
    }

    /// Create the `..` pseudo-entry for `root`, carrying the parent's metadata.
    pub fn parent_of(root: &Path, is_system: SystemFilePredicate) -> Result<Self> {
        let path = root.join(PARENT_NAME);
        let metadata = fs::metadata(&path)?;
        Ok(Self::from_metadata(
            path,
            PARENT_NAME.to_string(),
            EntryKind::Parent,
            &metadata,
            is_system,
            false,
        ))
    }

    /// Create a volume-root entry.
    pub fn drive(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path)?;
        Ok(Self::from_metadata(
            path.to_path_buf(),
            path.to_string_lossy().to_string(),
            EntryKind::Drive,
            &metadata,
            platform::never_system,
            false,
        ))
    }

    fn from_metadata(
        path: PathBuf,
        name: String,
        kind: EntryKind,
        metadata: &fs::Metadata,
        is_system: SystemFilePredicate,
        is_symlink: bool,
    ) -> Self {
        let (base_name, suffix) = match kind {
            EntryKind::File | EntryKind::Dir => split_name(&name),
            EntryKind::Drive | EntryKind::Parent => (name.clone(), String::new()),
        };
        Self {
            is_hidden: platform::is_hidden(&name, metadata),
            is_system: is_system(&path, metadata),
            is_writable: platform::is_writable(metadata),
            owner: platform::owner_name(metadata),
            group: platform::group_name(metadata),
            permissions: platform::permission_bits(metadata),
            size: metadata.len(),
            created: metadata.created().ok(),
            modified: metadata.modified().ok(),
            path,
            name,
            base_name,
            suffix,
            kind,
            is_symlink,
        }
    }

    /// Directories, drives and the parent entry all count as directories.
    pub fn is_dir(&self) -> bool {
        !matches!(self.kind, EntryKind::File)
    }

    pub fn is_parent(&self) -> bool {
        self.kind == EntryKind::Parent
    }

    /// Name shown in the name column: the base name for files that have one,
    /// the full file name for directories and dotfiles.
    pub fn display_name(&self) -> &str {
        if !self.is_dir() && !self.base_name.is_empty() {
            &self.base_name
        } else {
            &self.name
        }
    }

    /// Extension shown in the type column; empty for directories and dotfiles.
    pub fn display_type(&self) -> &str {
        if !self.is_dir() && !self.base_name.is_empty() {
            &self.suffix
        } else {
            ""
        }
    }
}
