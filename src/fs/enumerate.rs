//! Directory enumeration: immediate children plus the `..` pseudo-entry.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{AppError, Result};
use crate::fs::entry::DirectoryEntry;
use crate::fs::platform::SystemFilePredicate;

/// Whether `path` is a filesystem root (has no parent).
pub fn is_root(path: &Path) -> bool {
    path.parent().is_none()
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
///
/// `..` above the root stays at the root.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// List the immediate children of `root`.
///
/// The `..` entry is included unless `root` is a filesystem root. An empty,
/// readable directory succeeds. Failing to open or read `root` is an error.
/// Children that vanish or cannot be stat'ed (e.g. broken symlinks) are skipped.
pub fn list_directory(root: &Path, is_system: SystemFilePredicate) -> Result<Vec<DirectoryEntry>> {
    let read_dir = fs::read_dir(root).map_err(|source| AppError::EnumerationFailed {
        path: root.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();

    if !is_root(root) {
        match DirectoryEntry::parent_of(root, is_system) {
            Ok(parent) => entries.push(parent),
            Err(e) => tracing::debug!("skipping parent entry of {}: {}", root.display(), e),
        }
    }

    push_children(
        root,
        read_dir.map(|entry| entry.map(|e| e.path())),
        is_system,
        &mut entries,
    )?;

    tracing::debug!("listed {}: {} entries", root.display(), entries.len());
    Ok(entries)
}

/// Stat each child path into `entries`.
///
/// A read error from the directory stream aborts with `EnumerationFailed`
/// so a partial listing never passes as complete.
fn push_children(
    root: &Path,
    children: impl IntoIterator<Item = io::Result<PathBuf>>,
    is_system: SystemFilePredicate,
    entries: &mut Vec<DirectoryEntry>,
) -> Result<()> {
    for child in children {
        let path = child.map_err(|source| AppError::EnumerationFailed {
            path: root.to_path_buf(),
            source,
        })?;
        match DirectoryEntry::new(&path, is_system) {
            Ok(entry) => entries.push(entry),
            Err(e) => tracing::debug!("skipping {}: {}", path.display(), e),
        }
    }
    Ok(())
}

/// Enumerate mounted volume roots as drive entries.
#[cfg(windows)]
pub fn list_drives() -> Vec<DirectoryEntry> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|p| p.exists())
        .filter_map(|p| DirectoryEntry::drive(&p).ok())
        .collect()
}

/// Enumerate mounted volume roots as drive entries.
#[cfg(not(windows))]
pub fn list_drives() -> Vec<DirectoryEntry> {
    DirectoryEntry::drive(Path::new("/")).into_iter().collect()
}
