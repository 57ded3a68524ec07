use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Validate a single path component supplied by the user.
///
/// Rejects empty names, `.`/`..` and anything containing a separator.
pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AppError::InvalidPath(name.to_string()));
    }
    if trimmed.contains('/') || trimmed.contains(std::path::MAIN_SEPARATOR) {
        return Err(AppError::InvalidPath(name.to_string()));
    }
    Ok(())
}

/// Create a new directory named `name` inside `parent`. Returns the new path.
pub fn create_dir(parent: &Path, name: &str) -> Result<PathBuf> {
    validate_name(name)?;
    let path = parent.join(name.trim());
    fs::create_dir(&path)?;
    tracing::debug!("created directory {}", path.display());
    Ok(path)
}

/// Remove an empty directory.
pub fn remove_dir(path: &Path) -> Result<()> {
    fs::remove_dir(path)?;
    tracing::debug!("removed directory {}", path.display());
    Ok(())
}

/// Remove a file, or a directory with everything below it.
pub fn remove(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    tracing::debug!("removed {}", path.display());
    Ok(())
}
