use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Folder model error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Root path change rejected because the target does not exist.
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The directory exists but could not be listed.
    #[error("Cannot list {}: {source}", path.display())]
    EnumerationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid path or entry name provided by the caller.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Row index outside the current view.
    #[error("Invalid row index: {0}")]
    InvalidIndex(usize),

    /// Filesystem watcher could not be set up.
    #[error("Watcher error: {0}")]
    Watcher(#[from] notify::Error),

    /// Configuration file could not be used.
    #[error("Config error: {0}")]
    Config(String),
}
