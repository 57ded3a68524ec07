//! A sortable, filterable directory listing model.
//!
//! [`model::FolderModel`] lists one directory, filters and sorts the entries,
//! and exposes them as rows of role-keyed cells for a table view.

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod model;
pub mod theme;

pub use error::{AppError, Result};
pub use model::FolderModel;
