pub mod entry;
pub mod enumerate;
pub mod filter;
pub mod operations;
pub mod platform;
pub mod sort;
pub mod watcher;
