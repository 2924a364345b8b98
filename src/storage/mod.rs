//! File system storage management
//!
//! The thirteen sandboxed file operations. Every operation validates its path
//! arguments through [`crate::sandbox::Sandbox`] before touching the disk and
//! reports failures as [`crate::error::OperationError`] values.

pub mod analysis;
pub mod discovery;
pub mod filesystem;
pub mod modes;
pub mod operations;
pub mod organize;
pub mod results;

pub use analysis::get_file_info;
pub use discovery::{list_recent_files, search_files};
pub use modes::{SearchType, UpdateMode};
pub use operations::{create_file, delete_file, list_directory, read_file, update_file};
pub use organize::{copy_file, create_backup, create_directory, move_file, rename_file};
