//! Organizing operations
//!
//! Directory creation and the operations that relocate or duplicate entries:
//! rename, move, copy and backup.

use log::info;
use std::fs;
use std::io;

use crate::error::{DomainError, OperationError};
use crate::sandbox::{Sandbox, ensure_markdown_extension, require_name};
use crate::storage::filesystem::{
    backup_timestamp, copy_exclusive, create_parent_dirs, directory_exists, file_exists,
    move_entry, run_operation,
};
use crate::storage::results::{
    BackupResult, CopyResult, CreateDirectoryResult, MoveResult, RenameResult,
};

/// Creates a directory and any missing parents.
pub fn create_directory(
    sandbox: &Sandbox,
    dirname: &str,
) -> Result<CreateDirectoryResult, OperationError> {
    run_operation("create_directory", || format!("dirname={dirname:?}"), || {
        require_name("dirname", dirname)?;
        let target = sandbox.resolve(dirname)?;
        let dir_path = target.absolute();

        if dir_path.exists() || target.is_root() {
            return Err(DomainError::DirectoryAlreadyExists(dirname.to_string()).into());
        }

        create_parent_dirs(dir_path)?;
        match fs::create_dir(dir_path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DomainError::DirectoryAlreadyExists(dirname.to_string()).into());
            }
            Err(e) => return Err(e.into()),
        }

        info!("Created directory {} (real: {})", dirname, dir_path.display());

        Ok(CreateDirectoryResult {
            dirname: dirname.to_string(),
            message: format!("Successfully created directory '{dirname}'"),
        })
    })
}

/// Renames a file or directory within its current directory.
///
/// Files keep the markdown convention: `.md` is appended to the new name.
pub fn rename_file(
    sandbox: &Sandbox,
    old_name: &str,
    new_name: &str,
) -> Result<RenameResult, OperationError> {
    run_operation(
        "rename_file",
        || format!("old_name={old_name:?}, new_name={new_name:?}"),
        || {
            require_name("old_name", old_name)?;
            require_name("new_name", new_name)?;
            let source = sandbox.resolve(old_name)?;

            if source.is_root() || !source.absolute().exists() {
                return Err(DomainError::NotFound(old_name.to_string()).into());
            }

            let new_name = if file_exists(source.absolute()) {
                ensure_markdown_extension(new_name)
            } else {
                new_name.to_string()
            };

            let target = sandbox.confine(&source.absolute().with_file_name(&new_name))?;

            if target.absolute().exists() {
                return Err(DomainError::AlreadyExists(new_name).into());
            }

            fs::rename(source.absolute(), target.absolute())?;

            info!(
                "Renamed {} -> {}",
                source.display_relative(),
                target.display_relative()
            );

            Ok(RenameResult {
                old_name: old_name.to_string(),
                message: format!("Successfully renamed '{old_name}' to '{new_name}'"),
                new_name,
            })
        },
    )
}

/// Moves an entry to another location inside the sandbox.
///
/// An existing directory as destination receives the source under its own
/// basename; otherwise a file destination gets the `.md` suffix.
pub fn move_file(
    sandbox: &Sandbox,
    source: &str,
    destination: &str,
) -> Result<MoveResult, OperationError> {
    run_operation(
        "move_file",
        || format!("source={source:?}, destination={destination:?}"),
        || {
            require_name("source", source)?;
            require_name("destination", destination)?;
            let from = sandbox.resolve(source)?;

            if from.is_root() || !from.absolute().exists() {
                return Err(DomainError::SourceNotFound(source.to_string()).into());
            }

            let requested = sandbox.resolve(destination)?;
            let to = if directory_exists(requested.absolute()) {
                match from.absolute().file_name() {
                    Some(basename) => sandbox.confine(&requested.absolute().join(basename))?,
                    None => return Err(DomainError::SourceNotFound(source.to_string()).into()),
                }
            } else if file_exists(from.absolute()) {
                sandbox.resolve(&ensure_markdown_extension(destination))?
            } else {
                requested
            };

            if directory_exists(from.absolute()) && to.absolute().starts_with(from.absolute()) {
                return Err(DomainError::MoveIntoSelf(source.to_string()).into());
            }
            if to.absolute().exists() {
                return Err(DomainError::DestinationExists(to.display_relative()).into());
            }

            create_parent_dirs(to.absolute())?;
            move_entry(from.absolute(), to.absolute())?;

            let destination = to.display_relative();
            info!("Moved {} -> {}", from.display_relative(), destination);

            Ok(MoveResult {
                source: source.to_string(),
                message: format!("Successfully moved '{source}' to '{destination}'"),
                destination,
            })
        },
    )
}

/// Duplicates a file, keeping its permissions and timestamps.
pub fn copy_file(
    sandbox: &Sandbox,
    source: &str,
    destination: &str,
) -> Result<CopyResult, OperationError> {
    run_operation(
        "copy_file",
        || format!("source={source:?}, destination={destination:?}"),
        || {
            require_name("source", source)?;
            require_name("destination", destination)?;
            let from = sandbox.resolve(source)?;

            if !from.absolute().exists() {
                return Err(DomainError::SourceNotFound(source.to_string()).into());
            }
            if !file_exists(from.absolute()) {
                return Err(DomainError::NotAFile(source.to_string()).into());
            }

            let destination = ensure_markdown_extension(destination);
            let to = sandbox.resolve(&destination)?;

            if to.absolute().exists() {
                return Err(DomainError::DestinationExists(destination).into());
            }

            create_parent_dirs(to.absolute())?;
            let size = match copy_exclusive(from.absolute(), to.absolute()) {
                Ok(size) => size,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    return Err(DomainError::DestinationExists(destination).into());
                }
                Err(e) => return Err(e.into()),
            };

            info!("Copied {} -> {} ({} bytes)", source, destination, size);

            Ok(CopyResult {
                source: source.to_string(),
                size,
                message: format!("Successfully copied '{source}' to '{destination}'"),
                destination,
            })
        },
    )
}

/// Copies a file to a timestamped sibling `{stem}_backup_{YYYYmmdd_HHMMSS}.md`.
pub fn create_backup(sandbox: &Sandbox, filename: &str) -> Result<BackupResult, OperationError> {
    run_operation("create_backup", || format!("filename={filename:?}"), || {
        require_name("filename", filename)?;
        let filename = ensure_markdown_extension(filename);
        let original = sandbox.resolve(&filename)?;

        if !original.absolute().exists() {
            return Err(DomainError::FileNotFound(filename).into());
        }
        if !file_exists(original.absolute()) {
            return Err(DomainError::NotAFile(filename).into());
        }

        let stem = original
            .absolute()
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let timestamp = backup_timestamp()?;
        let backup = sandbox.confine(
            &original
                .absolute()
                .with_file_name(format!("{stem}_backup_{timestamp}.md")),
        )?;
        let backup_file = backup.display_relative();

        let backup_size = match copy_exclusive(original.absolute(), backup.absolute()) {
            Ok(size) => size,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DomainError::AlreadyExists(backup_file).into());
            }
            Err(e) => return Err(e.into()),
        };

        info!("Backed up {} -> {}", filename, backup_file);

        Ok(BackupResult {
            original_file: filename.clone(),
            backup_size,
            timestamp,
            message: format!("Successfully created backup of '{filename}'"),
            backup_file,
        })
    })
}
