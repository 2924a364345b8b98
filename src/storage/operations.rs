//! Storage operations
//!
//! The essential file operations: list, read, create, update and delete.

use log::info;
use std::fs;
use std::io;

use crate::error::{DomainError, OperationError};
use crate::sandbox::{Sandbox, ensure_markdown_extension, is_markdown, require_name};
use crate::storage::filesystem::{
    create_parent_dirs, directory_exists, file_exists, run_operation, with_retries,
    write_atomically, write_new_file,
};
use crate::storage::modes::UpdateMode;
use crate::storage::results::{
    CreateResult, DeleteResult, FileEntry, FolderEntry, ListResult, ReadResult, UpdateResult,
};

/// Lists the immediate children of a directory, split into files and folders.
///
/// Entries are sorted by name. Symlinks are left out of the listing.
pub fn list_directory(sandbox: &Sandbox, path: &str) -> Result<ListResult, OperationError> {
    run_operation("list_directory", || format!("path={path:?}"), || {
        let target = sandbox.resolve(path)?;
        let real_path = target.absolute();

        if !real_path.exists() {
            return Err(DomainError::DirectoryNotFound(path.to_string()).into());
        }
        if !directory_exists(real_path) {
            return Err(DomainError::NotADirectory(path.to_string()).into());
        }

        let mut entries = with_retries(|| fs::read_dir(real_path))?
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut files = Vec::new();
        let mut folders = Vec::new();

        for entry in entries {
            let file_type = entry.file_type()?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let relative = sandbox.relative_display(&entry.path());

            if file_type.is_file() {
                files.push(FileEntry {
                    is_markdown: is_markdown(&name),
                    size: entry.metadata()?.len(),
                    name,
                    path: relative,
                });
            } else if file_type.is_dir() {
                folders.push(FolderEntry {
                    name,
                    path: relative,
                });
            }
        }

        info!(
            "Listed directory {} (real: {}) - {} files, {} folders",
            path,
            real_path.display(),
            files.len(),
            folders.len()
        );

        Ok(ListResult {
            current_path: path.to_string(),
            total_files: files.len(),
            total_folders: folders.len(),
            files,
            folders,
        })
    })
}

/// Reads the full text of a markdown file.
pub fn read_file(sandbox: &Sandbox, filename: &str) -> Result<ReadResult, OperationError> {
    run_operation("read_file", || format!("filename={filename:?}"), || {
        require_name("filename", filename)?;
        let filename = ensure_markdown_extension(filename);
        let target = sandbox.resolve(&filename)?;
        let file_path = target.absolute();

        if !file_path.exists() {
            return Err(DomainError::FileNotFound(filename).into());
        }
        if !file_exists(file_path) {
            return Err(DomainError::NotAFile(filename).into());
        }

        let content = fs::read_to_string(file_path)?;

        info!("Read file {} ({} bytes)", filename, content.len());

        Ok(ReadResult {
            size: content.len(),
            lines: content.lines().count(),
            filename,
            content,
        })
    })
}

/// Creates a new markdown file, creating missing parent directories.
pub fn create_file(
    sandbox: &Sandbox,
    filename: &str,
    content: &str,
) -> Result<CreateResult, OperationError> {
    run_operation("create_file", || format!("filename={filename:?}"), || {
        require_name("filename", filename)?;
        let filename = ensure_markdown_extension(filename);
        let target = sandbox.resolve(&filename)?;
        let file_path = target.absolute();

        if file_path.exists() {
            return Err(DomainError::FileAlreadyExists(filename).into());
        }

        create_parent_dirs(file_path)?;
        match write_new_file(file_path, content) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(DomainError::FileAlreadyExists(filename).into());
            }
            Err(e) => return Err(e.into()),
        }

        info!("Created file {} (real: {})", filename, file_path.display());

        Ok(CreateResult {
            content_length: content.len(),
            message: format!("Successfully created '{filename}'"),
            filename,
        })
    })
}

/// Replaces, appends to or prepends to the content of an existing file.
pub fn update_file(
    sandbox: &Sandbox,
    filename: &str,
    content: &str,
    mode: UpdateMode,
) -> Result<UpdateResult, OperationError> {
    run_operation(
        "update_file",
        || format!("filename={filename:?}, mode={mode}"),
        || {
            require_name("filename", filename)?;
            let filename = ensure_markdown_extension(filename);
            let target = sandbox.resolve(&filename)?;
            let file_path = target.absolute();

            if !file_path.exists() {
                return Err(DomainError::FileNotFound(filename).into());
            }
            if !file_exists(file_path) {
                return Err(DomainError::NotAFile(filename).into());
            }

            let new_content = match mode {
                UpdateMode::Replace => content.to_string(),
                UpdateMode::Append | UpdateMode::Prepend => {
                    let existing = fs::read_to_string(file_path)?;
                    mode.apply(&existing, content)
                }
            };

            write_atomically(file_path, &new_content)?;

            info!("Updated file {} using {} mode", filename, mode);

            Ok(UpdateResult {
                mode,
                new_content_length: new_content.len(),
                message: format!("Successfully updated '{filename}' using {mode} mode"),
                filename,
            })
        },
    )
}

/// Deletes a markdown file and reports its size beforehand.
pub fn delete_file(sandbox: &Sandbox, filename: &str) -> Result<DeleteResult, OperationError> {
    run_operation("delete_file", || format!("filename={filename:?}"), || {
        require_name("filename", filename)?;
        let filename = ensure_markdown_extension(filename);
        let target = sandbox.resolve(&filename)?;
        let file_path = target.absolute();

        if !file_path.exists() {
            return Err(DomainError::FileNotFound(filename).into());
        }
        if !file_exists(file_path) {
            return Err(DomainError::NotAFile(filename).into());
        }

        let deleted_size = fs::metadata(file_path)?.len();
        with_retries(|| fs::remove_file(file_path))?;

        info!(
            "Deleted file {} (real: {}, {} bytes)",
            filename,
            file_path.display(),
            deleted_size
        );

        Ok(DeleteResult {
            deleted_size,
            message: format!("Successfully deleted '{filename}'"),
            filename,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing_splits_files_and_folders() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        fs::write(dir.path().join("b.md"), "bb").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let listing = list_directory(&sandbox, ".").unwrap();

        assert_eq!(listing.total_files, 2);
        assert_eq!(listing.total_folders, 1);
        assert_eq!(listing.files[0].name, "a.txt");
        assert!(!listing.files[0].is_markdown);
        assert_eq!(listing.files[1].path, "b.md");
        assert_eq!(listing.files[1].size, 2);
        assert!(listing.files[1].is_markdown);
        assert_eq!(listing.folders[0].path, "sub");
    }

    #[test]
    fn listing_a_file_is_refused() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        fs::write(dir.path().join("a.md"), "").unwrap();

        let err = list_directory(&sandbox, "a.md").unwrap_err();
        assert_eq!(err.to_string(), "'a.md' is not a directory");
    }

    #[test]
    fn update_of_a_directory_is_refused() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        fs::create_dir(dir.path().join("folder.md")).unwrap();

        let err = update_file(&sandbox, "folder", "x", UpdateMode::Replace).unwrap_err();
        assert!(matches!(
            err,
            OperationError::Domain(DomainError::NotAFile(ref name)) if name == "folder.md"
        ));
    }

    #[test]
    fn empty_filename_is_a_domain_error() {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();

        let err = read_file(&sandbox, "").unwrap_err();
        assert!(matches!(err, OperationError::Domain(DomainError::EmptyName("filename"))));
    }
}
