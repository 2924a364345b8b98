//! Registry function names

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Grouping used when presenting the operations to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Essential,
    Intermediate,
    Advanced,
}

/// The thirteen callable operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    ListDirectory,
    ReadFile,
    CreateFile,
    UpdateFile,
    DeleteFile,
    CreateDirectory,
    RenameFile,
    MoveFile,
    SearchFiles,
    CopyFile,
    GetFileInfo,
    CreateBackup,
    ListRecentFiles,
}

impl FunctionName {
    pub const ALL: [FunctionName; 13] = [
        FunctionName::ListDirectory,
        FunctionName::ReadFile,
        FunctionName::CreateFile,
        FunctionName::UpdateFile,
        FunctionName::DeleteFile,
        FunctionName::CreateDirectory,
        FunctionName::RenameFile,
        FunctionName::MoveFile,
        FunctionName::SearchFiles,
        FunctionName::CopyFile,
        FunctionName::GetFileInfo,
        FunctionName::CreateBackup,
        FunctionName::ListRecentFiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionName::ListDirectory => "list_directory",
            FunctionName::ReadFile => "read_file",
            FunctionName::CreateFile => "create_file",
            FunctionName::UpdateFile => "update_file",
            FunctionName::DeleteFile => "delete_file",
            FunctionName::CreateDirectory => "create_directory",
            FunctionName::RenameFile => "rename_file",
            FunctionName::MoveFile => "move_file",
            FunctionName::SearchFiles => "search_files",
            FunctionName::CopyFile => "copy_file",
            FunctionName::GetFileInfo => "get_file_info",
            FunctionName::CreateBackup => "create_backup",
            FunctionName::ListRecentFiles => "list_recent_files",
        }
    }

    pub fn category(&self) -> Category {
        match self {
            FunctionName::ListDirectory
            | FunctionName::ReadFile
            | FunctionName::CreateFile
            | FunctionName::UpdateFile
            | FunctionName::DeleteFile => Category::Essential,
            FunctionName::CreateDirectory | FunctionName::RenameFile | FunctionName::MoveFile => {
                Category::Intermediate
            }
            FunctionName::SearchFiles
            | FunctionName::CopyFile
            | FunctionName::GetFileInfo
            | FunctionName::CreateBackup
            | FunctionName::ListRecentFiles => Category::Advanced,
        }
    }

    /// Whether the operation changes the sandbox contents.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            FunctionName::ListDirectory
                | FunctionName::ReadFile
                | FunctionName::SearchFiles
                | FunctionName::GetFileInfo
                | FunctionName::ListRecentFiles
        )
    }
}

impl FromStr for FunctionName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DomainError::UnknownFunction(s.to_string()))
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
