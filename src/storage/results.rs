//! Storage result types
//!
//! Defines result structures returned by storage operations. Each serializes to
//! the success fields of an operation outcome.

use serde::Serialize;

use crate::storage::modes::{SearchType, UpdateMode};

/// A file entry in a directory listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub is_markdown: bool,
}

/// A folder entry in a directory listing
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub path: String,
}

/// Result of a directory listing operation
#[derive(Debug, Clone, Serialize)]
pub struct ListResult {
    pub current_path: String,
    pub files: Vec<FileEntry>,
    pub folders: Vec<FolderEntry>,
    pub total_files: usize,
    pub total_folders: usize,
}

/// Result of a file read operation
#[derive(Debug, Clone, Serialize)]
pub struct ReadResult {
    pub filename: String,
    pub content: String,
    pub size: usize,
    pub lines: usize,
}

/// Result of a file creation operation
#[derive(Debug, Clone, Serialize)]
pub struct CreateResult {
    pub filename: String,
    pub content_length: usize,
    pub message: String,
}

/// Result of a file update operation
#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    pub filename: String,
    pub mode: UpdateMode,
    pub new_content_length: usize,
    pub message: String,
}

/// Result of a file deletion operation
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResult {
    pub filename: String,
    pub deleted_size: u64,
    pub message: String,
}

/// Result of a directory creation operation
#[derive(Debug, Clone, Serialize)]
pub struct CreateDirectoryResult {
    pub dirname: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenameResult {
    pub old_name: String,
    pub new_name: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveResult {
    pub source: String,
    pub destination: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CopyResult {
    pub source: String,
    pub destination: String,
    pub size: u64,
    pub message: String,
}

/// One matching line of a content search
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LineMatch {
    pub line_number: usize,
    pub line_content: String,
}

/// A file that matched a search
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "match_type", rename_all = "snake_case")]
pub enum SearchHit {
    Filename { file: String, match_text: String },
    Content { file: String, matches: Vec<LineMatch> },
}

impl SearchHit {
    pub fn file(&self) -> &str {
        match self {
            SearchHit::Filename { file, .. } | SearchHit::Content { file, .. } => file,
        }
    }
}

/// Result of a search operation
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub search_type: SearchType,
    pub results: Vec<SearchHit>,
    pub total_matches: usize,
    pub total_files_searched: usize,
}

/// Size, timestamps and markdown structure of a file
#[derive(Debug, Clone, Serialize)]
pub struct FileInfoResult {
    pub filename: String,
    pub size_bytes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub modified: String,
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
    pub headers: usize,
    pub links: usize,
    pub code_blocks: usize,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupResult {
    pub original_file: String,
    pub backup_file: String,
    pub backup_size: u64,
    pub timestamp: String,
    pub message: String,
}

/// A recently modified file
#[derive(Debug, Clone, Serialize)]
pub struct RecentFile {
    pub file: String,
    pub modified: String,
    pub size: u64,
    pub days_ago: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentFilesResult {
    pub days_back: u32,
    pub limit: usize,
    pub total_found: usize,
    pub files: Vec<RecentFile>,
}
