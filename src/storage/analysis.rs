//! File analysis
//!
//! Size, timestamps and markdown structure counts for a single file.

use log::info;
use std::fs;

use crate::error::{DomainError, OperationError};
use crate::sandbox::{Sandbox, ensure_markdown_extension, require_name};
use crate::storage::filesystem::{file_exists, format_system_time, run_operation};
use crate::storage::results::FileInfoResult;

/// Structural counts of a markdown document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkdownStats {
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
    pub headers: usize,
    pub links: usize,
    pub code_blocks: usize,
    pub is_empty: bool,
}

impl MarkdownStats {
    pub fn of(content: &str) -> Self {
        let lines: Vec<&str> = content.lines().collect();
        Self {
            lines: lines.len(),
            words: content.split_whitespace().count(),
            characters: content.chars().count(),
            headers: lines
                .iter()
                .filter(|line| line.trim().starts_with('#'))
                .count(),
            links: lines
                .iter()
                .filter(|line| line.contains('[') && line.contains("]("))
                .count(),
            // fences come in pairs
            code_blocks: content.matches("```").count() / 2,
            is_empty: content.trim().is_empty(),
        }
    }
}

/// Reports size, timestamps and markdown structure of a file.
pub fn get_file_info(sandbox: &Sandbox, filename: &str) -> Result<FileInfoResult, OperationError> {
    run_operation("get_file_info", || format!("filename={filename:?}"), || {
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

        let metadata = fs::metadata(file_path)?;
        let content = fs::read_to_string(file_path)?;
        let stats = MarkdownStats::of(&content);

        info!("Analyzed {} ({} lines)", filename, stats.lines);

        Ok(FileInfoResult {
            filename,
            size_bytes: metadata.len(),
            created: metadata.created().ok().map(format_system_time),
            modified: format_system_time(metadata.modified()?),
            lines: stats.lines,
            words: stats.words,
            characters: stats.characters,
            headers: stats.headers,
            links: stats.links,
            code_blocks: stats.code_blocks,
            is_empty: stats.is_empty,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_markdown_structure() {
        let content = "# Title\n\nSee [docs](http://x).\n\n```rust\nfn main() {}\n```\n## Next\n";
        let stats = MarkdownStats::of(content);

        assert_eq!(stats.lines, 8);
        assert_eq!(stats.headers, 2);
        assert_eq!(stats.links, 1);
        assert_eq!(stats.code_blocks, 1);
        assert_eq!(stats.words, 11);
        assert!(!stats.is_empty);
    }

    #[test]
    fn blank_content_is_empty() {
        let stats = MarkdownStats::of("  \n\n");
        assert!(stats.is_empty);
        assert_eq!(stats.words, 0);
        assert_eq!(stats.code_blocks, 0);
    }

    #[test]
    fn lone_carriage_returns_do_not_split_lines() {
        let stats = MarkdownStats::of("a\rb\r\nc\n");
        assert_eq!(stats.lines, 2);
    }

    #[test]
    fn characters_count_scalar_values() {
        assert_eq!(MarkdownStats::of("héllo").characters, 5);
    }
}
