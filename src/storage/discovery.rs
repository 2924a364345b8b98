//! Discovery operations
//!
//! Recursive scans over the markdown files of a sandbox: text search and
//! recently modified files.

use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use crate::error::{DomainError, OperationError};
use crate::sandbox::{Sandbox, is_markdown};
use crate::storage::filesystem::{format_system_time, run_operation};
use crate::storage::modes::SearchType;
use crate::storage::results::{LineMatch, RecentFile, RecentFilesResult, SearchHit, SearchResult};

/// Matching lines reported per file by a content search.
pub const MAX_LINE_MATCHES: usize = 5;

pub const DAYS_RANGE: (i64, i64) = (1, 365);
pub const LIMIT_RANGE: (i64, i64) = (1, 100);
pub const DEFAULT_DAYS: i64 = 7;
pub const DEFAULT_LIMIT: i64 = 10;

const SECONDS_PER_DAY: u64 = 86_400;

/// Every markdown file under the sandbox root, in file-name order.
///
/// Symlinks are not followed, so a scan never leaves the sandbox.
pub fn markdown_files(sandbox: &Sandbox) -> Vec<PathBuf> {
    WalkDir::new(sandbox.root())
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry during scan: {}", e);
                None
            }
        })
        .filter(|entry| {
            entry.file_type().is_file() && is_markdown(&entry.file_name().to_string_lossy())
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Searches markdown files by name or content, case-insensitively.
///
/// Content hits carry up to [`MAX_LINE_MATCHES`] matching lines with 1-based
/// line numbers. Files that cannot be read as UTF-8 are skipped.
pub fn search_files(
    sandbox: &Sandbox,
    query: &str,
    search_type: SearchType,
) -> Result<SearchResult, OperationError> {
    run_operation(
        "search_files",
        || format!("query={query:?}, search_type={search_type}"),
        || {
            let needle = query.to_lowercase();
            let files = markdown_files(sandbox);
            let mut results = Vec::new();

            for path in &files {
                let file = sandbox.relative_display(path);

                match search_type {
                    SearchType::Filename => {
                        let name = path
                            .file_name()
                            .map(|name| name.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        if name.to_lowercase().contains(&needle) {
                            results.push(SearchHit::Filename {
                                file,
                                match_text: name,
                            });
                        }
                    }
                    SearchType::Content => {
                        let content = match fs::read_to_string(path) {
                            Ok(content) => content,
                            Err(e) => {
                                debug!("Skipping {} during search: {}", file, e);
                                continue;
                            }
                        };
                        if !content.to_lowercase().contains(&needle) {
                            continue;
                        }
                        let matches = content
                            .lines()
                            .enumerate()
                            .filter(|(_, line)| line.to_lowercase().contains(&needle))
                            .take(MAX_LINE_MATCHES)
                            .map(|(index, line)| LineMatch {
                                line_number: index + 1,
                                line_content: line.trim().to_string(),
                            })
                            .collect();
                        results.push(SearchHit::Content { file, matches });
                    }
                }
            }

            info!(
                "Search for {:?} ({}) matched {} of {} files",
                query,
                search_type,
                results.len(),
                files.len()
            );

            Ok(SearchResult {
                query: query.to_string(),
                search_type,
                total_matches: results.len(),
                total_files_searched: files.len(),
                results,
            })
        },
    )
}

/// Lists markdown files modified within the last `days` days, newest first.
pub fn list_recent_files(
    sandbox: &Sandbox,
    days: i64,
    limit: i64,
) -> Result<RecentFilesResult, OperationError> {
    run_operation(
        "list_recent_files",
        || format!("days={days}, limit={limit}"),
        || {
            check_range("days", days, DAYS_RANGE)?;
            check_range("limit", limit, LIMIT_RANGE)?;
            let days = days as u32;
            let limit = limit as usize;

            let now = SystemTime::now();
            let window = Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
            let cutoff = now.checked_sub(window).unwrap_or(SystemTime::UNIX_EPOCH);

            let mut recent = Vec::new();
            for path in markdown_files(sandbox) {
                let metadata = match fs::metadata(&path) {
                    Ok(metadata) => metadata,
                    Err(e) => {
                        debug!("Skipping {} during scan: {}", path.display(), e);
                        continue;
                    }
                };
                let modified = metadata.modified()?;
                if modified >= cutoff {
                    recent.push((modified, sandbox.relative_display(&path), metadata.len()));
                }
            }

            recent.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
            recent.truncate(limit);

            let files: Vec<RecentFile> = recent
                .into_iter()
                .map(|(modified, file, size)| RecentFile {
                    file,
                    modified: format_system_time(modified),
                    size,
                    days_ago: now
                        .duration_since(modified)
                        .map(|age| age.as_secs() / SECONDS_PER_DAY)
                        .unwrap_or(0),
                })
                .collect();

            info!("Found {} files modified in the last {} days", files.len(), days);

            Ok(RecentFilesResult {
                days_back: days,
                limit,
                total_found: files.len(),
                files,
            })
        },
    )
}

fn check_range(argument: &'static str, value: i64, (min, max): (i64, i64)) -> Result<(), DomainError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DomainError::OutOfRange {
            argument,
            value,
            min,
            max,
        })
    }
}
