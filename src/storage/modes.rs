//! Enumerated operation parameters

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// How `update_file` combines new content with the existing content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    #[default]
    Replace,
    Append,
    Prepend,
}

impl UpdateMode {
    pub const ALL: [&'static str; 3] = ["replace", "append", "prepend"];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMode::Replace => "replace",
            UpdateMode::Append => "append",
            UpdateMode::Prepend => "prepend",
        }
    }

    /// Combines `existing` and `content`, newline-separated for append/prepend.
    pub fn apply(&self, existing: &str, content: &str) -> String {
        match self {
            UpdateMode::Replace => content.to_string(),
            UpdateMode::Append => format!("{existing}\n{content}"),
            UpdateMode::Prepend => format!("{content}\n{existing}"),
        }
    }
}

impl FromStr for UpdateMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(UpdateMode::Replace),
            "append" => Ok(UpdateMode::Append),
            "prepend" => Ok(UpdateMode::Prepend),
            other => Err(DomainError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `search_files` matches the query against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    #[default]
    Content,
    Filename,
}

impl SearchType {
    pub const ALL: [&'static str; 2] = ["content", "filename"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Content => "content",
            SearchType::Filename => "filename",
        }
    }
}

impl FromStr for SearchType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "content" => Ok(SearchType::Content),
            "filename" => Ok(SearchType::Filename),
            other => Err(DomainError::InvalidSearchType(other.to_string())),
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_and_prepend_insert_a_newline() {
        assert_eq!(UpdateMode::Append.apply("C", "X"), "C\nX");
        assert_eq!(UpdateMode::Prepend.apply("C", "X"), "X\nC");
        assert_eq!(UpdateMode::Replace.apply("C", "X"), "X");
    }

    #[test]
    fn unknown_values_name_the_bad_input() {
        assert_eq!(
            "overwrite".parse::<UpdateMode>(),
            Err(DomainError::InvalidMode("overwrite".into()))
        );
        assert_eq!(
            "regex".parse::<SearchType>(),
            Err(DomainError::InvalidSearchType("regex".into()))
        );
    }
}
