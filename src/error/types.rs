//! Error types
//!
//! Defines domain-specific error types for each layer of docbox.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a path argument was refused by the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityViolation {
    NulByte,
    AbsolutePath,
    DrivePrefix,
    ParentTraversal,
    SymlinkEscape,
    OutsideRoot,
    Unresolvable(String),
}

impl std::fmt::Display for SecurityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityViolation::NulByte => write!(f, "contains a NUL byte"),
            SecurityViolation::AbsolutePath => write!(f, "is an absolute path"),
            SecurityViolation::DrivePrefix => write!(f, "carries a drive or UNC prefix"),
            SecurityViolation::ParentTraversal => write!(f, "climbs above the documents folder"),
            SecurityViolation::SymlinkEscape => write!(f, "follows a link outside the documents folder"),
            SecurityViolation::OutsideRoot => write!(f, "is outside the documents folder"),
            SecurityViolation::Unresolvable(reason) => write!(f, "cannot be resolved ({})", reason),
        }
    }
}

/// A path argument failed sandbox confinement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Access denied: path '{input}' {violation}")]
pub struct SecurityError {
    pub input: String,
    pub violation: SecurityViolation,
}

impl SecurityError {
    pub fn new(input: &str, violation: SecurityViolation) -> Self {
        Self {
            input: input.to_string(),
            violation,
        }
    }
}

/// Expected, recoverable failures of a file operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("File '{0}' does not exist")]
    FileNotFound(String),
    #[error("Directory '{0}' does not exist")]
    DirectoryNotFound(String),
    #[error("'{0}' does not exist")]
    NotFound(String),
    #[error("Source '{0}' does not exist")]
    SourceNotFound(String),
    #[error("'{0}' is not a file")]
    NotAFile(String),
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("File '{0}' already exists")]
    FileAlreadyExists(String),
    #[error("Directory '{0}' already exists")]
    DirectoryAlreadyExists(String),
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("Destination '{0}' already exists")]
    DestinationExists(String),
    #[error("Cannot move '{0}' into itself")]
    MoveIntoSelf(String),
    #[error("Invalid mode '{0}'. Use 'replace', 'append', or 'prepend'")]
    InvalidMode(String),
    #[error("Invalid search_type '{0}'. Use 'content' or 'filename'")]
    InvalidSearchType(String),
    #[error("{argument} must be between {min} and {max} (got {value})")]
    OutOfRange {
        argument: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("{0} cannot be empty")]
    EmptyName(&'static str),
    #[error("Missing required argument '{0}'")]
    MissingArgument(&'static str),
    #[error("Argument '{argument}' must be {expected}")]
    InvalidArgument {
        argument: &'static str,
        expected: &'static str,
    },
    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
}

/// Everything a file operation can fail with.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Security(#[from] SecurityError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// Raw I/O failure before the operation boundary has tagged it.
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{operation} failed ({arguments}): {source}")]
    Unexpected {
        operation: &'static str,
        arguments: String,
        #[source]
        source: io::Error,
    },
}

impl OperationError {
    /// Tags an untagged I/O failure with the operation and arguments that caused it.
    pub fn in_operation(self, operation: &'static str, arguments: impl FnOnce() -> String) -> Self {
        match self {
            OperationError::Io(source) => OperationError::Unexpected {
                operation,
                arguments: arguments(),
                source,
            },
            other => other,
        }
    }

    pub fn is_security(&self) -> bool {
        matches!(self, OperationError::Security(_))
    }
}

/// Failures while establishing the sandbox root.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Cannot prepare sandbox root {root}: {source}")]
    RootUnavailable {
        root: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Sandbox root {0} is not a directory")]
    RootNotADirectory(PathBuf),
}

/// Startup failures of the server binary.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Sandbox(#[from] SandboxError),
    #[error("Failed to bind to {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
