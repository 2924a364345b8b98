//! Error handlers
//!
//! Maps errors to result statuses and logs them at the operation boundary.

use log::{error, warn};
use serde::Serialize;

use crate::error::types::OperationError;

/// Status discriminator carried by every operation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Error,
    SecurityError,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Error => "error",
            Status::SecurityError => "security_error",
        }
    }
}

/// Convert an operation error to the status reported to callers
pub fn error_status(err: &OperationError) -> Status {
    match err {
        OperationError::Security(_) => Status::SecurityError,
        OperationError::Domain(_) => Status::Error,
        OperationError::Io(_) => Status::Error,
        OperationError::Unexpected { .. } => Status::Error,
    }
}

/// Log a failed operation at a level matching its severity
pub fn log_failure(operation: &str, err: &OperationError) {
    match err {
        OperationError::Security(e) => warn!("{} rejected: {}", operation, e),
        OperationError::Domain(e) => warn!("{} refused: {}", operation, e),
        OperationError::Io(_) | OperationError::Unexpected { .. } => {
            error!("{} failed: {}", operation, err)
        }
    }
}
