//! Uniform operation outcome
//!
//! The tagged value every registry call returns, serialized as a flat JSON
//! object with a `status` key.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{OperationError, Status, error_status};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    Success(Map<String, Value>),
    Error { error: String },
    SecurityError { error: String },
}

impl OperationOutcome {
    /// Converts an operation result into an outcome, flattening the success
    /// payload's fields next to `status`.
    pub fn from_result<T: Serialize>(result: Result<T, OperationError>) -> Self {
        match result {
            Ok(payload) => match serde_json::to_value(payload) {
                Ok(Value::Object(fields)) => OperationOutcome::Success(fields),
                Ok(other) => OperationOutcome::error(format!(
                    "Operation produced a non-object result: {other}"
                )),
                Err(e) => OperationOutcome::error(format!("Failed to encode result: {e}")),
            },
            Err(err) => Self::from_error(&err),
        }
    }

    pub fn from_error(err: &OperationError) -> Self {
        match error_status(err) {
            Status::SecurityError => OperationOutcome::SecurityError {
                error: err.to_string(),
            },
            _ => OperationOutcome::error(err.to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        OperationOutcome::Error {
            error: message.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            OperationOutcome::Success(_) => Status::Success,
            OperationOutcome::Error { .. } => Status::Error,
            OperationOutcome::SecurityError { .. } => Status::SecurityError,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OperationOutcome::Success(_))
    }

    /// A success field, if this is a success carrying it.
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            OperationOutcome::Success(fields) => fields.get(key),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            OperationOutcome::Success(_) => None,
            OperationOutcome::Error { error } | OperationOutcome::SecurityError { error } => {
                Some(error)
            }
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "status": "error", "error": format!("Failed to encode outcome: {e}") })
        })
    }
}
