//! Function registry
//!
//! Maps operation names and flat JSON arguments onto the storage operations
//! and turns every result into an [`OperationOutcome`].

pub mod arguments;
pub mod functions;
pub mod outcome;
pub mod schemas;

pub use arguments::Arguments;
pub use functions::{Category, FunctionName};
pub use outcome::OperationOutcome;
pub use schemas::{Catalog, catalog, function_schemas};

use log::{debug, warn};
use serde_json::{Map, Value};

use crate::error::{DomainError, OperationError};
use crate::sandbox::Sandbox;
use crate::storage::discovery::{DEFAULT_DAYS, DEFAULT_LIMIT};
use crate::storage::{self, SearchType, UpdateMode};

/// Looks up `name` and invokes it with `arguments`.
pub fn call(sandbox: &Sandbox, name: &str, arguments: &Map<String, Value>) -> OperationOutcome {
    match name.parse::<FunctionName>() {
        Ok(function) => dispatch(sandbox, function, arguments),
        Err(e) => {
            warn!("Call to unknown function {:?}", name);
            OperationOutcome::from(e)
        }
    }
}

/// Invokes a registered operation with arguments taken from a JSON object.
pub fn dispatch(
    sandbox: &Sandbox,
    function: FunctionName,
    arguments: &Map<String, Value>,
) -> OperationOutcome {
    debug!("Dispatching {} with {} arguments", function, arguments.len());
    let args = Arguments::new(arguments);

    let outcome = match function {
        FunctionName::ListDirectory => run(|| {
            storage::list_directory(sandbox, args.optional_str("path", ".")?)
        }),
        FunctionName::ReadFile => run(|| storage::read_file(sandbox, args.required_str("filename")?)),
        FunctionName::CreateFile => run(|| {
            storage::create_file(
                sandbox,
                args.required_str("filename")?,
                args.optional_str("content", "")?,
            )
        }),
        FunctionName::UpdateFile => run(|| {
            storage::update_file(
                sandbox,
                args.required_str("filename")?,
                args.required_str("content")?,
                args.optional_enum("mode", UpdateMode::default())?,
            )
        }),
        FunctionName::DeleteFile => {
            run(|| storage::delete_file(sandbox, args.required_str("filename")?))
        }
        FunctionName::CreateDirectory => {
            run(|| storage::create_directory(sandbox, args.required_str("dirname")?))
        }
        FunctionName::RenameFile => run(|| {
            storage::rename_file(
                sandbox,
                args.required_str("old_name")?,
                args.required_str("new_name")?,
            )
        }),
        FunctionName::MoveFile => run(|| {
            storage::move_file(
                sandbox,
                args.required_str("source")?,
                args.required_str("destination")?,
            )
        }),
        FunctionName::SearchFiles => run(|| {
            storage::search_files(
                sandbox,
                args.required_str("query")?,
                args.optional_enum("search_type", SearchType::default())?,
            )
        }),
        FunctionName::CopyFile => run(|| {
            storage::copy_file(
                sandbox,
                args.required_str("source")?,
                args.required_str("destination")?,
            )
        }),
        FunctionName::GetFileInfo => {
            run(|| storage::get_file_info(sandbox, args.required_str("filename")?))
        }
        FunctionName::CreateBackup => {
            run(|| storage::create_backup(sandbox, args.required_str("filename")?))
        }
        FunctionName::ListRecentFiles => run(|| {
            storage::list_recent_files(
                sandbox,
                args.optional_int("days", DEFAULT_DAYS)?,
                args.optional_int("limit", DEFAULT_LIMIT)?,
            )
        }),
    };

    if let Some(message) = outcome.error_message() {
        debug!("{} returned {}: {}", function, outcome.status().as_str(), message);
    }
    outcome
}

/// Argument errors surface before the operation runs; both paths end up as
/// an outcome.
fn run<T, F>(call: F) -> OperationOutcome
where
    T: serde::Serialize,
    F: FnOnce() -> Result<T, OperationError>,
{
    OperationOutcome::from_result(call())
}

impl From<DomainError> for OperationOutcome {
    fn from(err: DomainError) -> Self {
        OperationOutcome::from_error(&OperationError::Domain(err))
    }
}
