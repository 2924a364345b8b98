//! Request handlers for docbox.
//!
//! Routes parsed requests to the registry. Operations run on the blocking
//! pool; mutating calls are serialized through a single-writer gate so the
//! existence checks and the writes of two calls never interleave.

use log::error;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task;

use crate::protocol::commands::{Request, Response};
use crate::registry::{self, FunctionName, OperationOutcome};
use crate::sandbox::Sandbox;

/// Whether the connection continues after a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Continue,
    CloseConnection,
}

/// Struct encapsulating the full result of a request.
#[derive(Debug, Clone)]
pub struct RequestResult {
    pub status: RequestStatus,
    pub response: Response,
    /// Registry name of the call, for logging.
    pub call: Option<String>,
    pub outcome: Option<OperationOutcome>,
}

/// Routes requests for one sandbox. Cheap to share between connections.
#[derive(Debug)]
pub struct Dispatcher {
    sandbox: Arc<Sandbox>,
    write_gate: Mutex<()>,
}

impl Dispatcher {
    pub fn new(sandbox: Arc<Sandbox>) -> Self {
        Self {
            sandbox,
            write_gate: Mutex::new(()),
        }
    }

    pub fn sandbox(&self) -> &Sandbox {
        &self.sandbox
    }

    /// Dispatches a received request to its handler.
    pub async fn handle(&self, request: Request) -> RequestResult {
        match request {
            Request::Call {
                id,
                name,
                arguments,
            } => {
                let outcome = self.call(&name, arguments).await;
                RequestResult {
                    status: RequestStatus::Continue,
                    response: Response::new(id, outcome.to_value()),
                    call: Some(name),
                    outcome: Some(outcome),
                }
            }
            Request::Schemas { id } => continue_with(
                id,
                json!({ "status": "success", "functions": registry::function_schemas() }),
            ),
            Request::Catalog { id } => {
                let catalog = serde_json::to_value(registry::catalog())
                    .map(with_success)
                    .unwrap_or_else(|e| {
                        OperationOutcome::error(format!("Failed to encode catalog: {e}")).to_value()
                    });
                continue_with(id, catalog)
            }
            Request::Quit { id } => RequestResult {
                status: RequestStatus::CloseConnection,
                response: Response::new(id, json!({ "status": "success", "message": "Goodbye" })),
                call: None,
                outcome: None,
            },
        }
    }

    /// Invokes a registry operation by name.
    pub async fn call(&self, name: &str, arguments: Map<String, Value>) -> OperationOutcome {
        let function = match name.parse::<FunctionName>() {
            Ok(function) => function,
            Err(e) => return OperationOutcome::from(e),
        };

        let _writer = if function.is_mutating() {
            Some(self.write_gate.lock().await)
        } else {
            None
        };

        let sandbox = Arc::clone(&self.sandbox);
        match task::spawn_blocking(move || registry::dispatch(&sandbox, function, &arguments)).await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("{} did not complete: {}", function, e);
                OperationOutcome::error(format!("{function} did not complete: {e}"))
            }
        }
    }
}

/// An error response for a line that never became a request.
pub fn rejected(message: impl Into<String>) -> Response {
    Response::new(None, OperationOutcome::error(message).to_value())
}

fn continue_with(id: Option<Value>, result: Value) -> RequestResult {
    RequestResult {
        status: RequestStatus::Continue,
        response: Response::new(id, result),
        call: None,
        outcome: None,
    }
}

fn with_success(fields: Value) -> Value {
    match fields {
        Value::Object(mut map) => {
            map.insert("status".to_string(), json!("success"));
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn dispatcher() -> (tempfile::TempDir, Dispatcher) {
        let dir = tempdir().unwrap();
        let sandbox = Sandbox::open(dir.path()).unwrap();
        (dir, Dispatcher::new(Arc::new(sandbox)))
    }

    #[tokio::test]
    async fn call_runs_the_named_operation() {
        let (dir, dispatcher) = dispatcher();
        let mut arguments = Map::new();
        arguments.insert("filename".into(), json!("notes"));
        arguments.insert("content".into(), json!("hello"));

        let outcome = dispatcher.call("create_file", arguments).await;

        assert!(outcome.is_success());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.md")).unwrap(),
            "hello"
        );
    }

    #[tokio::test]
    async fn unknown_functions_are_errors() {
        let (_dir, dispatcher) = dispatcher();
        let outcome = dispatcher.call("rm_rf", Map::new()).await;
        assert_eq!(outcome.error_message(), Some("Unknown function 'rm_rf'"));
    }

    #[tokio::test]
    async fn quit_closes_the_connection() {
        let (_dir, dispatcher) = dispatcher();
        let result = dispatcher.handle(Request::Quit { id: Some(json!(1)) }).await;
        assert_eq!(result.status, RequestStatus::CloseConnection);
        assert_eq!(result.response.id, Some(json!(1)));
    }

    #[tokio::test]
    async fn catalog_is_a_success() {
        let (_dir, dispatcher) = dispatcher();
        let result = dispatcher.handle(Request::Catalog { id: None }).await;
        assert_eq!(result.response.result["status"], "success");
        assert_eq!(result.response.result["total_functions"], 13);
    }
}
