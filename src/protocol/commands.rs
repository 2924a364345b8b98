//! Module `commands`
//!
//! Request and response frames exchanged with a client, one JSON document
//! per line.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A request parsed from one client line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    /// Invoke a registered operation
    Call {
        #[serde(default)]
        id: Option<Value>,
        name: String,
        #[serde(default)]
        arguments: Map<String, Value>,
    },
    /// Parameter schemas of all operations
    Schemas {
        #[serde(default)]
        id: Option<Value>,
    },
    /// Operation names grouped by category
    Catalog {
        #[serde(default)]
        id: Option<Value>,
    },
    /// Close the connection
    Quit {
        #[serde(default)]
        id: Option<Value>,
    },
}

impl Request {
    pub fn id(&self) -> Option<&Value> {
        match self {
            Request::Call { id, .. }
            | Request::Schemas { id }
            | Request::Catalog { id }
            | Request::Quit { id } => id.as_ref(),
        }
    }
}

/// One response line: the echoed request id and its result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<Value>,
    pub result: Value,
}

impl Response {
    pub fn new(id: Option<Value>, result: Value) -> Self {
        Self { id, result }
    }
}

/// Parses a raw request line received from a client.
pub fn parse_request(raw: &str) -> Result<Request, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("Empty request".to_string());
    }
    serde_json::from_str(trimmed).map_err(|e| format!("Malformed request: {e}"))
}

/// Serializes a response as a single newline-terminated line.
pub fn encode_response(response: &Response) -> String {
    let mut line = serde_json::to_string(response).unwrap_or_else(|e| {
        format!(r#"{{"id":null,"result":{{"status":"error","error":"Failed to encode response: {e}"}}}}"#)
    });
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_a_call_with_defaults() {
        let request = parse_request(r#"{"type":"call","name":"list_directory"}"#).unwrap();
        assert_eq!(
            request,
            Request::Call {
                id: None,
                name: "list_directory".into(),
                arguments: Map::new(),
            }
        );
    }

    #[test]
    fn keeps_the_request_id() {
        let request =
            parse_request(r#"{"type":"call","id":7,"name":"read_file","arguments":{"filename":"a"}}"#)
                .unwrap();
        assert_eq!(request.id(), Some(&json!(7)));
    }

    #[test]
    fn rejects_garbage_and_unknown_types() {
        assert!(parse_request("not json").unwrap_err().starts_with("Malformed request"));
        assert!(parse_request(r#"{"type":"shell","cmd":"ls"}"#).is_err());
        assert_eq!(parse_request("   ").unwrap_err(), "Empty request");
    }

    #[test]
    fn responses_are_single_lines() {
        let line = encode_response(&Response::new(
            Some(json!("a")),
            json!({"status": "success", "content": "x\ny"}),
        ));
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
    }
}
