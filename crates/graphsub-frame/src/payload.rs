use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for a `start` message: query text, variables, operation name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPayload {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl StartPayload {
    /// Request body for a bare query with no variables.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }

    /// Attach a variables object.
    pub fn with_variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    /// Name the operation to run when the document defines several.
    pub fn with_operation_name(mut self, name: impl Into<String>) -> Self {
        self.operation_name = Some(name.into());
        self
    }
}

/// Result body of a `data` message: result data plus structured errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphqlError>,
}

/// One structured error entry inside a `data` result body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Error description supplied by the remote side in `connection_error` and
/// operation `error` payloads.
///
/// The payload shape is not pinned down by the protocol: servers send a bare
/// string, an object with a `message` field, or anything else. The original
/// value is kept alongside the extracted message.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteError {
    pub message: String,
    pub payload: Option<Value>,
}

impl RemoteError {
    /// Extract a human-readable message from a remote error payload.
    pub fn from_payload(payload: Option<Value>) -> Self {
        let message = match &payload {
            None => "unspecified remote error".to_string(),
            Some(Value::String(message)) => message.clone(),
            Some(value) => value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        };
        Self { message, payload }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RemoteError {}
