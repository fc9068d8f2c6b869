use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire message kinds.
///
/// Serializes to the exact protocol strings (`connection_init`, `start`,
/// `data`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Client → server. Opens the handshake; payload carries connection
    /// parameters opaque to this layer.
    ConnectionInit,
    /// Server → client. Handshake succeeded.
    ConnectionAck,
    /// Server → client. Handshake failed; payload describes why.
    ConnectionError,
    /// Server → client. Advisory only; consumed silently.
    ConnectionKeepAlive,
    /// Client → server. Announces an intentional close.
    ConnectionTerminate,
    /// Client → server. Begins an operation; payload is the request body.
    Start,
    /// Client → server. Requests cancellation of the named operation.
    Stop,
    /// Server → client. A result for the named operation.
    Data,
    /// Server → client. The named operation failed; terminal.
    Error,
    /// Server → client. No more messages will arrive for the named
    /// operation; terminal.
    Complete,
}

impl MessageKind {
    /// Wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::ConnectionInit => "connection_init",
            MessageKind::ConnectionAck => "connection_ack",
            MessageKind::ConnectionError => "connection_error",
            MessageKind::ConnectionKeepAlive => "connection_keep_alive",
            MessageKind::ConnectionTerminate => "connection_terminate",
            MessageKind::Start => "start",
            MessageKind::Stop => "stop",
            MessageKind::Data => "data",
            MessageKind::Error => "error",
            MessageKind::Complete => "complete",
        }
    }

    /// True for kinds addressed at a single operation (id required on the
    /// wire). Connection-scoped kinds carry no id.
    pub fn is_operation_scoped(self) -> bool {
        matches!(
            self,
            MessageKind::Start
                | MessageKind::Stop
                | MessageKind::Data
                | MessageKind::Error
                | MessageKind::Complete
        )
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The wire envelope: kind, optional operation id, opaque payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Operation id. Empty (and omitted on the wire) for connection-scoped
    /// kinds.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Payload, interpreted per kind. Omitted when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Message {
    /// Handshake opener carrying the connection parameters.
    pub fn connection_init(params: Option<Value>) -> Self {
        Self {
            kind: MessageKind::ConnectionInit,
            id: String::new(),
            payload: params,
        }
    }

    /// Intentional-close announcement.
    pub fn terminate() -> Self {
        Self {
            kind: MessageKind::ConnectionTerminate,
            id: String::new(),
            payload: None,
        }
    }

    /// Begin an operation with the given request body.
    pub fn start(id: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: MessageKind::Start,
            id: id.into(),
            payload: Some(payload),
        }
    }

    /// Request cancellation of the named operation.
    pub fn stop(id: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Stop,
            id: id.into(),
            payload: None,
        }
    }

    /// Handshake acknowledgement (server side; used by tests and mocks).
    pub fn ack() -> Self {
        Self {
            kind: MessageKind::ConnectionAck,
            id: String::new(),
            payload: None,
        }
    }

    /// Handshake rejection (server side).
    pub fn connection_error(payload: Value) -> Self {
        Self {
            kind: MessageKind::ConnectionError,
            id: String::new(),
            payload: Some(payload),
        }
    }

    /// Advisory keep-alive (server side).
    pub fn keep_alive() -> Self {
        Self {
            kind: MessageKind::ConnectionKeepAlive,
            id: String::new(),
            payload: None,
        }
    }

    /// Operation result (server side).
    pub fn data(id: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: MessageKind::Data,
            id: id.into(),
            payload: Some(payload),
        }
    }

    /// Operation failure (server side).
    pub fn error(id: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: MessageKind::Error,
            id: id.into(),
            payload: Some(payload),
        }
    }

    /// Operation end-of-stream (server side).
    pub fn complete(id: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Complete,
            id: id.into(),
            payload: None,
        }
    }

    /// True when no further messages will arrive for this message's
    /// operation (`complete` or `error` with an id).
    pub fn is_terminal(&self) -> bool {
        !self.id.is_empty() && matches!(self.kind, MessageKind::Complete | MessageKind::Error)
    }
}
