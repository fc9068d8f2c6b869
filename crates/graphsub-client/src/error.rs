use graphsub_frame::RemoteError;

/// Errors that can occur on a client connection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Transport-level send or receive failure.
    #[error("transport error: {0}")]
    Transport(#[from] graphsub_transport::TransportError),

    /// Message encode/decode failure.
    #[error("frame error: {0}")]
    Frame(#[from] graphsub_frame::FrameError),

    /// A payload could not be converted to or from its typed form.
    #[error("payload error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote side violated the protocol (unexpected message kind).
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// The remote side reported an error.
    #[error("remote error: {0}")]
    Remote(RemoteError),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The connection ended before the operation finished.
    #[error("disconnected: {0}")]
    Disconnected(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
