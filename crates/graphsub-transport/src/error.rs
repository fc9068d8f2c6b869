/// Errors that can occur on the wire transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying connection.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has been closed and can carry no further messages.
    #[error("transport closed: {0}")]
    Closed(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;
