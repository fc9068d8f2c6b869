/// Errors that can occur during message encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// A local payload could not be serialized. Nothing was sent.
    #[error("unable to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    /// An inbound wire message was malformed.
    #[error("unable to decode message: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
