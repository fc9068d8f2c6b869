//! Message envelope and JSON codec for the GraphQL WebSocket protocol.
//!
//! Every message on the wire is a JSON record with a `type`, an optional
//! operation `id`, and an opaque `payload`. Connection-scoped kinds
//! (handshake, keep-alive, terminate) carry no id; operation-scoped kinds
//! (`start`, `stop`, `data`, `error`, `complete`) always do. This crate is
//! pure data — routing and lifecycle live in `graphsub-client`.

pub mod codec;
pub mod error;
pub mod message;
pub mod payload;

pub use codec::{decode, encode};
pub use error::{FrameError, Result};
pub use message::{Message, MessageKind};
pub use payload::{DataPayload, GraphqlError, RemoteError, StartPayload};
