//! Wire transport abstraction for GraphQL WebSocket clients.
//!
//! This is the lowest layer of graphsub. It defines the two halves of a
//! connected transport — [`WireSink`] for writing and [`WireSource`] for
//! reading — and nothing else. Connection establishment (URL, TLS, headers)
//! belongs to the transport implementation, not to this crate.

pub mod error;
pub mod traits;

pub use error::{Result, TransportError};
pub use traits::{WireSink, WireSource};
