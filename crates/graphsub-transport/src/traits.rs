use std::future::Future;

use bytes::Bytes;

use crate::error::Result;

/// Write half of a connected wire transport.
///
/// `send` may be called concurrently from any number of tasks. Implementations
/// must make concurrent writes safe — either the underlying connection already
/// serializes whole messages, or the implementation wraps it in its own lock.
pub trait WireSink: Send + Sync + 'static {
    /// Send one complete wire message.
    fn send(&self, raw: Bytes) -> impl Future<Output = Result<()>> + Send;

    /// Close the transport.
    fn close(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Read half of a connected wire transport.
///
/// `receive` takes `&mut self`: exclusive ownership of the read half is how
/// the single-reader rule is enforced. The handshake borrows the source
/// first, then the reader loop consumes it for the rest of the connection —
/// the transport never has two concurrent readers.
pub trait WireSource: Send + 'static {
    /// Receive the next complete wire message, suspending until one arrives.
    ///
    /// A returned error is permanent: the connection has ended and no further
    /// messages will be delivered.
    fn receive(&mut self) -> impl Future<Output = Result<Bytes>> + Send;
}
