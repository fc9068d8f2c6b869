use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use graphsub_frame::{codec, MessageKind};
use graphsub_transport::WireSource;

use crate::registry::Registry;

/// Background task owning the transport's read half for the connection's
/// lifetime. Decodes inbound messages and routes them to registered
/// operation handlers.
///
/// The loop exits only when the read side fails permanently. At that point
/// every handler is dropped and `closed` is cancelled, so callers waiting on
/// an operation observe the disconnect instead of hanging forever.
pub(crate) async fn run<R: WireSource>(
    mut source: R,
    registry: Arc<Registry>,
    closed: CancellationToken,
) {
    loop {
        let raw = match source.receive().await {
            Ok(raw) => raw,
            Err(err) => {
                debug!(error = %err, "transport read failed, connection ended");
                break;
            }
        };

        // One malformed message must not take down the multiplexer.
        let msg = match codec::decode(&raw) {
            Ok(msg) => msg,
            Err(err) => {
                debug!(error = %err, "dropping undecodable message");
                continue;
            }
        };

        if msg.kind == MessageKind::ConnectionKeepAlive {
            continue;
        }

        let kind = msg.kind;
        if msg.id.is_empty() {
            debug!(%kind, "ignoring connection-scoped message");
            continue;
        }
        let id = msg.id.clone();

        match registry.lookup(&id) {
            Some(handler) => {
                // Handlers run on their own task: a slow callback must never
                // stall dispatch of the next message.
                tokio::spawn(async move { handler(msg) });
            }
            // Expected after an operation completed or was stopped locally.
            None => trace!(%id, %kind, "message for unknown operation"),
        }

        // Unconditional: the handler may already be gone when the terminal
        // frame arrives.
        if kind == MessageKind::Complete {
            registry.unregister(&id);
        }

        if kind != MessageKind::Data && kind != MessageKind::Complete {
            debug!(%id, %kind, "unexpected message kind for operation");
        }
    }

    registry.drain();
    closed.cancel();
}
