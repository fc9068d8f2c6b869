use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use graphsub_frame::{codec, DataPayload, Message, MessageKind, RemoteError, StartPayload};
use graphsub_transport::{WireSink, WireSource};

use crate::error::{ClientError, Result};
use crate::handshake;
use crate::id::{IdGenerator, RandomTokenIds};
use crate::reader;
use crate::registry::{Handler, Registry};

/// Configuration for opening a connection.
pub struct ConnectConfig {
    /// Connection parameters forwarded in `connection_init` (auth tokens and
    /// the like); opaque to this layer.
    pub params: Option<Value>,
    /// Operation id strategy. Defaults to random 128-bit tokens.
    pub ids: Arc<dyn IdGenerator>,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            params: None,
            ids: Arc::new(RandomTokenIds),
        }
    }
}

impl fmt::Debug for ConnectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectConfig")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Open a connection with default configuration.
pub async fn connect<S, R>(sink: S, source: R) -> Result<Connection<S>>
where
    S: WireSink,
    R: WireSource,
{
    connect_with_config(sink, source, ConnectConfig::default()).await
}

/// Open a connection with explicit configuration.
///
/// The handshake runs to completion (success or failure) on the read half
/// before the reader loop is spawned; nothing else ever reads the transport
/// concurrently. No reader loop is started when the handshake fails.
pub async fn connect_with_config<S, R>(
    sink: S,
    mut source: R,
    config: ConnectConfig,
) -> Result<Connection<S>>
where
    S: WireSink,
    R: WireSource,
{
    handshake::initialize(&sink, &mut source, config.params).await?;

    let registry = Arc::new(Registry::new());
    let closed = CancellationToken::new();
    let reader = tokio::spawn(reader::run(
        source,
        Arc::clone(&registry),
        closed.clone(),
    ));

    Ok(Connection {
        sink,
        registry,
        ids: config.ids,
        closed,
        reader,
    })
}

/// A live connection to a GraphQL WebSocket endpoint.
///
/// All methods take `&self`; share the connection behind an `Arc` to issue
/// operations from several tasks at once.
pub struct Connection<S: WireSink> {
    sink: S,
    registry: Arc<Registry>,
    ids: Arc<dyn IdGenerator>,
    closed: CancellationToken,
    reader: JoinHandle<()>,
}

impl<S: WireSink> Connection<S> {
    /// Start a streaming operation with the given request body.
    ///
    /// `on_frame` is invoked once per inbound message addressed to the new
    /// operation, each invocation on its own task. Returns the operation id
    /// for a later [`stop`](Self::stop).
    pub async fn start<F>(&self, body: &StartPayload, on_frame: F) -> Result<String>
    where
        F: Fn(Message) + Send + Sync + 'static,
    {
        self.start_with_handler(body, Arc::new(on_frame)).await
    }

    async fn start_with_handler(&self, body: &StartPayload, handler: Handler) -> Result<String> {
        let id = self.ids.next_id();
        let payload = serde_json::to_value(body)?;
        let raw = codec::encode(&Message::start(id.clone(), payload))?;

        // Register before sending: the first result may race the send
        // completing.
        self.registry.register(id.clone(), handler);

        if let Err(err) = self.sink.send(raw).await {
            // A failed send must not leave an orphaned registration behind.
            self.registry.unregister(&id);
            return Err(err.into());
        }

        Ok(id)
    }

    /// Stop an operation: tell the remote side to cease, then drop the local
    /// handler. The handler is dropped even when the send fails — the caller
    /// is abandoning interest either way.
    pub async fn stop(&self, id: &str) -> Result<()> {
        let sent = match codec::encode(&Message::stop(id)) {
            Ok(raw) => self.sink.send(raw).await.map_err(ClientError::from),
            Err(err) => Err(err.into()),
        };
        self.registry.unregister(id);
        sent
    }

    /// Run a one-shot request: start an operation, wait for its first result,
    /// stop it. Built entirely on [`start`](Self::start) and
    /// [`stop`](Self::stop).
    ///
    /// Cancelling `cancel` abandons the wait and returns
    /// [`ClientError::Cancelled`]. On every exit path the operation is
    /// unregistered and the remote side is told to cease; a stop failure
    /// after a successful result surfaces as the call's error.
    pub async fn request(
        &self,
        cancel: &CancellationToken,
        body: &StartPayload,
    ) -> Result<DataPayload> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = self
            .start(body, move |msg| {
                // A closed receiver means the request already returned; the
                // late message is dropped.
                let _ = tx.send(msg);
            })
            .await?;

        let result = wait_for_result(cancel, &mut rx).await;

        let stopped = self.stop(&id).await;
        match result {
            Ok(data) => stopped.map(|()| data),
            Err(err) => Err(err),
        }
    }

    /// Announce the close with `connection_terminate`, then close the
    /// transport. A close failure after the terminate frame went out is
    /// reported, never a panic.
    pub async fn close(&self) -> Result<()> {
        let terminate = codec::encode(&Message::terminate())?;
        self.sink.send(terminate).await?;

        if let Err(err) = self.sink.close().await {
            debug!(error = %err, "transport close failed after terminate");
            return Err(err.into());
        }
        Ok(())
    }

    /// Wait until the connection has ended (transport death or close).
    pub async fn closed(&self) {
        self.closed.cancelled().await;
    }

    /// Whether the reader loop has observed the end of the connection.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Whether an operation with this id is still registered.
    pub fn is_active(&self, id: &str) -> bool {
        self.registry.lookup(id).is_some()
    }

    /// Number of live operations on this connection.
    pub fn active_operations(&self) -> usize {
        self.registry.len()
    }
}

impl<S: WireSink> fmt::Debug for Connection<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("active_operations", &self.registry.len())
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<S: WireSink> Drop for Connection<S> {
    fn drop(&mut self) {
        self.reader.abort();
        self.closed.cancel();
    }
}

async fn wait_for_result(
    cancel: &CancellationToken,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> Result<DataPayload> {
    loop {
        let msg = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            msg = rx.recv() => msg,
        };

        let Some(msg) = msg else {
            // The handler is gone without a result: either the reader loop
            // drained the registry on transport death, or the server
            // completed the operation and the terminal cleanup dropped it.
            return Err(ClientError::Disconnected(
                "operation ended before a result arrived".to_string(),
            ));
        };

        match msg.kind {
            // A complete with no prior data yields nothing; keep waiting.
            MessageKind::Complete => continue,
            MessageKind::Data => {
                let data = match msg.payload {
                    Some(payload) => serde_json::from_value(payload)?,
                    None => DataPayload::default(),
                };
                return Ok(data);
            }
            MessageKind::Error => {
                return Err(ClientError::Remote(RemoteError::from_payload(msg.payload)));
            }
            other => {
                return Err(ClientError::Protocol(format!(
                    "unexpected message kind for request: {other}"
                )));
            }
        }
    }
}
