use serde_json::Value;
use tracing::debug;

use graphsub_frame::{codec, Message, MessageKind, RemoteError};
use graphsub_transport::{WireSink, WireSource};

use crate::error::{ClientError, Result};

/// Perform the one-time connection-initialization exchange.
///
/// Sends `connection_init` with the given parameters, then reads from the
/// transport until the server acknowledges (`connection_ack`), rejects
/// (`connection_error`), or violates the protocol. Keep-alives are consumed
/// silently.
///
/// This runs to completion on the exclusively borrowed read half before the
/// reader loop exists, so the transport never has two concurrent readers.
pub async fn initialize<S, R>(sink: &S, source: &mut R, params: Option<Value>) -> Result<()>
where
    S: WireSink,
    R: WireSource,
{
    let init = codec::encode(&Message::connection_init(params))?;
    sink.send(init).await?;

    loop {
        let raw = source.receive().await?;
        let msg = codec::decode(&raw)?;

        match msg.kind {
            MessageKind::ConnectionAck => {
                debug!("connection acknowledged");
                return Ok(());
            }
            MessageKind::ConnectionKeepAlive => continue,
            MessageKind::ConnectionError => {
                return Err(ClientError::Remote(RemoteError::from_payload(msg.payload)));
            }
            other => {
                return Err(ClientError::Protocol(format!(
                    "unexpected message kind during handshake: {other}"
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use bytes::Bytes;
    use serde_json::json;
    use tokio::sync::mpsc;

    use graphsub_transport::TransportError;

    use super::*;

    struct ScriptedSink {
        sent: mpsc::UnboundedSender<Bytes>,
    }

    impl WireSink for ScriptedSink {
        fn send(&self, raw: Bytes) -> impl Future<Output = graphsub_transport::Result<()>> + Send {
            async move {
                self.sent
                    .send(raw)
                    .map_err(|_| TransportError::Closed("test receiver dropped".to_string()))
            }
        }

        fn close(&self) -> impl Future<Output = graphsub_transport::Result<()>> + Send {
            async move { Ok(()) }
        }
    }

    struct ScriptedSource {
        inbound: mpsc::UnboundedReceiver<Bytes>,
    }

    impl WireSource for ScriptedSource {
        fn receive(&mut self) -> impl Future<Output = graphsub_transport::Result<Bytes>> + Send {
            async move {
                self.inbound
                    .recv()
                    .await
                    .ok_or_else(|| TransportError::Closed("transport closed".to_string()))
            }
        }
    }

    fn wire() -> (
        ScriptedSink,
        ScriptedSource,
        mpsc::UnboundedSender<Bytes>,
        mpsc::UnboundedReceiver<Bytes>,
    ) {
        let (to_client, inbound) = mpsc::unbounded_channel();
        let (sent, from_client) = mpsc::unbounded_channel();
        (
            ScriptedSink { sent },
            ScriptedSource { inbound },
            to_client,
            from_client,
        )
    }

    fn push(to_client: &mpsc::UnboundedSender<Bytes>, msg: &Message) {
        to_client
            .send(codec::encode(msg).expect("test message should encode"))
            .expect("test source should accept messages");
    }

    #[tokio::test]
    async fn ack_completes_handshake() {
        let (sink, mut source, to_client, mut from_client) = wire();
        push(&to_client, &Message::ack());

        initialize(&sink, &mut source, Some(json!({ "token": "t" })))
            .await
            .expect("handshake should succeed");

        let init = codec::decode(&from_client.recv().await.unwrap()).unwrap();
        assert_eq!(init.kind, MessageKind::ConnectionInit);
        assert_eq!(init.payload, Some(json!({ "token": "t" })));
    }

    #[tokio::test]
    async fn keep_alives_are_ignored_while_waiting() {
        let (sink, mut source, to_client, _from_client) = wire();
        push(&to_client, &Message::keep_alive());
        push(&to_client, &Message::keep_alive());
        push(&to_client, &Message::ack());

        initialize(&sink, &mut source, None)
            .await
            .expect("handshake should succeed despite keep-alives");
    }

    #[tokio::test]
    async fn connection_error_surfaces_remote_description() {
        let (sink, mut source, to_client, _from_client) = wire();
        push(&to_client, &Message::connection_error(json!("bad auth")));

        let err = initialize(&sink, &mut source, None)
            .await
            .expect_err("handshake should fail");
        match err {
            ClientError::Remote(remote) => assert_eq!(remote.message, "bad auth"),
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_kind_is_a_protocol_violation() {
        let (sink, mut source, to_client, _from_client) = wire();
        push(&to_client, &Message::data("op-1", json!(null)));

        let err = initialize(&sink, &mut source, None)
            .await
            .expect_err("handshake should fail");
        match err {
            ClientError::Protocol(message) => assert!(message.contains("data")),
            other => panic!("expected protocol violation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn transport_death_fails_handshake() {
        let (sink, mut source, to_client, _from_client) = wire();
        drop(to_client);

        let err = initialize(&sink, &mut source, None)
            .await
            .expect_err("handshake should fail");
        assert!(matches!(err, ClientError::Transport(_)));
    }
}
