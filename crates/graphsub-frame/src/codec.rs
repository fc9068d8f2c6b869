use bytes::Bytes;

use crate::error::{FrameError, Result};
use crate::message::Message;

/// Encode a message into its JSON wire form.
pub fn encode(msg: &Message) -> Result<Bytes> {
    let raw = serde_json::to_vec(msg).map_err(FrameError::Encode)?;
    Ok(Bytes::from(raw))
}

/// Decode one wire message.
///
/// Malformed input is always reported as [`FrameError::Decode`], never passed
/// off as a valid message.
pub fn decode(raw: &[u8]) -> Result<Message> {
    serde_json::from_slice(raw).map_err(FrameError::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::message::MessageKind;

    #[test]
    fn encode_connection_scoped_omits_id() {
        let raw = encode(&Message::connection_init(Some(json!({ "token": "t" })))).unwrap();
        let wire: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            wire,
            json!({ "type": "connection_init", "payload": { "token": "t" } })
        );
    }

    #[test]
    fn encode_operation_scoped_carries_id() {
        let raw = encode(&Message::start("op-1", json!({ "query": "{ ping }" }))).unwrap();
        let wire: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            wire,
            json!({ "type": "start", "id": "op-1", "payload": { "query": "{ ping }" } })
        );
    }

    #[test]
    fn encode_omits_absent_payload() {
        let raw = encode(&Message::stop("op-1")).unwrap();
        let wire: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(wire, json!({ "type": "stop", "id": "op-1" }));
    }

    #[test]
    fn decode_fills_defaults() {
        let msg = decode(br#"{"type":"connection_ack"}"#).unwrap();
        assert_eq!(msg.kind, MessageKind::ConnectionAck);
        assert!(msg.id.is_empty());
        assert!(msg.payload.is_none());
    }

    #[test]
    fn decode_data_message() {
        let msg = decode(br#"{"type":"data","id":"op-1","payload":{"data":{"n":1}}}"#).unwrap();
        assert_eq!(msg.kind, MessageKind::Data);
        assert_eq!(msg.id, "op-1");
        assert_eq!(msg.payload, Some(json!({ "data": { "n": 1 } })));
    }

    #[test]
    fn decode_rejects_malformed_input() {
        assert!(matches!(decode(b"{not-json"), Err(FrameError::Decode(_))));
        assert!(matches!(decode(b""), Err(FrameError::Decode(_))));
    }

    #[test]
    fn decode_rejects_unknown_kind() {
        let result = decode(br#"{"type":"subscribe","id":"op-1"}"#);
        assert!(matches!(result, Err(FrameError::Decode(_))));
    }

    #[test]
    fn decode_rejects_missing_kind() {
        let result = decode(br#"{"id":"op-1"}"#);
        assert!(matches!(result, Err(FrameError::Decode(_))));
    }
}
