use dabconfirm_store::Confirmation;
use serde_json::Value;

use crate::error::Result;

/// Token a peer sends to end its session without confirming anything.
pub const DISCONNECT_SENTINEL: &str = "DISCONNECT";

/// A decoded inbound frame payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A delivery confirmation to record and acknowledge.
    Confirmation(Confirmation),
    /// The peer announced it is done; no reply follows.
    Disconnect,
}

/// Decodes one frame payload into an [`Inbound`] message.
///
/// The disconnect sentinel is accepted both as a bare JSON string
/// containing [`DISCONNECT_SENTINEL`] and as an object carrying it as a
/// key. Anything else must deserialize into a [`Confirmation`].
pub fn decode_inbound(payload: &[u8]) -> Result<Inbound> {
    let value: Value = serde_json::from_slice(payload)?;
    if is_disconnect(&value) {
        return Ok(Inbound::Disconnect);
    }
    let confirmation: Confirmation = serde_json::from_value(value)?;
    Ok(Inbound::Confirmation(confirmation))
}

fn is_disconnect(value: &Value) -> bool {
    match value {
        Value::String(text) => text.contains(DISCONNECT_SENTINEL),
        Value::Object(map) => map.contains_key(DISCONNECT_SENTINEL),
        _ => false,
    }
}
