use std::fmt;

use serde::{Deserialize, Serialize};

/// A single report that a DAB message reached a receiver over some
/// transport technology.
///
/// The payload of every confirmation frame deserializes into this struct.
/// `dab_id` identifies the acknowledged broadcast message and is the
/// deduplication key; `sender` is the device the confirmation concerns,
/// which is unrelated to the TCP peer that delivered it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Identifier of the acknowledged DAB message.
    pub dab_id: u64,
    /// Numeric classification of the acknowledged message.
    pub message_type: u32,
    /// Seconds since the Unix epoch at which the confirmed message arrived.
    #[serde(rename = "dab_msg_arrived_at")]
    pub arrived_at: f64,
    /// Transport technology that carried the delivery, e.g. "AIS" or "WiFi".
    pub technology: String,
    /// Device the confirmation concerns.
    pub sender: u64,
    /// Whether the confirmation still counts as valid. Peers may omit the
    /// field, in which case it defaults to `true`.
    #[serde(default = "default_valid")]
    pub valid: bool,
}

fn default_valid() -> bool {
    true
}

impl Confirmation {
    /// Builds a valid confirmation.
    pub fn new(
        dab_id: u64,
        message_type: u32,
        arrived_at: f64,
        technology: impl Into<String>,
        sender: u64,
    ) -> Self {
        Self {
            dab_id,
            message_type,
            arrived_at,
            technology: technology.into(),
            sender,
            valid: true,
        }
    }

    /// The `(dab_id, valid)` pair echoed back in acknowledgment payloads.
    pub fn reply_info(&self) -> (u64, bool) {
        (self.dab_id, self.valid)
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dab_id={} message_type={} arrived_at={} technology={} sender={} valid={}",
            self.dab_id, self.message_type, self.arrived_at, self.technology, self.sender, self.valid
        )
    }
}
