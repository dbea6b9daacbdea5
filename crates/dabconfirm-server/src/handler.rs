use std::io::{Read, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use dabconfirm_frame::{FrameError, FrameReader, FrameWriter};
use dabconfirm_store::ConfirmationStore;
use tracing::{debug, info};

use crate::display::SnapshotDisplay;
use crate::error::Result;
use crate::protocol::{self, Inbound};
use crate::reply::{self, ReplyPolicy};

/// Why a session over one connection came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The peer closed its socket between frames.
    PeerClosed,
    /// The peer sent the disconnect sentinel.
    DisconnectRequested,
}

/// Shared state handed to every connection session.
#[derive(Clone)]
pub struct SessionContext {
    pub store: Arc<ConfirmationStore>,
    pub reply_policy: ReplyPolicy,
    pub display: Option<Arc<dyn SnapshotDisplay>>,
}

impl SessionContext {
    pub fn new(store: Arc<ConfirmationStore>, reply_policy: ReplyPolicy) -> Self {
        Self {
            store,
            reply_policy,
            display: None,
        }
    }

    /// Attach a display collaborator refreshed after each handled
    /// confirmation.
    pub fn with_display(mut self, display: Arc<dyn SnapshotDisplay>) -> Self {
        self.display = Some(display);
        self
    }
}

/// Runs the receive/acknowledge loop for one connection.
///
/// Each iteration reads one frame, decodes it, records the confirmation
/// unless its `dab_id` is already known, and sends the acknowledgment
/// built from the current store contents. The loop ends when the peer
/// closes its socket, sends the disconnect sentinel, or violates the
/// protocol; a protocol violation surfaces as the returned error and
/// affects only this connection.
pub fn run_session<R: Read, W: Write>(
    reader: &mut FrameReader<R>,
    writer: &mut FrameWriter<W>,
    peer: SocketAddr,
    ctx: &SessionContext,
) -> Result<SessionEnd> {
    loop {
        let payload = match reader.read_frame() {
            Ok(payload) => payload,
            Err(FrameError::ConnectionClosed) => return Ok(SessionEnd::PeerClosed),
            Err(err) => return Err(err.into()),
        };

        let confirmation = match protocol::decode_inbound(&payload)? {
            Inbound::Disconnect => return Ok(SessionEnd::DisconnectRequested),
            Inbound::Confirmation(confirmation) => confirmation,
        };

        let dab_id = confirmation.dab_id;
        let sender = confirmation.sender;
        info!(peer = %peer, %confirmation, "confirmation received");

        if !ctx.store.try_insert(confirmation) {
            info!(peer = %peer, dab_id, "duplicate confirmation ignored");
        }

        if let Some(display) = &ctx.display {
            display.refresh(&ctx.store.all_sorted_by_id());
        }

        let ack = reply::build_reply(&ctx.store, dab_id, sender, &ctx.reply_policy)?;
        writer.write_frame(&serde_json::to_vec(&ack)?)?;
        debug!(peer = %peer, dab_id, "acknowledgment sent");
    }
}
