//! TCP confirmation-acknowledgment server and client.
//!
//! Senders report delivered DAB messages over plain TCP connections; the
//! server records each confirmation once and answers every frame with an
//! acknowledgment correlating the confirmed message against the stored
//! history for the same sender. One handler thread runs per connection;
//! the deduplicated store is the only shared state.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod handler;
pub mod listener;
pub mod protocol;
pub mod reply;

pub use client::ConfirmationClient;
pub use config::{ServerConfig, DEFAULT_PORT};
pub use display::SnapshotDisplay;
pub use error::{Result, ServerError};
pub use handler::{run_session, SessionContext, SessionEnd};
pub use listener::ConfirmationServer;
pub use protocol::{decode_inbound, Inbound, DISCONNECT_SENTINEL};
pub use reply::{
    build_reply, AckInfo, AckReply, CrossTechnologyAck, ReplyPolicy, TechnologySplitAck,
};
