//! DAB confirmation-acknowledgment server.
//!
//! dabconfirm records which DAB messages were confirmed delivered over
//! which transport technology, deduplicates the reports, and answers each
//! one with a cross-technology acknowledgment for the same sender.
//!
//! # Crate Structure
//!
//! - [`frame`] — Length-prefixed wire framing (fixed-width decimal header)
//! - [`store`] — Deduplicated in-memory confirmation store
//! - [`server`] — TCP listener, connection handler, reply builder, client

/// Re-export framing types.
pub mod frame {
    pub use dabconfirm_frame::*;
}

/// Re-export store types.
pub mod store {
    pub use dabconfirm_store::*;
}

/// Re-export server and client types.
pub mod server {
    pub use dabconfirm_server::*;
}
