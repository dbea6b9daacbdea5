//! Authoritative storage of received DAB confirmations.
//!
//! The server keeps every confirmation it has accepted in a single
//! [`ConfirmationStore`] shared across connection handlers. The store
//! deduplicates by `dab_id`: the first record for an id wins, repeats are
//! rejected without mutation. Lookups and snapshots always observe fully
//! written records.

pub mod confirmation;
pub mod error;
pub mod store;

pub use confirmation::Confirmation;
pub use error::{Result, StoreError};
pub use store::ConfirmationStore;
