use thiserror::Error;

/// Errors surfaced by confirmation store lookups.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No confirmation with the requested id has been stored.
    #[error("no confirmation stored for dab_id {dab_id}")]
    NotFound { dab_id: u64 },
}

pub type Result<T> = std::result::Result<T, StoreError>;
