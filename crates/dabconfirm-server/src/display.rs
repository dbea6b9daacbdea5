use dabconfirm_store::Confirmation;

/// Collaborator that renders the stored confirmations after each handled
/// frame.
///
/// Implementations receive an owned snapshot taken outside any store
/// lock, so they are free to block on terminal or file I/O. Refreshes
/// happen once per handled confirmation, duplicates included.
pub trait SnapshotDisplay: Send + Sync {
    fn refresh(&self, confirmations: &[Confirmation]);
}
