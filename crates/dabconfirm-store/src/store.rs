use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use parking_lot::RwLock;
use tracing::debug;

use crate::confirmation::Confirmation;
use crate::error::{Result, StoreError};

/// The shared, deduplicated collection of every confirmation received so
/// far.
///
/// One store instance is shared across all connection handlers behind an
/// `Arc`. Interior locking makes `try_insert` atomic: when two handlers
/// race to record the same `dab_id`, exactly one wins and the other
/// observes a duplicate. Records are never evicted; the store grows for
/// the lifetime of the process.
///
/// Keying the map by `dab_id` means every iteration order is already the
/// ascending id order that snapshots and reply correlation rely on.
pub struct ConfirmationStore {
    records: RwLock<BTreeMap<u64, Confirmation>>,
}

impl ConfirmationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    /// Inserts `confirmation` unless its `dab_id` is already present.
    ///
    /// Returns `true` when the record was added and `false` when an
    /// earlier record with the same id already exists. The existing
    /// record is never overwritten.
    pub fn try_insert(&self, confirmation: Confirmation) -> bool {
        match self.records.write().entry(confirmation.dab_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                debug!(dab_id = confirmation.dab_id, "confirmation stored");
                slot.insert(confirmation);
                true
            }
        }
    }

    /// Looks up the stored confirmation for `dab_id`.
    pub fn find_by_id(&self, dab_id: u64) -> Result<Confirmation> {
        self.records
            .read()
            .get(&dab_id)
            .cloned()
            .ok_or(StoreError::NotFound { dab_id })
    }

    /// Owned snapshot of every stored confirmation, ascending by `dab_id`.
    ///
    /// The snapshot is taken under the read lock and released before the
    /// caller touches it; a refresh racing with an insert may miss the
    /// newest record and picks it up on the next call.
    pub fn all_sorted_by_id(&self) -> Vec<Confirmation> {
        self.records.read().values().cloned().collect()
    }

    /// Stored confirmations matching `predicate`, ascending by `dab_id`.
    pub fn filter(&self, predicate: impl Fn(&Confirmation) -> bool) -> Vec<Confirmation> {
        self.records
            .read()
            .values()
            .filter(|confirmation| predicate(confirmation))
            .cloned()
            .collect()
    }

    /// Number of stored confirmations.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for ConfirmationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;

    use super::*;

    fn confirmation(dab_id: u64, sender: u64) -> Confirmation {
        Confirmation::new(dab_id, 4, 100.0 + dab_id as f64, "AIS", sender)
    }

    #[test]
    fn first_insert_wins_repeat_is_rejected() {
        let store = ConfirmationStore::new();

        assert!(store.try_insert(confirmation(1, 5)));
        assert!(!store.try_insert(confirmation(1, 9)));

        // The original record survives the rejected insert.
        let stored = store.find_by_id(1).unwrap();
        assert_eq!(stored.sender, 5);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_by_id_reports_missing_records() {
        let store = ConfirmationStore::new();
        store.try_insert(confirmation(1, 5));

        assert!(store.find_by_id(1).is_ok());
        let err = store.find_by_id(2).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { dab_id: 2 }));
    }

    #[test]
    fn snapshots_are_ascending_and_idempotent() {
        let store = ConfirmationStore::new();
        for dab_id in [5, 1, 3, 2, 4] {
            store.try_insert(confirmation(dab_id, dab_id));
        }

        let first = store.all_sorted_by_id();
        let ids: Vec<u64> = first.iter().map(|c| c.dab_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        // Reading the snapshot does not disturb the store.
        let second = store.all_sorted_by_id();
        assert_eq!(first, second);
    }

    #[test]
    fn filter_selects_matching_records_in_id_order() {
        let store = ConfirmationStore::new();
        store.try_insert(confirmation(3, 5));
        store.try_insert(confirmation(1, 5));
        store.try_insert(confirmation(2, 9));

        let same_sender = store.filter(|c| c.sender == 5);
        let ids: Vec<u64> = same_sender.iter().map(|c| c.dab_id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn racing_inserts_of_one_id_admit_exactly_one() {
        let store = Arc::new(ConfirmationStore::new());
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [5u64, 9u64]
            .into_iter()
            .map(|sender| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    store.try_insert(confirmation(42, sender))
                })
            })
            .collect();

        let wins: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(wins.iter().filter(|won| **won).count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_store_reports_empty() {
        let store = ConfirmationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.all_sorted_by_id().is_empty());
    }
}
