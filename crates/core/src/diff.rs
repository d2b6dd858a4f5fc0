//! Snapshot differ: classifies changes between two inventory snapshots.

use std::collections::{BTreeMap, BTreeSet};

use crate::state::{ItemId, Slot, Snapshot};

/// Classified difference between two consecutive inventory snapshots.
///
/// A slot whose content changed directly (different item in both
/// snapshots) contributes to both `removed` and `added`. An identity that
/// appears as a value in both maps is classified as `moved`: the same
/// item vacated one slot and appeared in another within a single event,
/// so it must neither create nor consume a shadow.
///
/// Move classification is by item identity only, not slot pairing. When
/// an identity occurs several times across the two maps, every occurrence
/// is suppressed, even occurrences that are not part of the true 1-to-1
/// move. This is the observed client behavior, kept deliberately.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    /// Slots that lost an item, keyed by vacated slot.
    pub removed: BTreeMap<Slot, ItemId>,
    /// Slots that gained an item, keyed by filled slot.
    pub added: BTreeMap<Slot, ItemId>,
    /// Identities present in both `removed` and `added`.
    pub moved: BTreeSet<ItemId>,
}

impl SnapshotDelta {
    /// Compares two snapshots slot by slot over `[0, size)`.
    pub fn from_snapshots(previous: &Snapshot, current: &Snapshot, size: usize) -> Self {
        let mut removed = BTreeMap::new();
        let mut added = BTreeMap::new();

        for slot in 0..size {
            match (previous.get(slot), current.get(slot)) {
                (Some(old), None) => {
                    removed.insert(slot, old);
                }
                (None, Some(new)) => {
                    added.insert(slot, new);
                }
                (Some(old), Some(new)) if old != new => {
                    removed.insert(slot, old);
                    added.insert(slot, new);
                }
                _ => {}
            }
        }

        let moved = removed
            .values()
            .filter(|item| added.values().any(|gained| gained == *item))
            .copied()
            .collect();

        Self {
            removed,
            added,
            moved,
        }
    }

    /// Returns true if the two snapshots were identical over the range.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}
