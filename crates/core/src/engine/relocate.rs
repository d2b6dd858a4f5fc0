//! Relocation planner for displaced shadows.

use crate::state::{ShadowSet, Slot, Snapshot};

/// Finds a deterministic target slot for a displaced shadow.
///
/// Linear scan over `[0, size)`; the first slot that is neither occupied
/// by a real item nor claimed by an existing shadow wins, giving a
/// stable left-to-right fill order. Returns `None` when no such slot
/// exists, signaling total loss of the shadow for this pass.
pub fn first_free_slot(current: &Snapshot, shadows: &ShadowSet, size: usize) -> Option<Slot> {
    (0..size).find(|&slot| !current.is_occupied(slot) && !shadows.contains_slot(slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ItemId;

    #[test]
    fn lowest_index_wins() {
        let current: Snapshot = [(0, ItemId(1)), (2, ItemId(2))].into_iter().collect();
        let shadows: ShadowSet = [(1, ItemId(9))].into_iter().collect();

        assert_eq!(first_free_slot(&current, &shadows, 5), Some(3));
    }

    #[test]
    fn exhausted_container_yields_none() {
        let current: Snapshot = [(0, ItemId(1))].into_iter().collect();
        let shadows: ShadowSet = [(1, ItemId(9))].into_iter().collect();

        assert_eq!(first_free_slot(&current, &shadows, 2), None);
    }

    #[test]
    fn empty_container_yields_slot_zero() {
        let current = Snapshot::new();
        let shadows = ShadowSet::new();

        assert_eq!(first_free_slot(&current, &shadows, 28), Some(0));
    }
}
