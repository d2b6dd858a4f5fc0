//! Manually configured shadows, one optional entry per slot.

use crate::state::{ItemId, ShadowSet, Slot};

/// Registry of shadows sourced from static per-slot configuration.
///
/// Entirely independent of the automatic set and of the inventory's real
/// contents: a manual shadow may target an empty or an occupied slot, and
/// no reconciliation ever touches it. The set is rebuilt wholesale each
/// time the backing configuration changes.
pub struct ManualShadowRegistry {
    size: usize,
    shadows: ShadowSet,
}

impl ManualShadowRegistry {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            shadows: ShadowSet::new(),
        }
    }

    /// Read-only view of the manual shadow set.
    pub fn shadows(&self) -> &ShadowSet {
        &self.shadows
    }

    /// Rebuilds the set from per-slot configuration text.
    ///
    /// Each positional entry is parsed as a positive integer item
    /// identity; blank, non-numeric, or non-positive entries are skipped
    /// with a warning. The result wholly replaces the previous set, so a
    /// slot whose text was cleared disappears here too.
    pub fn rebuild(&mut self, entries: &[Option<String>]) {
        if entries.len() > self.size {
            tracing::warn!(
                "manual shadow config has {} entries for a {}-slot container; extras ignored",
                entries.len(),
                self.size
            );
        }

        let mut next = ShadowSet::new();
        for (slot, entry) in entries.iter().enumerate().take(self.size) {
            let Some(raw) = entry else { continue };
            match parse_entry(raw) {
                Some(item) => {
                    next.insert(slot, item);
                }
                None => {
                    if !raw.trim().is_empty() {
                        tracing::warn!(
                            "ignoring invalid manual shadow entry {:?} for slot {}",
                            raw,
                            slot
                        );
                    }
                }
            }
        }
        self.shadows = next;
    }

    /// Removes one entry directly, without a rebuild.
    pub fn clear(&mut self, slot: Slot) -> Option<ItemId> {
        self.shadows.remove(slot)
    }

    /// Drops every entry. The set is session-scoped; it is rebuilt from
    /// the backing configuration after the next login.
    pub fn reset(&mut self) {
        self.shadows.clear();
    }
}

fn parse_entry(raw: &str) -> Option<ItemId> {
    let value: i64 = raw.trim().parse().ok()?;
    if value > 0 && value <= i64::from(u32::MAX) {
        Some(ItemId(value as u32))
    } else {
        None
    }
}
