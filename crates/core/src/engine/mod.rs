//! Shadow reconciliation engine.
//!
//! [`ShadowEngine`] is the authoritative reducer for the automatic shadow
//! set. Every observed inventory change runs one full pass through the
//! same phase pipeline: diff, consume-on-pickup, create-on-departure,
//! displacement, relocation, commit. The engine owns the automatic set
//! and the previous snapshot; nothing else mutates them.

mod relocate;

pub use relocate::first_free_slot;

use crate::config::EngineConfig;
use crate::diff::SnapshotDelta;
use crate::env::ItemOracle;
use crate::state::{ItemId, ShadowSet, Slot, Snapshot};

/// Outcome of one reconciliation pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassOutcome {
    /// True if the automatic shadow set was mutated and should be
    /// re-persisted.
    pub changed: bool,
    /// Identities whose shadows were displaced and could not be
    /// relocated. They are gone; there is no retry on later events.
    pub dropped: Vec<ItemId>,
}

impl PassOutcome {
    fn unchanged() -> Self {
        Self::default()
    }
}

/// State machine that maintains the automatic shadow set across
/// inventory-change events.
///
/// Invariant: after any completed pass, no slot is simultaneously present
/// in the shadow set and occupied by a real item in the snapshot that
/// pass observed.
pub struct ShadowEngine {
    config: EngineConfig,
    shadows: ShadowSet,
    previous: Option<Snapshot>,
}

impl ShadowEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            shadows: ShadowSet::new(),
            previous: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the automatic shadow set.
    pub fn shadows(&self) -> &ShadowSet {
        &self.shadows
    }

    pub fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }

    /// Sets the baseline snapshot. Until a baseline exists, passes are
    /// skipped entirely so that "no prior data" is never read as
    /// "everything was just added".
    pub fn establish_baseline(&mut self, snapshot: Snapshot) {
        tracing::debug!("established baseline snapshot with {} items", snapshot.len());
        self.previous = Some(snapshot);
    }

    /// Replaces the automatic set wholesale, e.g. from persisted state.
    ///
    /// Restored entries are not validated against the baseline here; a
    /// restored shadow sitting on an occupied slot is displaced by the
    /// next pass.
    pub fn restore(&mut self, shadows: ShadowSet) {
        self.shadows = shadows;
    }

    /// Clears all session-scoped state (logout / world hop). Persisted
    /// data is untouched and can be restored on the next login.
    pub fn reset(&mut self) {
        self.previous = None;
        self.shadows.clear();
    }

    /// Removes the shadow at one slot, if any.
    pub fn clear_slot(&mut self, slot: Slot) -> Option<ItemId> {
        self.shadows.remove(slot)
    }

    /// Removes every automatic shadow, returning how many were held.
    pub fn clear_all(&mut self) -> usize {
        self.shadows.clear()
    }

    /// Runs one reconciliation pass against a freshly derived snapshot.
    ///
    /// Consumption runs before creation so an identity that is removed
    /// and re-added in the same event cannot spuriously gain a redundant
    /// shadow; displacement runs after creation so a just-created shadow
    /// can itself be displaced within the same pass.
    pub fn process(&mut self, current: Snapshot, items: &dyn ItemOracle) -> PassOutcome {
        let Some(previous) = self.previous.as_ref() else {
            tracing::debug!("no baseline snapshot yet; skipping reconciliation pass");
            return PassOutcome::unchanged();
        };

        let size = self.config.inventory_size;
        let mut changed = false;

        // Phase 1: diff.
        let delta = SnapshotDelta::from_snapshots(previous, &current, size);

        // Phase 2: a real item coming back consumes exactly one shadow of
        // its canonical identity, per added occurrence.
        for (&slot, &item) in &delta.added {
            if delta.moved.contains(&item) {
                continue;
            }
            let canonical = canonical_id(items, item);
            if let Some(shadow_slot) = self.shadows.slot_holding(canonical) {
                self.shadows.remove(shadow_slot);
                tracing::debug!(
                    "item {} added at slot {}; consumed shadow from slot {}",
                    canonical,
                    slot,
                    shadow_slot
                );
                changed = true;
            }
        }

        // Phase 3: an item that left leaves a shadow behind, unless the
        // slot was refilled within the same event.
        for (&slot, &item) in &delta.removed {
            if delta.moved.contains(&item) {
                continue;
            }
            if current.is_occupied(slot) {
                continue;
            }
            let canonical = canonical_id(items, item);
            self.shadows.insert(slot, canonical);
            tracing::debug!("item {} left slot {}; added shadow", canonical, slot);
            changed = true;
        }

        // Phase 4: shadows whose slot now holds a real item are displaced.
        let displaced_slots: Vec<Slot> = self
            .shadows
            .iter()
            .filter(|&(slot, _)| current.is_occupied(slot))
            .map(|(slot, _)| slot)
            .collect();
        let mut displaced = Vec::new();
        for slot in displaced_slots {
            if let Some(item) = self.shadows.remove(slot) {
                tracing::debug!("slot {} is now occupied; displacing shadow {}", slot, item);
                displaced.push(item);
                changed = true;
            }
        }

        // Phase 5: relocate displaced shadows into the lowest free slots.
        let mut dropped = Vec::new();
        for item in displaced {
            match first_free_slot(&current, &self.shadows, size) {
                Some(slot) => {
                    self.shadows.insert(slot, item);
                    tracing::debug!("relocated shadow {} to slot {}", item, slot);
                    changed = true;
                }
                None => {
                    tracing::warn!("no free slot to relocate shadow {}; shadow lost", item);
                    dropped.push(item);
                }
            }
        }

        // Phase 6: commit the snapshot unconditionally.
        self.previous = Some(current);

        PassOutcome { changed, dropped }
    }
}

/// Canonicalizes an identity, falling back to the raw identity when the
/// oracle lookup fails.
fn canonical_id(items: &dyn ItemOracle, item: ItemId) -> ItemId {
    match items.canonicalize(item) {
        Ok(canonical) => canonical,
        Err(err) => {
            tracing::warn!("canonicalization failed for item {}: {}", item, err);
            item
        }
    }
}
