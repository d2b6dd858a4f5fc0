//! Session lifecycle around the shadow engine.
//!
//! The host's inventory UI and its persisted data become available at
//! different times after login, so initialization is an explicit
//! two-phase state machine instead of ad hoc flags: the baseline
//! snapshot is taken when the inventory becomes observable, and the
//! persisted shadow set is loaded one scheduling tick later. Inventory
//! changes are only reconciled once both steps completed.

use std::sync::Arc;

use shadow_core::{
    ContainerSource, ItemId, ItemOracle, ManualShadowRegistry, ShadowEngine, ShadowSet, Slot,
    Snapshot,
};

use crate::persistence;
use crate::store::ConfigStore;
use crate::view::{RenderView, ViewHandle};

/// Session configuration: engine parameters plus the storage group the
/// shadow blob and manual slot entries live under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub engine: shadow_core::EngineConfig,
    pub config_group: String,
}

impl SessionConfig {
    pub const DEFAULT_CONFIG_GROUP: &'static str = "slotshadow";

    pub fn new() -> Self {
        Self {
            engine: shadow_core::EngineConfig::new(),
            config_group: Self::DEFAULT_CONFIG_GROUP.to_owned(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialization state of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionPhase {
    /// No baseline snapshot exists; all events are ignored.
    Uninitialized,
    /// Baseline taken, persisted shadows not loaded yet.
    BaselineEstablished,
    /// Fully initialized; inventory changes are reconciled.
    ShadowsLoaded,
}

/// Errors reported to external callers of session commands.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("slot {slot} out of range for a {size}-slot container")]
    SlotOutOfRange { slot: Slot, size: usize },
}

/// What a clear-slot command removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SlotClearOutcome {
    pub automatic: Option<ItemId>,
    pub manual: Option<ItemId>,
}

impl SlotClearOutcome {
    pub fn cleared_any(&self) -> bool {
        self.automatic.is_some() || self.manual.is_some()
    }
}

/// Process-lifetime context owning the engine, the manual registry, and
/// their collaborators.
///
/// All mutation runs on the host's single event thread; the render
/// thread reads through the [`ViewHandle`] only.
pub struct Session {
    config: SessionConfig,
    phase: SessionPhase,
    engine: ShadowEngine,
    manual: ManualShadowRegistry,
    store: Arc<dyn ConfigStore>,
    items: Arc<dyn ItemOracle>,
    source: Arc<dyn ContainerSource>,
    view: ViewHandle,
}

impl Session {
    pub fn new(
        config: SessionConfig,
        store: Arc<dyn ConfigStore>,
        items: Arc<dyn ItemOracle>,
        source: Arc<dyn ContainerSource>,
    ) -> Self {
        let engine = ShadowEngine::new(config.engine);
        let manual = ManualShadowRegistry::new(config.engine.inventory_size);
        Self {
            config,
            phase: SessionPhase::Uninitialized,
            engine,
            manual,
            store,
            items,
            source,
            view: ViewHandle::new(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Handle for lock-free reads from the render thread.
    pub fn view_handle(&self) -> ViewHandle {
        self.view.clone()
    }

    /// Read-only view of the automatic shadow set.
    pub fn automatic_shadows(&self) -> &ShadowSet {
        self.engine.shadows()
    }

    /// Read-only view of the manual shadow set.
    pub fn manual_shadows(&self) -> &ShadowSet {
        self.manual.shadows()
    }

    /// Storage key backing the manual entry for a slot.
    pub fn manual_slot_key(slot: Slot) -> String {
        format!("manual_slot_{slot}")
    }

    /// First init step: the inventory UI exists, take the baseline.
    pub fn on_inventory_observable(&mut self) {
        if self.phase != SessionPhase::Uninitialized {
            tracing::debug!("inventory observable in phase {}; ignoring", self.phase);
            return;
        }
        self.engine.establish_baseline(self.current_snapshot());
        self.phase = SessionPhase::BaselineEstablished;
        tracing::debug!("session phase: {}", self.phase);
    }

    /// Second init step, one scheduling tick later: load persisted
    /// shadows. Loading before the baseline would race UI readiness
    /// against data availability in the host.
    pub fn on_next_tick(&mut self) {
        if self.phase != SessionPhase::BaselineEstablished {
            return;
        }
        let loaded = persistence::load_shadows(self.store.as_ref(), &self.config.config_group);
        self.engine.restore(loaded);
        self.phase = SessionPhase::ShadowsLoaded;
        tracing::debug!("session phase: {}", self.phase);
        self.publish();
    }

    /// One observed inventory change: derive a fresh snapshot and run a
    /// full reconciliation pass. Persist failures are logged and never
    /// roll back the in-memory state.
    pub fn on_container_changed(&mut self) {
        if self.phase != SessionPhase::ShadowsLoaded {
            tracing::debug!("inventory change in phase {}; skipping", self.phase);
            return;
        }
        let outcome = self
            .engine
            .process(self.current_snapshot(), self.items.as_ref());
        if outcome.changed {
            self.persist();
            self.publish();
        }
    }

    /// Logout / world hop: drop all session-scoped state, the manual set
    /// included. Persisted data is untouched and reloads through the next
    /// two-phase init; the manual set comes back with the next rebuild.
    pub fn on_session_end(&mut self) {
        self.engine.reset();
        self.manual.reset();
        self.phase = SessionPhase::Uninitialized;
        tracing::debug!("session ended; state reset");
        self.publish();
    }

    /// Rebuilds the manual registry from its backing configuration.
    pub fn rebuild_manual(&mut self, entries: &[Option<String>]) {
        self.manual.rebuild(entries);
        self.publish();
    }

    /// Clear-slot command: removes the slot from both shadow sets and
    /// resets the manual backing configuration entry. An out-of-range
    /// slot is rejected without mutating anything.
    pub fn clear_slot(&mut self, slot: Slot) -> Result<SlotClearOutcome, SessionError> {
        let size = self.config.engine.inventory_size;
        if slot >= size {
            return Err(SessionError::SlotOutOfRange { slot, size });
        }

        let automatic = self.engine.clear_slot(slot);
        let manual = self.manual.clear(slot);
        if let Err(err) = self
            .store
            .unset(&self.config.config_group, &Self::manual_slot_key(slot))
        {
            tracing::warn!("failed to reset manual config for slot {}: {}", slot, err);
        }
        if automatic.is_some() {
            self.persist();
        }
        self.publish();
        Ok(SlotClearOutcome { automatic, manual })
    }

    /// Clear-all command: removes every automatic shadow. Manual entries
    /// are configuration-driven and stay. Returns the removed count for
    /// the host's notification adapter.
    pub fn clear_all(&mut self) -> usize {
        let cleared = self.engine.clear_all();
        if cleared > 0 {
            self.persist();
            self.publish();
        }
        cleared
    }

    fn current_snapshot(&self) -> Snapshot {
        Snapshot::from_cells(&self.source.cells())
    }

    fn persist(&self) {
        if let Err(err) = persistence::save_shadows(
            self.store.as_ref(),
            &self.config.config_group,
            self.engine.shadows(),
        ) {
            tracing::warn!("failed to persist shadows: {}", err);
        }
    }

    fn publish(&self) {
        self.view.publish(RenderView {
            automatic: self.engine.shadows().to_map(),
            manual: self.manual.shadows().to_map(),
        });
    }
}
