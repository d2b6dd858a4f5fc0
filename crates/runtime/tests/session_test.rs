//! End-to-end session scenarios against in-memory collaborators.

use std::sync::{Arc, RwLock};
use std::thread;

use shadow_core::{ContainerSource, EngineConfig, ItemId, NoCanonicalization, Slot};
use shadow_runtime::persistence::SHADOW_DATA_KEY;
use shadow_runtime::{ConfigStore, InMemoryConfigStore, Session, SessionConfig, SessionPhase};

const GROUP: &str = SessionConfig::DEFAULT_CONFIG_GROUP;

/// Mutable fake of the host's live container.
struct FakeContainer {
    cells: RwLock<Vec<Option<ItemId>>>,
}

impl FakeContainer {
    fn new(size: usize) -> Self {
        Self {
            cells: RwLock::new(vec![None; size]),
        }
    }

    fn put(&self, slot: Slot, item: Option<u32>) {
        self.cells.write().unwrap()[slot] = item.map(ItemId);
    }
}

impl ContainerSource for FakeContainer {
    fn cells(&self) -> Vec<Option<ItemId>> {
        self.cells.read().unwrap().clone()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn new_session(
    size: usize,
    store: &Arc<InMemoryConfigStore>,
    container: &Arc<FakeContainer>,
) -> Session {
    let config = SessionConfig {
        engine: EngineConfig::with_inventory_size(size),
        config_group: GROUP.to_owned(),
    };
    let store: Arc<dyn ConfigStore> = store.clone();
    let source: Arc<dyn ContainerSource> = container.clone();
    Session::new(config, store, Arc::new(NoCanonicalization), source)
}

/// Runs both initialization steps.
fn bring_up(session: &mut Session) {
    session.on_inventory_observable();
    session.on_next_tick();
    assert_eq!(session.phase(), SessionPhase::ShadowsLoaded);
}

#[test]
fn two_phase_init_loads_persisted_shadows_and_gates_events() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    store.set(GROUP, SHADOW_DATA_KEY, r#"{"2":42}"#).unwrap();

    let mut session = new_session(28, &store, &container);
    assert_eq!(session.phase(), SessionPhase::Uninitialized);

    // Events before the baseline exists are ignored entirely.
    container.put(0, Some(7));
    session.on_container_changed();
    assert!(session.automatic_shadows().is_empty());

    session.on_inventory_observable();
    assert_eq!(session.phase(), SessionPhase::BaselineEstablished);

    // Still gated: shadows are not loaded yet.
    session.on_container_changed();
    assert!(session.automatic_shadows().is_empty());

    session.on_next_tick();
    assert_eq!(session.phase(), SessionPhase::ShadowsLoaded);
    assert_eq!(session.automatic_shadows().get(2), Some(ItemId(42)));
    assert_eq!(
        session.view_handle().load().automatic.get(&2),
        Some(&ItemId(42))
    );
}

#[test]
fn one_slot_inventory_departure_then_reclaim_loses_the_shadow() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(1));
    container.put(0, Some(7));

    let mut session = new_session(1, &store, &container);
    bring_up(&mut session);

    // Item is equipped away; the vacated slot gains a shadow and the
    // blob is persisted.
    container.put(0, None);
    session.on_container_changed();
    assert_eq!(session.automatic_shadows().get(0), Some(ItemId(7)));
    assert_eq!(
        store.get(GROUP, SHADOW_DATA_KEY).unwrap(),
        Some(r#"{"0":7}"#.to_owned())
    );

    // The item lands back in slot 0: the shadow is gone and so is the
    // stored key, a 1-slot inventory leaves nowhere to relocate.
    container.put(0, Some(7));
    session.on_container_changed();
    assert!(session.automatic_shadows().is_empty());
    assert_eq!(store.get(GROUP, SHADOW_DATA_KEY).unwrap(), None);
    assert!(session.view_handle().load().automatic.is_empty());
}

#[test]
fn shadows_persist_across_sessions() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    container.put(3, Some(42));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);
    container.put(3, None);
    session.on_container_changed();
    assert_eq!(session.automatic_shadows().get(3), Some(ItemId(42)));

    // Logout clears the in-memory state but not the store.
    session.on_session_end();
    assert_eq!(session.phase(), SessionPhase::Uninitialized);
    assert!(session.automatic_shadows().is_empty());

    // A fresh session against the same store restores the shadow.
    let mut next = new_session(28, &store, &container);
    bring_up(&mut next);
    assert_eq!(next.automatic_shadows().get(3), Some(ItemId(42)));
}

#[test]
fn session_end_resets_manual_shadows_too() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);
    session.rebuild_manual(&[Some("77".to_owned())]);
    assert_eq!(session.manual_shadows().get(0), Some(ItemId(77)));

    // Logout drops the manual set with the rest of the session state;
    // nothing lingers in the view until the next rebuild arrives.
    session.on_session_end();

    assert!(session.manual_shadows().is_empty());
    assert!(session.view_handle().load().manual.is_empty());
}

#[test]
fn clear_slot_clears_both_sets_and_backing_config() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    container.put(1, Some(100));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);

    store.set(GROUP, "manual_slot_1", "77").unwrap();
    session.rebuild_manual(&[None, Some("77".to_owned())]);

    container.put(1, None);
    session.on_container_changed();
    assert_eq!(session.automatic_shadows().get(1), Some(ItemId(100)));
    assert_eq!(session.manual_shadows().get(1), Some(ItemId(77)));

    let outcome = session.clear_slot(1).unwrap();
    assert_eq!(outcome.automatic, Some(ItemId(100)));
    assert_eq!(outcome.manual, Some(ItemId(77)));
    assert!(outcome.cleared_any());

    assert_eq!(store.get(GROUP, "manual_slot_1").unwrap(), None);
    assert_eq!(store.get(GROUP, SHADOW_DATA_KEY).unwrap(), None);
    let view = session.view_handle().load();
    assert!(view.automatic.is_empty());
    assert!(view.manual.is_empty());
}

#[test]
fn clear_slot_out_of_range_is_rejected_without_mutation() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(4));
    container.put(0, Some(5));

    let mut session = new_session(4, &store, &container);
    bring_up(&mut session);
    container.put(0, None);
    session.on_container_changed();
    let before = session.automatic_shadows().clone();

    let err = session.clear_slot(4).unwrap_err();
    assert!(err.to_string().contains("out of range"));
    assert_eq!(session.automatic_shadows(), &before);
}

#[test]
fn clear_all_reports_count_and_unsets_key() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    container.put(0, Some(1));
    container.put(1, Some(2));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);
    container.put(0, None);
    container.put(1, None);
    session.on_container_changed();
    assert_eq!(session.automatic_shadows().len(), 2);

    assert_eq!(session.clear_all(), 2);
    assert!(session.automatic_shadows().is_empty());
    assert_eq!(store.get(GROUP, SHADOW_DATA_KEY).unwrap(), None);

    // Nothing left to clear; the second invocation is a quiet no-op.
    assert_eq!(session.clear_all(), 0);
}

#[test]
fn overlapping_manual_and_automatic_entries_both_render() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    container.put(5, Some(9));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);
    container.put(5, None);
    session.on_container_changed();

    let mut entries = vec![None; 28];
    entries[5] = Some("123".to_owned());
    session.rebuild_manual(&entries);

    // No precedence between the two maps; the view carries both.
    let view = session.view_handle().load();
    assert_eq!(view.automatic.get(&5), Some(&ItemId(9)));
    assert_eq!(view.manual.get(&5), Some(&ItemId(123)));
}

#[test]
fn render_view_is_readable_from_another_thread() {
    init_tracing();
    let store = Arc::new(InMemoryConfigStore::new());
    let container = Arc::new(FakeContainer::new(28));
    container.put(2, Some(11));

    let mut session = new_session(28, &store, &container);
    bring_up(&mut session);
    container.put(2, None);
    session.on_container_changed();

    let handle = session.view_handle();
    let reader = thread::spawn(move || {
        let view = handle.load();
        view.automatic.get(&2).copied()
    });

    assert_eq!(reader.join().unwrap(), Some(ItemId(11)));
}
