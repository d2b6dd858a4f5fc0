//! Read-only composite view of both shadow maps for rendering.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use shadow_core::{ItemId, Slot};

/// Immutable snapshot of both shadow maps, re-published after every
/// mutation.
///
/// The two maps are kept separate on purpose: when an automatic and a
/// manual entry target the same slot, no draw precedence is defined and
/// the consumer may render both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderView {
    pub automatic: BTreeMap<Slot, ItemId>,
    pub manual: BTreeMap<Slot, ItemId>,
}

/// Cloneable handle for reading the current [`RenderView`].
///
/// Reads are lock-free and may run on a render thread interleaved with
/// the very next reconciliation pass; each `load` returns the view as of
/// the last completed mutation.
#[derive(Clone)]
pub struct ViewHandle {
    inner: Arc<ArcSwap<RenderView>>,
}

impl ViewHandle {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(RenderView::default())),
        }
    }

    /// Returns the most recently published view.
    pub fn load(&self) -> Arc<RenderView> {
        self.inner.load_full()
    }

    pub(crate) fn publish(&self, view: RenderView) {
        self.inner.store(Arc::new(view));
    }
}
