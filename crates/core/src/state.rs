//! Core state types: item identities, inventory snapshots, and shadow maps.

use std::collections::BTreeMap;
use std::fmt;

/// Index of an inventory slot, valid in `[0, inventory_size)`.
pub type Slot = usize;

/// Opaque identifier for an item kind.
///
/// Empty slots are represented by `Option<ItemId>` at the container
/// boundary; inside the engine only occupied slots exist, so an `ItemId`
/// always names a real item. Canonicalization (collapsing e.g. currency
/// denominations onto one identity) happens through
/// [`crate::env::ItemOracle`] before an identity is used as a shadow key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl ItemId {
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sparse view of a slotted container: only occupied slots are present.
///
/// Derived fresh from the live container on every observed change; two
/// consecutive snapshots are compared by [`crate::diff::SnapshotDelta`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    slots: BTreeMap<Slot, ItemId>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a snapshot from the container's ordered cell sequence, one
    /// entry per slot with `None` for empty slots.
    pub fn from_cells(cells: &[Option<ItemId>]) -> Self {
        let slots = cells
            .iter()
            .enumerate()
            .filter_map(|(slot, cell)| cell.map(|item| (slot, item)))
            .collect();
        Self { slots }
    }

    pub fn get(&self, slot: Slot) -> Option<ItemId> {
        self.slots.get(&slot).copied()
    }

    pub fn is_occupied(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, ItemId)> + '_ {
        self.slots.iter().map(|(&slot, &item)| (slot, item))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<(Slot, ItemId)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (Slot, ItemId)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Mapping from slot to the item identity shadowed there.
///
/// Backs both the automatic set (owned and mutated exclusively by
/// [`crate::engine::ShadowEngine`], unit of persistence) and the manual
/// registry. Iteration is in ascending slot order, which makes lookup by
/// identity deterministic when duplicates exist.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ShadowSet {
    slots: BTreeMap<Slot, ItemId>,
}

impl ShadowSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a shadow, returning the previous occupant of the slot if
    /// any. Shadows do not stack; an existing entry is overwritten.
    pub fn insert(&mut self, slot: Slot, item: ItemId) -> Option<ItemId> {
        self.slots.insert(slot, item)
    }

    pub fn remove(&mut self, slot: Slot) -> Option<ItemId> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: Slot) -> Option<ItemId> {
        self.slots.get(&slot).copied()
    }

    pub fn contains_slot(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Returns the first slot (lowest index) holding the given identity.
    pub fn slot_holding(&self, item: ItemId) -> Option<Slot> {
        self.slots
            .iter()
            .find(|&(_, &held)| held == item)
            .map(|(&slot, _)| slot)
    }

    /// Removes every shadow, returning how many were held.
    pub fn clear(&mut self) -> usize {
        let cleared = self.slots.len();
        self.slots.clear();
        cleared
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, ItemId)> + '_ {
        self.slots.iter().map(|(&slot, &item)| (slot, item))
    }

    /// Copies the entries into a plain map for read-only consumers.
    pub fn to_map(&self) -> BTreeMap<Slot, ItemId> {
        self.slots.clone()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl FromIterator<(Slot, ItemId)> for ShadowSet {
    fn from_iter<I: IntoIterator<Item = (Slot, ItemId)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}
