/// Engine configuration constants and tunable parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of slots in the tracked container. Slot indices are valid in
    /// `[0, inventory_size)`.
    pub inventory_size: usize,
}

impl EngineConfig {
    /// Capacity of the observed inventory (28 in the reference client).
    pub const DEFAULT_INVENTORY_SIZE: usize = 28;

    pub fn new() -> Self {
        Self {
            inventory_size: Self::DEFAULT_INVENTORY_SIZE,
        }
    }

    pub fn with_inventory_size(inventory_size: usize) -> Self {
        Self { inventory_size }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
