//! Traits describing the engine's external collaborators.
//!
//! The engine never talks to the host client directly: the live container
//! and item metadata are reached through these traits so the core stays
//! testable and free of host coupling.

use crate::state::ItemId;

/// Errors surfaced by oracle implementations.
///
/// Oracle failures are always recoverable from the engine's point of
/// view: canonicalization falls back to the raw identity.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("item lookup unavailable: {0}")]
    LookupUnavailable(String),
}

/// Read-only item metadata lookup.
///
/// `canonicalize` collapses raw identities that represent the same
/// logical item (e.g. currency denominations) onto one canonical
/// identity. It must behave as a pure lookup; failures are caught by the
/// caller and treated as "no canonicalization".
pub trait ItemOracle: Send + Sync {
    fn canonicalize(&self, item: ItemId) -> Result<ItemId, OracleError>;
}

/// Oracle that performs no collapsing; every identity is its own
/// canonical form. Useful default and test double.
pub struct NoCanonicalization;

impl ItemOracle for NoCanonicalization {
    fn canonicalize(&self, item: ItemId) -> Result<ItemId, OracleError> {
        Ok(item)
    }
}

/// Read-only access to the live slotted container.
///
/// Callers derive a fresh [`crate::state::Snapshot`] through this trait
/// once per triggering event and once at baseline establishment.
pub trait ContainerSource: Send + Sync {
    /// Current contents, one entry per slot, `None` for empty slots.
    fn cells(&self) -> Vec<Option<ItemId>>;
}
