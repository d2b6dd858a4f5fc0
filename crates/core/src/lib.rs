//! Deterministic shadow bookkeeping for a fixed-size slotted inventory.
//!
//! `shadow-core` defines the canonical rules for "shadow" placeholders:
//! records of items that left an inventory slot, kept so the vacated slot
//! can still be rendered with a translucent copy of its old occupant. All
//! automatic shadow mutation flows through [`engine::ShadowEngine`], and
//! supporting crates depend on the types re-exported here.
pub mod codec;
pub mod config;
pub mod diff;
pub mod engine;
pub mod env;
pub mod manual;
pub mod state;

pub use codec::{CodecError, decode_shadows, encode_shadows};
pub use config::EngineConfig;
pub use diff::SnapshotDelta;
pub use engine::{PassOutcome, ShadowEngine, first_free_slot};
pub use env::{ContainerSource, ItemOracle, NoCanonicalization, OracleError};
pub use manual::ManualShadowRegistry;
pub use state::{ItemId, ShadowSet, Slot, Snapshot};
