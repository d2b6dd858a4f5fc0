//! Host-facing orchestration for the shadow reconciliation engine.
//!
//! This crate wires the pure [`shadow_core`] engine to the concerns a
//! host client brings: the session lifecycle around login/logout, flat
//! key/value configuration storage, persistence of the automatic shadow
//! set, and a lock-free read view for the render thread.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the lifecycle state machine and event entry points
//! - [`store`] provides the configuration store contract and adapters
//! - [`persistence`] owns the empty-set ⇒ unset-key storage convention
//! - [`view`] publishes the composite read-only view for rendering
pub mod persistence;
pub mod session;
pub mod store;
pub mod view;

pub use session::{Session, SessionConfig, SessionError, SessionPhase, SlotClearOutcome};
pub use store::{ConfigStore, FileConfigStore, InMemoryConfigStore, StoreError};
pub use view::{RenderView, ViewHandle};
