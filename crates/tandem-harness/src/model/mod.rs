//! Reference model for model-based testing.
//!
//! The model captures what a synchronizer guarantees without any of the
//! machinery: no listeners, no suspension, no locks. Each propagated change
//! is replayed directly on the other vector.
//!
//! # Design Principles
//!
//! - Simplicity: the model should be obviously correct
//! - Deterministic: same inputs produce same outputs
//! - Veto is fixed: the target admits a value iff [`admitted_by_target`]

pub mod operation;
mod world;

pub use operation::{ModelIndex, ModelValue, Operation, OperationError, OperationResult};
pub use world::{ModelWorld, ObservableState, admitted_by_target};
