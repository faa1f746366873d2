//! Reference model for synchronizer testing.
//!
//! The `model` module holds an obviously-correct rendition of a running
//! synchronizer over two plain vectors. Operations are applied to both the
//! model and a real [`tandem_core::Synchronizer`], and their observable
//! states are compared.
//!
//! # Model-Based Testing
//!
//! ```text
//! Vec<Operation> ──┬──▶ ModelWorld ──▶ ObservableState ─┐
//!                  │                                    ├─▶ assert_eq
//!                  └──▶ RealWorld  ──▶ ObservableState ─┘
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod model;
mod real;

pub use model::{
    ModelIndex, ModelValue, ModelWorld, ObservableState, Operation, OperationError,
    OperationResult, admitted_by_target,
};
pub use real::RealWorld;
