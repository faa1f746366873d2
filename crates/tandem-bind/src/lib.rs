//! Selection binding.
//!
//! Connects a selection-bearing host (a list selector, a range picker) to an
//! externally supplied list and keeps the two synchronized.
//!
//! The host decides which collection plays master: its own selection. The
//! externally supplied list is the target. Replacing or clearing the target
//! always stops the previous synchronizer before a new one starts.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod binding;
mod error;
mod range;
mod selector;

pub use binding::{SelectionBinding, SelectionHost};
pub use error::BindError;
pub use range::RangeSelector;
pub use selector::{ItemSelector, SelectionMode};
