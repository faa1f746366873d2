//! Selected-items binding demo.
//!
//! A view model owns plain observable lists. Selector controls are bound to
//! those lists, so the view model never touches a selector directly.
//!
//! # Architecture
//!
//! ```text
//! ItemSelector(names) ◀──sync──▶ selected_names ──mapper──┐
//!                                                         ▼
//! ItemSelector(secondaries) ◀──sync──▶ selected_secondaries
//!
//! RangeSelector(days) ◀──sync──▶ selected_days
//! ```
//!
//! Selecting exactly one name selects every secondary derived from it; any
//! other selection clears the secondaries.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod model;
mod scenario;

pub use model::{DemoModel, secondaries_for};
pub use scenario::{Report, Scenario};
