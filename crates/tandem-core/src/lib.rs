//! Two-collection synchronization.
//!
//! Keeps a *master* and a *target* observable collection element-wise equal
//! through an [`ItemConverter`], propagating every structural change from
//! either side to the other.
//!
//! ## Architecture
//!
//! ```text
//! tandem-core
//!   ├─ CollectionChange      (structural change notification)
//!   ├─ ObservableCollection  (notification boundary, subscribe/suspend)
//!   ├─ ObservableList        (concrete shared list with admission policy)
//!   ├─ ItemConverter         (master <-> target element mapping)
//!   └─ Synchronizer          (listens to both, applies translated changes)
//! ```
//!
//! ## Loop prevention
//!
//! A propagated write never re-enters the synchronizer: the destination's
//! subscription is suspended for exactly the duration of that write. The
//! sender's own notifications keep flowing normally.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod change;
pub mod collection;
pub mod convert;
mod error;
pub mod list;
pub mod sync;

pub use change::{ChangeKind, CollectionChange};
pub use collection::{
    ChangeListener, CollectionId, ObservableCollection, SubscriptionId, Suspended,
};
pub use convert::{ConversionError, FnConverter, IdentityConverter, ItemConverter};
pub use error::SyncError;
pub use list::{AdmissionPolicy, ObservableList};
pub use sync::{SyncPhase, Synchronizer};
