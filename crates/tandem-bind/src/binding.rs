//! Attachment of an external list to a host's selection.

use std::{fmt, sync::Arc};

use tandem_core::{ObservableCollection, Synchronizer};

use crate::error::BindError;

/// A control that owns a selection collection.
pub trait SelectionHost<T> {
    /// The collection to synchronize against, if the host has one.
    fn selected_items(&self) -> Option<Arc<dyn ObservableCollection<T>>>;
}

/// Binds an externally supplied list to a host's selection.
///
/// Holds at most one active synchronizer. The host's selection is master;
/// the external list is target.
pub struct SelectionBinding<T, H> {
    host: H,
    synchronized: Option<Arc<dyn ObservableCollection<T>>>,
    synchronizer: Option<Synchronizer<T, T>>,
}

impl<T, H> SelectionBinding<T, H>
where
    T: Clone + PartialEq + Send + Sync + 'static,
    H: SelectionHost<T>,
{
    /// Create an unbound binding for `host`.
    pub fn new(host: H) -> Self {
        Self { host, synchronized: None, synchronizer: None }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The currently bound external list.
    pub fn synchronized(&self) -> Option<&Arc<dyn ObservableCollection<T>>> {
        self.synchronized.as_ref()
    }

    /// Whether a synchronizer is active.
    pub fn is_attached(&self) -> bool {
        self.synchronizer.as_ref().is_some_and(Synchronizer::is_running)
    }

    /// Replace the bound list.
    ///
    /// Any previous synchronizer is stopped first. With `Some(list)`, a new
    /// synchronizer is created and started; with `None` the binding is only
    /// detached.
    ///
    /// # Errors
    ///
    /// - `BindError::NoSelection` if the host has no selection collection
    /// - `BindError::Sync` if the initial reconciliation fails
    pub fn set_synchronized(
        &mut self,
        list: Option<Arc<dyn ObservableCollection<T>>>,
    ) -> Result<(), BindError> {
        if let Some(previous) = self.synchronizer.take() {
            previous.stop();
            tracing::debug!("detached previous synchronized list");
        }

        self.synchronized.clone_from(&list);
        let Some(list) = list else {
            return Ok(());
        };

        let selection = self.host.selected_items().ok_or(BindError::NoSelection)?;
        let synchronizer = Synchronizer::new(selection, list);
        synchronizer.start()?;
        self.synchronizer = Some(synchronizer);

        Ok(())
    }

    /// Stop synchronizing and forget the bound list.
    pub fn detach(&mut self) {
        if let Some(synchronizer) = self.synchronizer.take() {
            synchronizer.stop();
        }
        self.synchronized = None;
    }
}

impl<T, H> fmt::Debug for SelectionBinding<T, H>
where
    H: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionBinding")
            .field("host", &self.host)
            .field("synchronized", &self.synchronized.as_ref().map(|list| list.id()))
            .field("synchronizer", &self.synchronizer)
            .finish()
    }
}
