//! Field change notification
//!
//! Entities announce every field change to registered observers. The dirty
//! flag is one such observer, subscribed to each serialized property.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What kind of change happened to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The whole value was replaced via `set`
    Replaced,
    /// The contents of a list field changed via `edit_list`
    ListContents,
}

/// A single field change event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    /// Name of the changed field
    pub field: String,
    /// Kind of change
    pub kind: ChangeKind,
}

/// Handle returned by observer registration, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Callback = Box<dyn FnMut(&FieldChange) + Send>;

struct Observer {
    id: ObserverId,
    /// `None` observes every field
    field: Option<String>,
    callback: Callback,
}

/// Registered observers of one entity
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<Observer>,
}

impl Observers {
    pub(crate) fn subscribe(&mut self, field: Option<String>, callback: Callback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push(Observer {
            id,
            field,
            callback,
        });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|o| o.id != id);
        self.entries.len() != before
    }

    /// Dispatch in registration order
    pub(crate) fn notify(&mut self, change: &FieldChange) {
        for observer in &mut self.entries {
            let interested = observer
                .field
                .as_deref()
                .map_or(true, |f| f == change.field);
            if interested {
                (observer.callback)(change);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}

/// Shared dirty flag
///
/// Cloned into the observer closures; every clone reads and writes the
/// same flag.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    /// Create a clean flag
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    #[inline]
    pub fn set(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn clear(&self) {
        self.0.store(false, Ordering::Release);
    }
}
