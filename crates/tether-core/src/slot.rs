//! Subject-side link-list slots with tombstone support.
//!
//! A subject's link list is index-addressed during dispatch, so removal
//! while a dispatch is in flight must not shift positions. A removed link
//! becomes [`Slot::Empty`] (a tombstone) until the outermost dispatch
//! returns, at which point the subject compacts the list.

use crate::link;
use crate::observer::{ObserverCell, ObserverRef};

/// One entry in a subject's link list.
pub(crate) enum Slot<T> {
    /// A live link to an observer's core.
    Live(ObserverRef<T>),
    /// A tombstone left by a removal that happened mid-dispatch.
    Empty,
}

impl<T> Slot<T> {
    pub(crate) fn is_live(&self) -> bool {
        matches!(self, Slot::Live(_))
    }

    /// Whether this slot is a live link to exactly this observer core.
    ///
    /// Identity is the core allocation, not the handle, so it survives
    /// moves of the `Observer` value.
    pub(crate) fn refers_to(&self, observer: &ObserverCell<T>) -> bool {
        match self {
            Slot::Live(weak) => link::same_cell(weak, observer),
            Slot::Empty => false,
        }
    }
}
