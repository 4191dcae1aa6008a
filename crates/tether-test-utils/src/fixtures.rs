//! Observer fixtures backed by shared, inspectable sinks.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tether_core::Observer;

/// A shared delivery counter.
///
/// Clones share the same count, so a test can keep the `Tally` and hand
/// observers built from it to the code under test.
pub struct Tally {
    count: Rc<Cell<u64>>,
}

impl Tally {
    pub fn new() -> Self {
        Self {
            count: Rc::new(Cell::new(0)),
        }
    }

    /// Number of deliveries counted so far.
    pub fn count(&self) -> u64 {
        self.count.get()
    }

    /// An observer that bumps this tally on every delivery, ignoring the
    /// delivered value.
    pub fn observer<T: 'static>(&self) -> Observer<T> {
        let count = Rc::clone(&self.count);
        Observer::new(move |_| count.set(count.get() + 1))
    }
}

impl Clone for Tally {
    fn clone(&self) -> Self {
        Self {
            count: Rc::clone(&self.count),
        }
    }
}

impl Default for Tally {
    fn default() -> Self {
        Self::new()
    }
}

/// A shared log of delivered values, in delivery order.
///
/// Clones share the same log, like [`Tally`].
pub struct Recorder<T> {
    log: Rc<RefCell<Vec<T>>>,
}

impl<T: 'static> Recorder<T> {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// An observer that appends every delivered value to this log.
    pub fn observer(&self) -> Observer<T> {
        let log = Rc::clone(&self.log);
        Observer::new(move |value| log.borrow_mut().push(value))
    }

    /// Snapshot of the values delivered so far.
    pub fn values(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.log.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<T: 'static> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}
