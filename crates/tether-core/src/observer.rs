//! The observer half of the subject/observer pair.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::link;
use crate::subject::{Subject, SubjectRef};

/// Shared, immutable callback storage. Cloned out of the core before each
/// invocation so a callback can replace itself mid-dispatch.
pub(crate) type Callback<T> = Rc<dyn Fn(T)>;

pub(crate) type ObserverCell<T> = Rc<RefCell<ObserverCore<T>>>;
pub(crate) type ObserverRef<T> = Weak<RefCell<ObserverCore<T>>>;

/// Heap-pinned state of an observer. Link identity is this allocation, so
/// it survives moves of the owning [`Observer`] handle.
pub(crate) struct ObserverCore<T> {
    pub(crate) callback: Option<Callback<T>>,
    /// Back-references to linked subjects, in link order, duplicates
    /// allowed. Most observers watch one or two subjects; keep those inline.
    pub(crate) subjects: SmallVec<[SubjectRef<T>; 2]>,
}

/// Holds a callback and tracks which [`Subject`]s it is linked to.
///
/// An observer without a callback is valid; deliveries to it are skipped.
/// Dropping an observer unlinks it from every subject, safely even while
/// one of those subjects is mid-dispatch.
///
/// Cloning copies the callback only — the clone starts with zero links.
/// This is asymmetric with [`Subject`]'s clone, which does reproduce its
/// link set; the asymmetry is deliberate.
pub struct Observer<T> {
    pub(crate) cell: ObserverCell<T>,
}

impl<T> Observer<T> {
    /// Create an observer with the given callback.
    pub fn new(callback: impl Fn(T) + 'static) -> Self {
        let callback: Callback<T> = Rc::new(callback);
        Self::from_callback(Some(callback))
    }

    fn from_callback(callback: Option<Callback<T>>) -> Self {
        Self {
            cell: Rc::new(RefCell::new(ObserverCore {
                callback,
                subjects: SmallVec::new(),
            })),
        }
    }

    /// Replace the callback. Takes effect for the next delivery; an
    /// invocation already in flight runs the old callback to completion.
    pub fn set_callback(&self, callback: impl Fn(T) + 'static) {
        let callback: Callback<T> = Rc::new(callback);
        self.cell.borrow_mut().callback = Some(callback);
    }

    /// Remove the callback. The observer stays linked; deliveries to it
    /// are skipped until a new callback is set.
    pub fn clear_callback(&self) {
        self.cell.borrow_mut().callback = None;
    }

    /// Whether a callback is currently set.
    pub fn has_callback(&self) -> bool {
        self.cell.borrow().callback.is_some()
    }

    /// Number of subject links this observer holds, duplicates included.
    pub fn subject_count(&self) -> usize {
        self.cell.borrow().subjects.len()
    }

    /// Number of links between this observer and the given subject.
    pub fn attach_count(&self, subject: &Subject<T>) -> usize {
        self.cell
            .borrow()
            .subjects
            .iter()
            .filter(|weak| link::same_cell(weak, &subject.cell))
            .count()
    }

    /// Unlink this observer from every subject it is linked to.
    pub fn detach_all(&self) {
        link::teardown(&self.cell);
    }
}

impl<T> Default for Observer<T> {
    /// An observer with no callback and no links.
    fn default() -> Self {
        Self::from_callback(None)
    }
}

impl<T> Clone for Observer<T> {
    /// Copies the callback only. The clone has no subject links.
    fn clone(&self) -> Self {
        let callback = self.cell.borrow().callback.clone();
        Self::from_callback(callback)
    }

    /// Tears down the target's existing links, then copies the callback.
    fn clone_from(&mut self, source: &Self) {
        link::teardown(&self.cell);
        let callback = source.cell.borrow().callback.clone();
        self.cell.borrow_mut().callback = callback;
    }
}

impl<T> Drop for Observer<T> {
    fn drop(&mut self) {
        link::teardown(&self.cell);
    }
}

impl<T> fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("subjects", &self.subject_count())
            .field("has_callback", &self.has_callback())
            .finish()
    }
}
