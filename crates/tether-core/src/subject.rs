//! The subject half of the pair, including reentrancy-safe dispatch.

use std::cell::RefCell;
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::link;
use crate::observer::Observer;
use crate::slot::Slot;

pub(crate) type SubjectCell<T> = Rc<RefCell<SubjectCore<T>>>;
pub(crate) type SubjectRef<T> = Weak<RefCell<SubjectCore<T>>>;

/// Heap-pinned state of a subject. Link identity is this allocation, so it
/// survives moves of the owning [`Subject`] handle.
pub(crate) struct SubjectCore<T> {
    /// Linked observers in attach order. Tombstoned, never erased, while a
    /// dispatch is in flight. Small fan-outs stay inline.
    pub(crate) slots: SmallVec<[Slot<T>; 4]>,
    /// Count of dispatch calls currently on the stack for this subject.
    pub(crate) depth: u32,
}

/// Dispatches values to a set of linked [`Observer`]s.
///
/// All methods take `&self`, so a subject shared as `Rc<Subject<T>>` can be
/// re-entered from inside its own dispatch. Dropping a subject unlinks it
/// from every observer.
///
/// Cloning reproduces the link set: the clone holds a fresh, independent
/// link to each observer the source holds. This is asymmetric with
/// [`Observer`]'s clone, which copies the callback only; the asymmetry is
/// deliberate.
pub struct Subject<T> {
    pub(crate) cell: SubjectCell<T>,
}

/// Restores dispatch depth on exit from [`Subject::notify`], including
/// unwinds out of a panicking callback. Compacts tombstones once the
/// outermost dispatch has left the stack.
struct DispatchGuard<'a, T> {
    cell: &'a SubjectCell<T>,
}

impl<T> Drop for DispatchGuard<'_, T> {
    fn drop(&mut self) {
        let mut core = self.cell.borrow_mut();
        core.depth -= 1;
        if core.depth == 0 {
            core.slots.retain(|slot| slot.is_live());
        }
    }
}

impl<T> Subject<T> {
    /// Create a subject with no observers.
    pub fn new() -> Self {
        Self {
            cell: Rc::new(RefCell::new(SubjectCore {
                slots: SmallVec::new(),
                depth: 0,
            })),
        }
    }

    /// Link an observer to this subject.
    ///
    /// No duplicate check: attaching the same observer twice delivers
    /// twice per notify, and each link is detached independently. A link
    /// made from inside a dispatch on this subject is first delivered to
    /// by the *next* notify, never the one in flight.
    pub fn attach(&self, observer: &Observer<T>) {
        link::link(&self.cell, &observer.cell);
    }

    /// Remove one link to the given observer, if any exists (the most
    /// recently attached one). A no-op when the pair is not linked.
    pub fn detach(&self, observer: &Observer<T>) {
        link::unlink(&self.cell, &observer.cell);
    }

    /// Remove all links this subject holds.
    pub fn clear(&self) {
        link::clear_subject(&self.cell);
    }

    /// Number of live links, duplicates included.
    pub fn observer_count(&self) -> usize {
        self.cell
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.is_live())
            .count()
    }

    /// Whether this subject has no live links.
    pub fn is_empty(&self) -> bool {
        self.observer_count() == 0
    }

    /// Number of live links between this subject and the given observer.
    pub fn attach_count(&self, observer: &Observer<T>) -> usize {
        self.cell
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.refers_to(&observer.cell))
            .count()
    }

    /// Deliver `args` to every observer linked at the time of the call.
    ///
    /// Observers are invoked in link order, each receiving its own clone
    /// of `args`. Callbacks may freely mutate the subject: re-enter it,
    /// attach or detach observers (including the one currently running),
    /// replace callbacks, or drop observer handles. Links added during the
    /// pass are not visited by it; links removed during the pass are
    /// tombstoned so no live slot is skipped or re-visited.
    pub fn notify(&self, args: T)
    where
        T: Clone,
    {
        let captured = {
            let mut core = self.cell.borrow_mut();
            core.depth += 1;
            core.slots.len()
        };
        let _guard = DispatchGuard { cell: &self.cell };

        for index in 0..captured {
            // Borrows are scoped so that nothing is held while the
            // callback runs; the callback may re-borrow both cores.
            let target = {
                let core = self.cell.borrow();
                match &core.slots[index] {
                    Slot::Live(weak) => {
                        Some(weak.upgrade().expect(link::DANGLING_PARTNER))
                    }
                    Slot::Empty => None,
                }
            };
            let Some(observer) = target else { continue };
            let callback = observer.borrow().callback.clone();
            if let Some(callback) = callback {
                callback(args.clone());
            }
        }
    }
}

impl<T> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subject<T> {
    /// A fresh subject linked to every observer the source holds, in the
    /// same order, duplicates included. The two link sets are independent.
    fn clone(&self) -> Self {
        let fresh = Self::new();
        let core = self.cell.borrow();
        for slot in &core.slots {
            if let Slot::Live(weak) = slot {
                let observer = weak.upgrade().expect(link::DANGLING_PARTNER);
                link::link(&fresh.cell, &observer);
            }
        }
        drop(core);
        fresh
    }

    /// Clears the target's existing links, then re-creates the source's.
    fn clone_from(&mut self, source: &Self) {
        link::clear_subject(&self.cell);
        let core = source.cell.borrow();
        for slot in &core.slots {
            if let Slot::Live(weak) = slot {
                let observer = weak.upgrade().expect(link::DANGLING_PARTNER);
                link::link(&self.cell, &observer);
            }
        }
    }
}

impl<T> Drop for Subject<T> {
    fn drop(&mut self) {
        // Depth is always 0 here: a dispatching subject is borrowed and
        // cannot be dropped, so this erases rather than tombstones.
        link::clear_subject(&self.cell);
    }
}

impl<T> AddAssign<&Observer<T>> for Subject<T> {
    /// Shorthand for [`Subject::attach`].
    fn add_assign(&mut self, observer: &Observer<T>) {
        self.attach(observer);
    }
}

impl<T> SubAssign<&Observer<T>> for Subject<T> {
    /// Shorthand for [`Subject::detach`].
    fn sub_assign(&mut self, observer: &Observer<T>) {
        self.detach(observer);
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observer_count())
            .finish()
    }
}
