//! Symmetric link bookkeeping between subjects and observers.
//!
//! A link always exists as a mirrored pair: a slot in the subject's list
//! and a back-reference in the observer's list, created and destroyed
//! together. Every operation that touches a link — attach, detach, clear,
//! handle drop, `clone_from` — routes through this module; nothing else
//! mutates either list. A pair found on exactly one side means the graph
//! is corrupted, and the primitives panic rather than limp on.

use std::rc::{Rc, Weak};

use crate::observer::ObserverCell;
use crate::slot::Slot;
use crate::subject::SubjectCell;

/// Panic message for an edge recorded on one side only.
const ONE_SIDED_EDGE: &str = "link graph corrupted: edge present on one side only";

/// Panic message for a live reference whose partner core is gone.
pub(crate) const DANGLING_PARTNER: &str = "link graph corrupted: dangling partner reference";

/// Allocation-pointer identity between a weak link and a partner's core.
pub(crate) fn same_cell<C>(weak: &Weak<C>, strong: &Rc<C>) -> bool {
    std::ptr::eq(weak.as_ptr(), Rc::as_ptr(strong))
}

/// Create one link between a subject and an observer.
///
/// No duplicate check: linking the same pair twice yields two independent
/// slots, each of which must be torn down independently.
pub(crate) fn link<T>(subject: &SubjectCell<T>, observer: &ObserverCell<T>) {
    subject
        .borrow_mut()
        .slots
        .push(Slot::Live(Rc::downgrade(observer)));
    observer.borrow_mut().subjects.push(Rc::downgrade(subject));
}

/// Remove one link between a subject and an observer, if any exists.
///
/// Both sides search for the last occurrence of the pair. The observer
/// side is always erased physically. The subject side is erased only when
/// the subject is idle; mid-dispatch it is tombstoned so the indices of
/// the in-flight pass stay valid, and compacted when the outermost
/// dispatch returns.
///
/// Removing a pair that is not linked is a no-op. Finding the pair on one
/// side but not the other panics: a live edge implies its mirror exists.
pub(crate) fn unlink<T>(subject: &SubjectCell<T>, observer: &ObserverCell<T>) {
    let observer_side = {
        let mut core = observer.borrow_mut();
        match core.subjects.iter().rposition(|weak| same_cell(weak, subject)) {
            Some(index) => {
                core.subjects.remove(index);
                true
            }
            None => false,
        }
    };

    let subject_side = {
        let mut core = subject.borrow_mut();
        match core.slots.iter().rposition(|slot| slot.refers_to(observer)) {
            Some(index) => {
                if core.depth == 0 {
                    core.slots.remove(index);
                } else {
                    core.slots[index] = Slot::Empty;
                }
                true
            }
            None => false,
        }
    };

    assert!(observer_side == subject_side, "{ONE_SIDED_EDGE}");
}

/// Remove every link a subject holds.
///
/// All back-references to the subject are erased from each linked
/// observer (duplicates included), then the slot list is cleared — or
/// fully tombstoned if a dispatch is in flight, same rule as [`unlink`].
pub(crate) fn clear_subject<T>(subject: &SubjectCell<T>) {
    let mut core = subject.borrow_mut();
    for slot in &core.slots {
        if let Slot::Live(weak) = slot {
            let observer = weak.upgrade().expect(DANGLING_PARTNER);
            observer
                .borrow_mut()
                .subjects
                .retain(|weak| !same_cell(weak, subject));
        }
    }
    if core.depth == 0 {
        core.slots.clear();
    } else {
        for slot in core.slots.iter_mut() {
            *slot = Slot::Empty;
        }
    }
}

/// Remove every link an observer holds.
///
/// Repeatedly unlinks the observer's most recent subject link until none
/// remain. Delegates to [`unlink`], so it honors each subject's dispatch
/// state.
pub(crate) fn teardown<T>(observer: &ObserverCell<T>) {
    loop {
        let weak = {
            let core = observer.borrow();
            match core.subjects.last() {
                Some(weak) => weak.clone(),
                None => break,
            }
        };
        let subject = weak.upgrade().expect(DANGLING_PARTNER);
        unlink(&subject, observer);
    }
}

#[cfg(test)]
mod tests {
    use crate::{Observer, Subject};

    #[test]
    fn attach_links_both_sides() {
        let subject = Subject::new();
        let observer = Observer::new(|_: u8| {});
        subject.attach(&observer);
        assert_eq!(subject.attach_count(&observer), 1);
        assert_eq!(observer.attach_count(&subject), 1);
    }

    #[test]
    fn detach_removes_exactly_one_of_a_duplicate_pair() {
        let subject = Subject::new();
        let observer = Observer::new(|_: u8| {});
        subject.attach(&observer);
        subject.attach(&observer);
        assert_eq!(subject.attach_count(&observer), 2);

        subject.detach(&observer);
        assert_eq!(subject.attach_count(&observer), 1);
        assert_eq!(observer.attach_count(&subject), 1);

        subject.detach(&observer);
        assert_eq!(subject.attach_count(&observer), 0);
        assert_eq!(observer.attach_count(&subject), 0);
    }

    #[test]
    fn detach_when_not_linked_is_a_noop() {
        let subject = Subject::new();
        let observer = Observer::new(|_: u8| {});
        subject.detach(&observer);
        assert_eq!(subject.observer_count(), 0);
        assert_eq!(observer.subject_count(), 0);
    }

    #[test]
    fn clear_unlinks_all_observers_including_duplicates() {
        let subject = Subject::new();
        let a = Observer::new(|_: u8| {});
        let b = Observer::new(|_: u8| {});
        subject.attach(&a);
        subject.attach(&b);
        subject.attach(&a);

        subject.clear();
        assert_eq!(subject.observer_count(), 0);
        assert_eq!(a.subject_count(), 0);
        assert_eq!(b.subject_count(), 0);
    }

    #[test]
    fn detach_all_unlinks_observer_from_every_subject() {
        let s1 = Subject::new();
        let s2 = Subject::new();
        let observer = Observer::new(|_: u8| {});
        s1.attach(&observer);
        s2.attach(&observer);
        s2.attach(&observer);

        observer.detach_all();
        assert_eq!(observer.subject_count(), 0);
        assert_eq!(s1.observer_count(), 0);
        assert_eq!(s2.observer_count(), 0);
    }

    #[cfg(not(miri))]
    mod proptests {
        use std::cell::Cell;
        use std::rc::Rc;

        use proptest::prelude::*;

        use crate::{Observer, Subject};

        const SUBJECTS: usize = 3;
        const OBSERVERS: usize = 4;

        #[derive(Clone, Copy, Debug)]
        enum Op {
            Attach(usize, usize),
            Detach(usize, usize),
            Notify(usize),
            Clear(usize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0..SUBJECTS, 0..OBSERVERS).prop_map(|(s, o)| Op::Attach(s, o)),
                (0..SUBJECTS, 0..OBSERVERS).prop_map(|(s, o)| Op::Detach(s, o)),
                (0..SUBJECTS).prop_map(Op::Notify),
                (0..SUBJECTS).prop_map(Op::Clear),
            ]
        }

        proptest! {
            /// Random attach/detach/notify/clear sequences keep both sides'
            /// views of every pair identical, and each notify delivers to
            /// each observer exactly once per live link.
            #[test]
            fn link_churn_preserves_symmetry(
                ops in proptest::collection::vec(op_strategy(), 1..120),
            ) {
                let subjects: Vec<Subject<u32>> =
                    (0..SUBJECTS).map(|_| Subject::new()).collect();
                let tallies: Vec<Rc<Cell<u64>>> =
                    (0..OBSERVERS).map(|_| Rc::new(Cell::new(0))).collect();
                let observers: Vec<Observer<u32>> = tallies
                    .iter()
                    .map(|tally| {
                        let tally = Rc::clone(tally);
                        Observer::new(move |_| tally.set(tally.get() + 1))
                    })
                    .collect();

                // Model: link multiplicity per (subject, observer) pair.
                let mut model = [[0usize; OBSERVERS]; SUBJECTS];

                for op in ops {
                    match op {
                        Op::Attach(s, o) => {
                            subjects[s].attach(&observers[o]);
                            model[s][o] += 1;
                        }
                        Op::Detach(s, o) => {
                            subjects[s].detach(&observers[o]);
                            model[s][o] = model[s][o].saturating_sub(1);
                        }
                        Op::Notify(s) => {
                            let before: Vec<u64> =
                                tallies.iter().map(|t| t.get()).collect();
                            subjects[s].notify(0);
                            for o in 0..OBSERVERS {
                                prop_assert_eq!(
                                    tallies[o].get() - before[o],
                                    model[s][o] as u64,
                                    "delivery count mismatch for pair ({}, {})",
                                    s,
                                    o
                                );
                            }
                        }
                        Op::Clear(s) => {
                            subjects[s].clear();
                            model[s] = [0; OBSERVERS];
                        }
                    }
                }

                for (s, subject) in subjects.iter().enumerate() {
                    let mut live = 0;
                    for (o, observer) in observers.iter().enumerate() {
                        prop_assert_eq!(subject.attach_count(observer), model[s][o]);
                        prop_assert_eq!(observer.attach_count(subject), model[s][o]);
                        live += model[s][o];
                    }
                    prop_assert_eq!(subject.observer_count(), live);
                }
                for (o, observer) in observers.iter().enumerate() {
                    let total: usize = (0..SUBJECTS).map(|s| model[s][o]).sum();
                    prop_assert_eq!(observer.subject_count(), total);
                }
            }

            /// Dropping any subset of handles leaves the survivors with a
            /// consistent link graph and no dangling references.
            #[test]
            fn handle_drops_leave_survivors_consistent(
                pairs in proptest::collection::vec(
                    (0..SUBJECTS, 0..OBSERVERS), 0..24),
                drop_subjects in proptest::collection::vec(any::<bool>(), SUBJECTS),
                drop_observers in proptest::collection::vec(any::<bool>(), OBSERVERS),
            ) {
                let mut subjects: Vec<Option<Subject<u32>>> =
                    (0..SUBJECTS).map(|_| Some(Subject::new())).collect();
                let mut observers: Vec<Option<Observer<u32>>> =
                    (0..OBSERVERS).map(|_| Some(Observer::new(|_| {}))).collect();
                let mut model = [[0usize; OBSERVERS]; SUBJECTS];

                for (s, o) in pairs {
                    subjects[s].as_ref().unwrap().attach(observers[o].as_ref().unwrap());
                    model[s][o] += 1;
                }
                for (s, dead) in drop_subjects.iter().enumerate() {
                    if *dead {
                        subjects[s] = None;
                        model[s] = [0; OBSERVERS];
                    }
                }
                for (o, dead) in drop_observers.iter().enumerate() {
                    if *dead {
                        observers[o] = None;
                        for row in model.iter_mut() {
                            row[o] = 0;
                        }
                    }
                }

                for (s, subject) in subjects.iter().enumerate() {
                    let Some(subject) = subject else { continue };
                    let mut live = 0;
                    for (o, observer) in observers.iter().enumerate() {
                        let Some(observer) = observer else { continue };
                        prop_assert_eq!(subject.attach_count(observer), model[s][o]);
                        prop_assert_eq!(observer.attach_count(subject), model[s][o]);
                        live += model[s][o];
                    }
                    prop_assert_eq!(subject.observer_count(), live);
                    // Survivors must still dispatch without panicking.
                    subject.notify(0);
                }
            }
        }
    }
}
