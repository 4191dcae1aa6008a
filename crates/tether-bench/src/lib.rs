//! Shared setup helpers for the Tether benchmarks.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::Cell;
use std::rc::Rc;

use tether_core::{Observer, Subject};

/// A subject fanned out to `n` counting observers.
///
/// Returns the observer handles alongside the subject — dropping them
/// would unlink everything — plus the shared delivery counter.
pub fn fan_out(n: usize) -> (Subject<u64>, Vec<Observer<u64>>, Rc<Cell<u64>>) {
    let subject = Subject::new();
    let count = Rc::new(Cell::new(0));
    let observers: Vec<Observer<u64>> = (0..n)
        .map(|_| {
            let count = Rc::clone(&count);
            Observer::new(move |_| count.set(count.get() + 1))
        })
        .collect();
    for observer in &observers {
        subject.attach(observer);
    }
    (subject, observers, count)
}
