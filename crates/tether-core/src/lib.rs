//! Subject/observer signal primitive with lifecycle-safe bidirectional links.
//!
//! A [`Subject`] holds zero or more [`Observer`]s; [`Subject::notify`]
//! delivers a value to every currently-linked observer's callback. The hard
//! part is not the dispatch but the integrity of the link between the two
//! sides: either side may be cloned, moved, or dropped at any time,
//! including from inside a callback while a dispatch on the same subject is
//! still running.
//!
//! Links are mirrored pairs of `Weak` references to each partner's
//! heap-pinned core, so neither side owns the other and moving a handle
//! never invalidates a link. Removal during an active dispatch tombstones
//! the slot instead of erasing it; the list is compacted once the outermost
//! dispatch returns, so an in-flight pass never skips or re-visits a live
//! slot.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use tether_core::{Observer, Subject};
//!
//! let heard = Rc::new(Cell::new(0u32));
//! let sink = Rc::clone(&heard);
//! let observer = Observer::new(move |delta: u32| sink.set(sink.get() + delta));
//!
//! let mut subject = Subject::new();
//! subject += &observer;
//! subject.notify(3);
//! subject.notify(4);
//! assert_eq!(heard.get(), 7);
//!
//! subject -= &observer;
//! subject.notify(100);
//! assert_eq!(heard.get(), 7);
//! ```
//!
//! # Reentrancy
//!
//! All methods take `&self`, so a subject shared as `Rc<Subject<T>>` can be
//! re-entered from inside its own dispatch: a callback may notify the same
//! subject again, attach or detach observers, replace callbacks, or drop an
//! observer handle. The one unsupported pattern is dropping the subject
//! that is currently dispatching, which the borrow checker rules out.
//!
//! # Threading
//!
//! Single-threaded by design. The types are `!Send` and `!Sync` (`Rc` +
//! `RefCell`), so the single-thread contract is enforced by the compiler
//! rather than documented as undefined behavior.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod link;
mod observer;
mod slot;
mod subject;

pub use observer::Observer;
pub use subject::Subject;
