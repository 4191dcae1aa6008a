//! Tether: a subject/observer signal primitive with lifecycle-safe links.
//!
//! This is the facade crate re-exporting the public API from `tether-core`.
//! A [`Subject`] dispatches values to linked [`Observer`]s; links are
//! mirrored weak-reference pairs that stay consistent when either side is
//! cloned, moved, or dropped — even from inside a callback while the
//! subject is mid-dispatch.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use tether::prelude::*;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&log);
//! let greeter = Observer::new(move |name: String| {
//!     sink.borrow_mut().push(format!("hello, {name}"));
//! });
//!
//! let mut on_join = Subject::new();
//! on_join += &greeter;
//! on_join.notify("ada".to_string());
//!
//! // Dropping an observer unlinks it; the subject keeps working.
//! drop(greeter);
//! on_join.notify("grace".to_string());
//!
//! assert_eq!(*log.borrow(), ["hello, ada"]);
//! ```
//!
//! Multi-argument signatures are expressed as tuples: a
//! `Subject<(u32, String)>` links only observers declared with the same
//! tuple type, so signature mismatches are compile errors.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use tether_core::{Observer, Subject};

/// Common imports for typical Tether usage.
///
/// ```rust
/// use tether::prelude::*;
/// ```
pub mod prelude {
    pub use tether_core::{Observer, Subject};
}
