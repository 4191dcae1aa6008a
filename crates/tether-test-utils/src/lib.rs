//! Test fixtures for Tether development.
//!
//! Provides ready-made observers wired to inspectable sinks: [`Tally`] for
//! counting deliveries and [`Recorder`] for capturing delivered values.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{Recorder, Tally};
