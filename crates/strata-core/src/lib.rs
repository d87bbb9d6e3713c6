//! Traced, fallible storage primitives for the strata memory toolkit.
//!
//! This is the leaf crate with zero internal dependencies. Every allocator
//! in the workspace obtains and returns its backing storage through the
//! functions in [`storage`], which report failure as a [`StorageError`]
//! instead of aborting and emit trace-level diagnostics around every
//! acquisition and release.
//!
//! Diagnostics are plain [`tracing`] events. Whether they fire is decided
//! by the subscriber the host process installs; with no subscriber (or a
//! level filter above `TRACE`) nothing runs on the allocation fast path.
//! The optional [`accounting`] registry adds per-type counters on top,
//! for tests and memory reports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod accounting;
pub mod error;
pub mod storage;

pub use error::StorageError;
pub use storage::{alloc_storage, alloc_storage_with, release_storage, reserve_storage};
