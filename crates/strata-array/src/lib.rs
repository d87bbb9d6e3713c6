//! Bounds-checked multi-dimensional arrays over a single flat allocation.
//!
//! An [`Array<T, D>`](Array) acts like a `D`-dimensional array
//! `T[n_0]...[n_{D-1}]` while owning exactly one flat allocation of
//! `n_0 * ... * n_{D-1}` elements. Indexing goes through a precomputed
//! row-major stride vector, so no per-row pointer tables are ever
//! materialised.
//!
//! Two ways in:
//!
//! - whole coordinates: `a[[r, c]]`, [`Array::get`], [`Array::try_get`];
//! - one axis at a time: [`Array::at`] yields an [`ArrayView`] that
//!   narrows one dimension per step until rank 1, where indexing returns
//!   plain element references.
//!
//! Views borrow the array, so holding one across a reallocating
//! [`Array::reset`] is a compile error, not a dangling pointer.
//!
//! Per-axis bounds checks are compiled in by default; building with the
//! `unchecked-index` feature removes them from the `Index`/`at` fast
//! path for throughput-critical code. The `get`/`try_*` family checks in
//! every configuration and reports [`ArrayError::IndexOutOfBounds`] with
//! the offending axis.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod array;
mod error;
mod view;

pub use array::Array;
pub use error::ArrayError;
pub use view::{ArrayView, ArrayViewMut};
