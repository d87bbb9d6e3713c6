//! strata: a memory-management toolkit for simulation and numerical code.
//!
//! This is the facade crate re-exporting the public API from the strata
//! sub-crates. For most users, adding `strata` as a single dependency is
//! sufficient.
//!
//! Three complementary allocation strategies, all single-threaded and
//! handle-based:
//!
//! | Strategy | Type | Free individual elements? | Best for |
//! |----------|------|---------------------------|----------|
//! | Slot pool | [`Pool`], [`RawPool`] | yes, O(1) | many same-sized records with churn |
//! | Block arena | [`BlockArena`] | no (drop all at once) | write-once accumulation |
//! | Dimensioned array | [`Array`] | n/a (one flat allocation) | dense N-dimensional fields |
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // Pooled particles: fixed-size slots with O(1) alloc/free.
//! let mut pool: Pool<[f32; 3]> = Pool::new(256)?;
//! let p = pool.alloc([0.0, 1.0, 0.0])?;
//! pool.get_mut(p).expect("live slot")[1] += 1.0;
//! assert_eq!(pool.free(p), Some([0.0, 2.0, 0.0]));
//!
//! // Arena of graph nodes: grow-only, with contiguous runs.
//! let mut nodes: BlockArena<u32> = BlockArena::new(64)?;
//! let children = nodes.alloc_run(0..8u32)?;
//! assert_eq!(nodes.run(children).map(|run| run.len()), Some(8));
//!
//! // A 3-D field over one flat allocation.
//! let mut field: Array<f32, 3> = Array::filled([4, 4, 4], 0.0)?;
//! field[[1, 2, 3]] = 9.5;
//! assert_eq!(field.at(1).at(2).try_get(3), Ok(&9.5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Diagnostics
//!
//! Every allocation and release flows through [`storage`], which emits
//! `tracing` events gated by whatever subscriber the host installs, and
//! feeds the optional per-type [`accounting`] registry. Enable both once
//! at process start; nothing runs on the fast path otherwise.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub use strata_arena::{BlockArena, ElementHandle, RunHandle};
pub use strata_array::{Array, ArrayError, ArrayView, ArrayViewMut};
pub use strata_core::accounting;
pub use strata_core::StorageError;
pub use strata_pool::{Pool, RawPool, SlotHandle};

/// Traced storage primitives, re-exported from `strata-core`.
pub mod storage {
    pub use strata_core::storage::{
        alloc_storage, alloc_storage_with, release_storage, reserve_storage,
    };
}

/// The most common imports in one place.
pub mod prelude {
    pub use strata_arena::{BlockArena, ElementHandle, RunHandle};
    pub use strata_array::{Array, ArrayError, ArrayView, ArrayViewMut};
    pub use strata_core::StorageError;
    pub use strata_pool::{Pool, RawPool, SlotHandle};
}
