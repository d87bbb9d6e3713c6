//! Fixed-size-slot pool allocators with free-list reuse.
//!
//! Two pools share one discipline: storage is acquired in chunks of
//! `slots_per_chunk` equally sized slots, freed slots are threaded onto an
//! intrusive free list, and alloc/free are O(1) with an occasional
//! chunk-sized growth step. Chunks are never returned individually — the
//! pool frees everything together when it is dropped.
//!
//! - [`RawPool`]: untyped byte records of a fixed size. While a slot is
//!   free, its leading bytes hold the link to the next free slot; while
//!   allocated, all bytes belong to the caller.
//! - [`Pool`]: typed records. A slot is either vacant (holding the free
//!   link) or occupied (holding a `T`); freeing a slot that is not
//!   occupied is detected and warned.
//!
//! Both are single-threaded: every mutating operation takes `&mut self`,
//! and concurrent use of one pool from two threads does not compile.
//! Callers hold compact [`SlotHandle`]s rather than pointers and resolve
//! them through the pool, so every borrow ends with the pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod handle;
mod raw;
mod typed;

pub use handle::SlotHandle;
pub use raw::RawPool;
pub use typed::Pool;
