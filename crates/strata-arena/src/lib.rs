//! Growable block arena for single and contiguous-run allocation.
//!
//! A [`BlockArena`] allocates typed elements in blocks and gives them out
//! either singly or in small contiguous runs, with forward iteration over
//! every element given out so far. To allocate the right amount without
//! knowing the total up front, blocks are sized from the previous block's
//! capacity — or from a caller-supplied estimator mapping the number of
//! elements used so far to the next block's capacity.
//!
//! There is no per-element free. The arena owns every block it ever
//! created, keeps used counters that only grow, and releases everything
//! together on drop. Callers hold compact handles ([`ElementHandle`],
//! [`RunHandle`]) resolved through the arena, so access after the arena
//! is gone does not compile.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod arena;
mod block;
mod handle;

pub use arena::BlockArena;
pub use handle::{ElementHandle, RunHandle};
