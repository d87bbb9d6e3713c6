//! The arena: a growable list of blocks with a growth policy.

use strata_core::{release_storage, StorageError};

use crate::block::Block;
use crate::handle::{ElementHandle, RunHandle};

/// Maps the number of elements used so far to the next block's capacity.
type Estimator = Box<dyn Fn(usize) -> usize>;

/// Typed element arena with block-at-a-time growth.
///
/// Elements are given out singly ([`BlockArena::alloc`]) or in contiguous
/// runs ([`BlockArena::alloc_run`]) from the last block; when it cannot
/// satisfy a request a fresh block is appended. Blocks are never removed
/// or reused, and the whole arena drops at once. This allocator targets
/// write-once, grow-only usage such as accumulating tree or graph nodes
/// during a single build phase.
///
/// The total capacity and the used count both only ever grow.
///
/// # Example
///
/// ```
/// use strata_arena::BlockArena;
///
/// let mut nodes = BlockArena::new(128)?;
/// let root = nodes.alloc(0u32)?;
/// let kids = nodes.alloc_run([1, 2, 3])?;
/// assert_eq!(nodes.used(), 4);
/// assert_eq!(nodes.run(kids), Some(&[1, 2, 3][..]));
/// assert_eq!(nodes.element_index(root), Some(0));
/// # Ok::<(), strata_core::StorageError>(())
/// ```
pub struct BlockArena<T> {
    /// Blocks in allocation order; never shrinks.
    blocks: Vec<Block<T>>,
    total_capacity: usize,
    used: usize,
    estimator: Option<Estimator>,
}

impl<T> BlockArena<T> {
    /// Create an arena whose first block holds `initial_capacity`
    /// elements (clamped to at least 1). Without an estimator, each new
    /// block copies the previous block's capacity.
    pub fn new(initial_capacity: usize) -> Result<Self, StorageError> {
        Self::build(initial_capacity, None)
    }

    /// Create an arena with a growth estimator.
    ///
    /// When a new block is needed, `estimator(used_so_far)` names the
    /// desired capacity; estimates are clamped to at least 1 (and to the
    /// run length for run requests).
    pub fn with_estimator(
        initial_capacity: usize,
        estimator: impl Fn(usize) -> usize + 'static,
    ) -> Result<Self, StorageError> {
        Self::build(initial_capacity, Some(Box::new(estimator)))
    }

    fn build(initial_capacity: usize, estimator: Option<Estimator>) -> Result<Self, StorageError> {
        let capacity = initial_capacity.max(1);
        let first = Block::new(capacity)?;
        Ok(Self {
            blocks: vec![first],
            total_capacity: capacity,
            used: 0,
            estimator,
        })
    }

    fn last_block(&self) -> &Block<T> {
        self.blocks.last().expect("arena always holds a block")
    }

    /// Capacity the growth policy asks for, before run-length clamping.
    fn policy_capacity(&self) -> usize {
        match &self.estimator {
            Some(estimator) => estimator(self.used).max(1),
            None => self.last_block().capacity(),
        }
    }

    /// Append a fresh block able to hold at least `at_least` elements.
    fn grow(&mut self, at_least: usize) -> Result<(), StorageError> {
        let capacity = self.policy_capacity().max(at_least);
        let block = Block::new(capacity)?;
        self.blocks.push(block);
        self.total_capacity += capacity;
        Ok(())
    }

    /// Give out one element holding `value`.
    ///
    /// O(1) amortised; appends a block first when the last one is full.
    /// A failed growth propagates the error with `value` dropped and the
    /// arena unchanged.
    pub fn alloc(&mut self, value: T) -> Result<ElementHandle, StorageError> {
        if self.last_block().is_full() {
            self.grow(1)?;
        }
        let block = self.blocks.len() - 1;
        let index = self.blocks[block].push(value);
        self.used += 1;
        Ok(ElementHandle::new(block, index))
    }

    /// Give out a contiguous run holding `values`, in order.
    ///
    /// Runs never span blocks: if the last block lacks room for the whole
    /// run, a fresh block of `max(run length, policy capacity)` is
    /// appended and the old block's tail capacity stays unused for the
    /// life of the arena. An empty run is valid and allocates nothing.
    pub fn alloc_run<I>(&mut self, values: I) -> Result<RunHandle, StorageError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        let len = values.len();
        if len == 0 {
            let block = self.blocks.len() - 1;
            return Ok(RunHandle::new(block, self.last_block().used(), 0));
        }
        if !self.last_block().has_room(len) {
            self.grow(len)?;
        }
        let block = self.blocks.len() - 1;
        let start = self.blocks[block].extend(values);
        // Trust what was actually produced, not the iterator's claim.
        let produced = self.blocks[block].used() - start;
        self.used += produced;
        Ok(RunHandle::new(block, start, produced))
    }

    /// The element a handle refers to, or `None` for handles this arena
    /// never issued.
    pub fn get(&self, handle: ElementHandle) -> Option<&T> {
        self.blocks.get(handle.block())?.get(handle.index())
    }

    /// Mutable form of [`BlockArena::get`].
    pub fn get_mut(&mut self, handle: ElementHandle) -> Option<&mut T> {
        self.blocks.get_mut(handle.block())?.get_mut(handle.index())
    }

    /// The contiguous slice a run handle refers to, or `None` for
    /// handles this arena never issued.
    pub fn run(&self, handle: RunHandle) -> Option<&[T]> {
        self.blocks
            .get(handle.block())?
            .used_slice(handle.start(), handle.len())
    }

    /// Mutable form of [`BlockArena::run`].
    pub fn run_mut(&mut self, handle: RunHandle) -> Option<&mut [T]> {
        self.blocks
            .get_mut(handle.block())?
            .used_slice_mut(handle.start(), handle.len())
    }

    /// Running number of the element a handle refers to, counting every
    /// element given out before it in allocation order.
    ///
    /// Walks the block list, so this is O(blocks) — fine for diagnostics
    /// and assertions, not for hot paths. `None` means the handle does
    /// not refer to an element this arena gave out.
    pub fn element_index(&self, handle: ElementHandle) -> Option<usize> {
        let mut base = 0;
        for (i, block) in self.blocks.iter().enumerate() {
            if i == handle.block() {
                let index = handle.index();
                return (index < block.used()).then_some(base + index);
            }
            base += block.used();
        }
        None
    }

    /// Whether a handle refers to an element this arena gave out.
    pub fn is_element(&self, handle: ElementHandle) -> bool {
        self.element_index(handle).is_some()
    }

    /// Iterate over every element given out so far, in allocation order.
    ///
    /// The sequence is lazy and forward-only; call again for a fresh
    /// traversal.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.blocks.iter().flat_map(|block| block.elements().iter())
    }

    /// Mutable form of [`BlockArena::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.blocks
            .iter_mut()
            .flat_map(|block| block.elements_mut().iter_mut())
    }

    /// Number of elements given out so far; monotonically non-decreasing.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Whether no element has been given out yet.
    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Total capacity across all blocks; monotonically non-decreasing.
    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    /// Number of blocks allocated so far.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

impl<T> Drop for BlockArena<T> {
    fn drop(&mut self) {
        for block in self.blocks.drain(..) {
            release_storage(block.into_storage());
        }
    }
}
