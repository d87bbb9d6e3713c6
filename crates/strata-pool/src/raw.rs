//! Untyped fixed-size-slot pool with an intrusive free list.

use strata_core::{alloc_storage, release_storage, StorageError};

use crate::handle::SlotHandle;

/// Bytes reserved at the front of every free slot for the intrusive link.
const LINK_BYTES: usize = 8;

/// Reserved bit pattern marking the end of the free list.
const END_OF_LIST: u64 = u64::MAX;

fn encode_link(next: Option<SlotHandle>) -> [u8; LINK_BYTES] {
    let packed = match next {
        Some(h) => (u64::from(h.chunk) << 32) | u64::from(h.slot),
        None => END_OF_LIST,
    };
    packed.to_le_bytes()
}

fn decode_link(bytes: [u8; LINK_BYTES]) -> Option<SlotHandle> {
    let packed = u64::from_le_bytes(bytes);
    if packed == END_OF_LIST {
        return None;
    }
    Some(SlotHandle {
        chunk: (packed >> 32) as u32,
        slot: packed as u32,
    })
}

/// One contiguous run of slots, allocated together and never split up.
struct Chunk {
    data: Vec<u8>,
}

impl Chunk {
    fn new(slots_per_chunk: usize, slot_size: usize) -> Result<Self, StorageError> {
        let data = alloc_storage::<u8>(slots_per_chunk * slot_size)?;
        Ok(Self { data })
    }
}

/// Pool of untyped fixed-size byte records.
///
/// Records are defined solely by their size in bytes. They are carved out
/// of chunks of `slots_per_chunk` slots each; freed records are kept on a
/// free list threaded through the leading link-sized bytes of each
/// free slot, so the list costs no memory beyond the slots themselves.
/// The slot size is rounded up to at least one link, which makes the pool
/// wasteful for records smaller than 8 bytes.
///
/// The pool owns every chunk it ever created and releases them all
/// together on drop. There is no way to return an individual chunk.
///
/// # Example
///
/// ```
/// use strata_pool::RawPool;
///
/// let mut pool = RawPool::new(64, 24)?;
/// let record = pool.alloc()?;
/// pool.slot_mut(record)[0] = 0xAB;
/// assert_eq!(pool.slot(record)[0], 0xAB);
/// pool.free(record);
/// # Ok::<(), strata_core::StorageError>(())
/// ```
pub struct RawPool {
    slots_per_chunk: usize,
    slot_size: usize,
    chunks: Vec<Chunk>,
    free_head: Option<SlotHandle>,
    live: usize,
    peak: usize,
}

impl RawPool {
    /// Create a pool of `slot_size`-byte records, grown `slots_per_chunk`
    /// slots at a time. The first chunk is allocated immediately.
    ///
    /// `slots_per_chunk` is clamped to at least 1 and `slot_size` is
    /// rounded up to at least the size of one free-list link (8 bytes).
    pub fn new(slots_per_chunk: usize, slot_size: usize) -> Result<Self, StorageError> {
        let mut pool = Self {
            slots_per_chunk: slots_per_chunk.max(1),
            slot_size: slot_size.max(LINK_BYTES),
            chunks: Vec::new(),
            free_head: None,
            live: 0,
            peak: 0,
        };
        pool.grow()?;
        Ok(pool)
    }

    /// Add a chunk and thread all of its slots onto the free list, the
    /// chunk's first slot ending up at the head.
    fn grow(&mut self) -> Result<(), StorageError> {
        let chunk = Chunk::new(self.slots_per_chunk, self.slot_size)?;
        let chunk_index = self.chunks.len();
        self.chunks.push(chunk);
        for slot in (0..self.slots_per_chunk).rev() {
            let handle = SlotHandle::new(chunk_index, slot);
            self.write_link(handle, self.free_head);
            self.free_head = Some(handle);
        }
        Ok(())
    }

    /// Hand out one record.
    ///
    /// Pops the free-list head, or allocates a fresh chunk first when the
    /// list is empty. O(1) amortised; the growth step is
    /// O(`slots_per_chunk`). If chunk allocation fails the error is
    /// propagated and the pool is unchanged, but the caller should treat
    /// the pool as unusable — there is no recovery path.
    ///
    /// The record's bytes are unspecified on return (the front may hold a
    /// stale link); callers initialise them.
    pub fn alloc(&mut self) -> Result<SlotHandle, StorageError> {
        if self.free_head.is_none() {
            self.grow()?;
        }
        let handle = self
            .free_head
            .expect("grow always threads fresh slots onto the free list");
        self.free_head = self.read_link(handle);
        self.live += 1;
        self.peak = self.peak.max(self.live);
        Ok(handle)
    }

    /// Take a record back, pushing it onto the free-list head. O(1).
    ///
    /// The handle must have been returned by [`RawPool::alloc`] on this
    /// pool and not freed since. That precondition is not checked: a
    /// foreign or repeated handle corrupts the free list — memory-safe,
    /// but every allocation after that point is suspect.
    pub fn free(&mut self, slot: SlotHandle) {
        self.write_link(slot, self.free_head);
        self.free_head = Some(slot);
        // Counter stays sane if the precondition above was violated.
        self.live = self.live.saturating_sub(1);
    }

    /// Borrow a record's bytes.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this pool.
    pub fn slot(&self, slot: SlotHandle) -> &[u8] {
        let start = slot.slot() * self.slot_size;
        &self.chunks[slot.chunk()].data[start..start + self.slot_size]
    }

    /// Borrow a record's bytes mutably.
    ///
    /// # Panics
    ///
    /// Panics if the handle was not issued by this pool.
    pub fn slot_mut(&mut self, slot: SlotHandle) -> &mut [u8] {
        let start = slot.slot() * self.slot_size;
        &mut self.chunks[slot.chunk()].data[start..start + self.slot_size]
    }

    fn write_link(&mut self, slot: SlotHandle, next: Option<SlotHandle>) {
        let link = encode_link(next);
        self.slot_mut(slot)[..LINK_BYTES].copy_from_slice(&link);
    }

    fn read_link(&self, slot: SlotHandle) -> Option<SlotHandle> {
        let mut link = [0u8; LINK_BYTES];
        link.copy_from_slice(&self.slot(slot)[..LINK_BYTES]);
        decode_link(link)
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of records currently handed out.
    pub fn live(&self) -> usize {
        self.live
    }

    /// High-water mark of [`RawPool::live`]; monotonically non-decreasing.
    pub fn peak_live(&self) -> usize {
        self.peak
    }

    /// Actual size of each record in bytes (after rounding up).
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Number of slots each chunk holds.
    pub fn slots_per_chunk(&self) -> usize {
        self.slots_per_chunk
    }
}

impl Drop for RawPool {
    fn drop(&mut self) {
        for chunk in self.chunks.drain(..) {
            release_storage(chunk.data);
        }
    }
}
