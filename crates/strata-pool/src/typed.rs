//! Typed fixed-size-slot pool.

use std::any::type_name;
use std::mem;

use strata_core::{release_storage, reserve_storage, StorageError};

use crate::handle::SlotHandle;

/// One slot of a typed pool. The vacant variant *is* the intrusive
/// free-list link, so a free slot costs no memory beyond itself.
enum Slot<T> {
    Vacant { next: Option<SlotHandle> },
    Occupied(T),
}

/// Pool of typed records with free-list reuse.
///
/// The typed counterpart of [`crate::RawPool`]: same chunked growth and
/// free-list discipline, but each slot holds either a `T` or the link to
/// the next free slot. Values go in by value on [`Pool::alloc`] and come
/// back out on [`Pool::free`]; while live they are reachable through
/// [`Pool::get`]/[`Pool::get_mut`].
///
/// A slot knows whether it is occupied, so freeing a vacant or foreign
/// handle is detected and becomes a warned no-op.
///
/// # Example
///
/// ```
/// use strata_pool::Pool;
///
/// let mut pool = Pool::new(16)?;
/// let node = pool.alloc([1.0f32, 2.0, 3.0])?;
/// pool.get_mut(node).expect("live slot")[2] = 9.0;
/// assert_eq!(pool.free(node), Some([1.0, 2.0, 9.0]));
/// # Ok::<(), strata_core::StorageError>(())
/// ```
pub struct Pool<T> {
    slots_per_chunk: usize,
    chunks: Vec<Vec<Slot<T>>>,
    free_head: Option<SlotHandle>,
    live: usize,
    peak: usize,
}

impl<T> Pool<T> {
    /// Create a pool grown `slots_per_chunk` slots at a time (clamped to
    /// at least 1). The first chunk is allocated immediately.
    pub fn new(slots_per_chunk: usize) -> Result<Self, StorageError> {
        let mut pool = Self {
            slots_per_chunk: slots_per_chunk.max(1),
            chunks: Vec::new(),
            free_head: None,
            live: 0,
            peak: 0,
        };
        pool.grow()?;
        Ok(pool)
    }

    /// Add a chunk of vacant slots threaded onto the free list, the
    /// chunk's first slot ending up at the head.
    fn grow(&mut self) -> Result<(), StorageError> {
        let mut chunk = reserve_storage::<Slot<T>>(self.slots_per_chunk)?;
        let chunk_index = self.chunks.len();
        for slot in 0..self.slots_per_chunk {
            let next = if slot + 1 < self.slots_per_chunk {
                Some(SlotHandle::new(chunk_index, slot + 1))
            } else {
                self.free_head
            };
            chunk.push(Slot::Vacant { next });
        }
        self.free_head = Some(SlotHandle::new(chunk_index, 0));
        self.chunks.push(chunk);
        Ok(())
    }

    /// Place `value` in a free slot and hand back its handle.
    ///
    /// O(1) amortised; grows by one chunk when the free list is empty.
    /// A failed growth propagates the error with `value` dropped and the
    /// pool unchanged.
    pub fn alloc(&mut self, value: T) -> Result<SlotHandle, StorageError> {
        if self.free_head.is_none() {
            self.grow()?;
        }
        let handle = self
            .free_head
            .expect("grow always threads fresh slots onto the free list");
        let slot = &mut self.chunks[handle.chunk()][handle.slot()];
        match mem::replace(slot, Slot::Occupied(value)) {
            Slot::Vacant { next } => self.free_head = next,
            Slot::Occupied(_) => unreachable!("free-list head is always vacant"),
        }
        self.live += 1;
        self.peak = self.peak.max(self.live);
        Ok(handle)
    }

    /// Take the value out of a slot and thread the slot back onto the
    /// free list. O(1).
    ///
    /// Returns `None` with a warning diagnostic (not an error) if the
    /// handle is vacant or was never issued by this pool; a repeated
    /// free shows up as a missing value.
    pub fn free(&mut self, slot: SlotHandle) -> Option<T> {
        let free_head = self.free_head;
        let Some(entry) = self
            .chunks
            .get_mut(slot.chunk())
            .and_then(|chunk| chunk.get_mut(slot.slot()))
        else {
            tracing::warn!(%slot, ty = type_name::<T>(), "freeing a slot this pool never issued");
            return None;
        };
        if matches!(entry, Slot::Vacant { .. }) {
            tracing::warn!(%slot, ty = type_name::<T>(), "freeing a slot that is not live");
            return None;
        }
        let Slot::Occupied(value) = mem::replace(entry, Slot::Vacant { next: free_head }) else {
            unreachable!("vacant case returned above");
        };
        self.free_head = Some(slot);
        self.live -= 1;
        Some(value)
    }

    /// Borrow the value in a slot, or `None` if the slot is not live.
    pub fn get(&self, slot: SlotHandle) -> Option<&T> {
        match self.chunks.get(slot.chunk())?.get(slot.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Borrow the value in a slot mutably, or `None` if the slot is not
    /// live.
    pub fn get_mut(&mut self, slot: SlotHandle) -> Option<&mut T> {
        match self.chunks.get_mut(slot.chunk())?.get_mut(slot.slot())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Number of chunks allocated so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of records currently live.
    pub fn live(&self) -> usize {
        self.live
    }

    /// High-water mark of [`Pool::live`]; monotonically non-decreasing.
    pub fn peak_live(&self) -> usize {
        self.peak
    }

    /// Number of slots each chunk holds.
    pub fn slots_per_chunk(&self) -> usize {
        self.slots_per_chunk
    }
}

impl<T> Drop for Pool<T> {
    fn drop(&mut self) {
        for chunk in self.chunks.drain(..) {
            release_storage(chunk);
        }
    }
}
