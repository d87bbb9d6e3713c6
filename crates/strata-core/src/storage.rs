//! Fallible, traced backing-storage acquisition and release.
//!
//! All storage in the workspace is `Vec`-backed. The functions here wrap
//! [`Vec::try_reserve_exact`] so an impossible request surfaces as a
//! [`StorageError`] instead of an abort, and emit `tracing` events (element
//! count, byte size, type tag) around both directions. The type tag is
//! [`core::any::type_name`] and is used for diagnostics only.

use std::any::type_name;
use std::mem;

use crate::accounting;
use crate::error::StorageError;

/// Acquire storage for `len` elements, each initialised to `T::default()`.
///
/// Fails atomically: on error nothing has been allocated and the error is
/// returned to the caller.
pub fn alloc_storage<T: Default + Clone>(len: usize) -> Result<Vec<T>, StorageError> {
    alloc_storage_with(len, T::default())
}

/// Acquire storage for `len` elements, each initialised to a copy of `fill`.
pub fn alloc_storage_with<T: Clone>(len: usize, fill: T) -> Result<Vec<T>, StorageError> {
    let mut storage = reserve_storage::<T>(len)?;
    storage.resize(len, fill);
    Ok(storage)
}

/// Acquire empty storage with room for at least `capacity` elements.
///
/// The returned `Vec` has length zero; callers fill it incrementally.
/// Used by the pool and arena crates, whose elements are written after
/// the block is carved out.
pub fn reserve_storage<T>(capacity: usize) -> Result<Vec<T>, StorageError> {
    let requested_bytes = capacity.saturating_mul(mem::size_of::<T>());
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(capacity)
        .map_err(|_| StorageError::AllocationFailed {
            requested_bytes,
            type_name: type_name::<T>(),
        })?;
    tracing::trace!(
        capacity,
        bytes = requested_bytes,
        ty = type_name::<T>(),
        "storage acquired"
    );
    accounting::record_alloc(type_name::<T>(), requested_bytes);
    Ok(storage)
}

/// Release storage previously acquired through this module.
///
/// Releasing storage that owns no allocation is a safe no-op that emits a
/// warning diagnostic; it usually indicates a caller released the same
/// handle twice or released a container it never filled.
pub fn release_storage<T>(storage: Vec<T>) {
    if storage.capacity() == 0 {
        tracing::warn!(ty = type_name::<T>(), "releasing empty storage");
        return;
    }
    let bytes = storage.capacity().saturating_mul(mem::size_of::<T>());
    tracing::trace!(
        len = storage.len(),
        bytes,
        ty = type_name::<T>(),
        "storage released"
    );
    accounting::record_release(type_name::<T>(), bytes);
    drop(storage);
}
