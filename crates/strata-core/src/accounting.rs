//! Optional per-type allocation accounting.
//!
//! A process-wide registry of per-type counters, disabled by default and
//! switched on once at startup (typically next to subscriber installation).
//! When disabled — the normal case — the storage layer pays one relaxed
//! atomic load per operation and nothing else.
//!
//! The registry is keyed by type tag and iterated in first-seen order, so
//! reports are deterministic across runs with the same allocation order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use indexmap::IndexMap;

/// Per-type allocation counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeCounters {
    /// Number of storage acquisitions recorded for this type.
    pub allocations: u64,
    /// Number of storage releases recorded for this type.
    pub releases: u64,
    /// Bytes currently held by live storage of this type.
    pub live_bytes: u64,
    /// High-water mark of `live_bytes`; monotonically non-decreasing.
    pub peak_bytes: u64,
}

static ENABLED: AtomicBool = AtomicBool::new(false);

fn registry() -> &'static Mutex<IndexMap<&'static str, TypeCounters>> {
    static REGISTRY: OnceLock<Mutex<IndexMap<&'static str, TypeCounters>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(IndexMap::new()))
}

/// Switch accounting on for the whole process.
pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

/// Switch accounting off again. Recorded counters are kept.
pub fn disable() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// Whether accounting is currently enabled.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Record a storage acquisition of `bytes` for type `ty`.
pub(crate) fn record_alloc(ty: &'static str, bytes: usize) {
    if !is_enabled() {
        return;
    }
    let mut map = registry().lock().expect("accounting registry poisoned");
    let counters = map.entry(ty).or_default();
    counters.allocations += 1;
    counters.live_bytes = counters.live_bytes.saturating_add(bytes as u64);
    counters.peak_bytes = counters.peak_bytes.max(counters.live_bytes);
}

/// Record a storage release of `bytes` for type `ty`.
pub(crate) fn record_release(ty: &'static str, bytes: usize) {
    if !is_enabled() {
        return;
    }
    let mut map = registry().lock().expect("accounting registry poisoned");
    let counters = map.entry(ty).or_default();
    counters.releases += 1;
    counters.live_bytes = counters.live_bytes.saturating_sub(bytes as u64);
}

/// Snapshot all counters in first-seen order.
pub fn snapshot() -> Vec<(&'static str, TypeCounters)> {
    registry()
        .lock()
        .expect("accounting registry poisoned")
        .iter()
        .map(|(&ty, &counters)| (ty, counters))
        .collect()
}

/// Counters for one type tag, if any storage of that type was recorded.
pub fn counters_for(ty: &str) -> Option<TypeCounters> {
    registry()
        .lock()
        .expect("accounting registry poisoned")
        .get(ty)
        .copied()
}

/// Clear all recorded counters.
pub fn reset() {
    registry()
        .lock()
        .expect("accounting registry poisoned")
        .clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{alloc_storage_with, release_storage};
    use std::any::type_name;

    /// Marker type so the assertions below cannot collide with storage
    /// traffic from other tests in this binary.
    #[derive(Clone, Default)]
    struct AccountingProbe([u64; 4]);

    #[test]
    fn counters_follow_the_storage_lifecycle() {
        // One test covers the whole flow; the registry is process-wide
        // and parallel test threads share it.
        enable();
        assert!(is_enabled());

        let tag = type_name::<AccountingProbe>();
        let storage = alloc_storage_with(10, AccountingProbe::default()).unwrap();
        // Acquisition records the requested size, release the actual capacity.
        let bytes = (10 * std::mem::size_of::<AccountingProbe>()) as u64;

        let after_alloc = counters_for(tag).expect("probe type was recorded");
        assert_eq!(after_alloc.allocations, 1);
        assert_eq!(after_alloc.releases, 0);
        assert_eq!(after_alloc.live_bytes, bytes);
        assert_eq!(after_alloc.peak_bytes, bytes);

        release_storage(storage);
        let after_release = counters_for(tag).expect("probe type still present");
        assert_eq!(after_release.releases, 1);
        assert_eq!(after_release.live_bytes, 0);
        assert!(after_release.peak_bytes >= bytes, "peak survives release");

        assert!(snapshot().iter().any(|&(ty, _)| ty == tag));

        disable();
        let frozen = counters_for(tag).expect("counters kept after disable");
        let _ = alloc_storage_with(10, AccountingProbe::default()).unwrap();
        assert_eq!(
            counters_for(tag).expect("still present"),
            frozen,
            "nothing recorded while disabled"
        );
    }
}
