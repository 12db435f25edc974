//! Slot registry - the bounded pool of session identifiers.
//!
//! At most `CLIENTS_MAX` sessions exist at once. Acquire scans for the
//! first free id under a single mutex held only for the O(1) scan, never
//! across I/O. The returned guard releases its slot on drop, so every
//! session exit path frees the slot.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::types::CLIENTS_MAX;

#[derive(Debug)]
pub struct SlotRegistry {
    in_use: Mutex<[bool; CLIENTS_MAX]>,
}

impl SlotRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            in_use: Mutex::new([false; CLIENTS_MAX]),
        })
    }

    /// Claim the first free slot; fails when the pool is exhausted.
    ///
    /// Callers must reject the connection on failure rather than wait.
    pub fn acquire(registry: &Arc<SlotRegistry>) -> Result<SlotGuard> {
        let mut in_use = registry.lock();
        for (id, used) in in_use.iter_mut().enumerate() {
            if !*used {
                *used = true;
                return Ok(SlotGuard {
                    registry: Arc::clone(registry),
                    id,
                });
            }
        }
        Err(Error::SlotsExhausted)
    }

    /// Free a slot id. Out-of-range or already-free ids are a no-op.
    pub fn release(&self, id: usize) {
        if id >= CLIENTS_MAX {
            return;
        }
        self.lock()[id] = false;
    }

    /// Number of slots currently claimed.
    pub fn active(&self) -> usize {
        self.lock().iter().filter(|used| **used).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, [bool; CLIENTS_MAX]> {
        // A poisoned registry means a worker died mid-update; the pool
        // state can no longer be trusted, so treat it as fatal.
        self.in_use
            .lock()
            .unwrap_or_else(|_| std::process::abort())
    }
}

/// An acquired slot. Dropping it releases the id back to the pool.
#[derive(Debug)]
pub struct SlotGuard {
    registry: Arc<SlotRegistry>,
    id: usize,
}

impl SlotGuard {
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_full() {
        let registry = SlotRegistry::new();

        let guards: Vec<_> = (0..CLIENTS_MAX)
            .map(|_| SlotRegistry::acquire(&registry).expect("pool not yet full"))
            .collect();

        // Ids are distinct and dense.
        let mut ids: Vec<_> = guards.iter().map(|g| g.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..CLIENTS_MAX).collect::<Vec<_>>());

        // Pool exhausted: acquire fails instead of blocking.
        let err = SlotRegistry::acquire(&registry).unwrap_err();
        assert!(matches!(err, Error::SlotsExhausted));
        assert_eq!(registry.active(), CLIENTS_MAX);
    }

    #[test]
    fn test_drop_releases_and_reuses_lowest_id() {
        let registry = SlotRegistry::new();

        let a = SlotRegistry::acquire(&registry).unwrap();
        let b = SlotRegistry::acquire(&registry).unwrap();
        assert_eq!(a.id(), 0);
        assert_eq!(b.id(), 1);

        drop(a);
        assert_eq!(registry.active(), 1);

        let c = SlotRegistry::acquire(&registry).unwrap();
        assert_eq!(c.id(), 0);
    }

    #[test]
    fn test_release_out_of_range_is_noop() {
        let registry = SlotRegistry::new();
        let _guard = SlotRegistry::acquire(&registry).unwrap();

        registry.release(CLIENTS_MAX);
        registry.release(usize::MAX);
        assert_eq!(registry.active(), 1);

        // Releasing an already-free id is also a no-op.
        registry.release(3);
        assert_eq!(registry.active(), 1);
    }
}
