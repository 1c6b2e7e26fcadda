//! Handle-indexed registry mediating concurrent prequery load / query /
//! free.
//!
//! A single `parking_lot::Mutex` guards both the handle map and the
//! next-handle counter, held only for map operations, never across a
//! query scan. `Query` clones the `Arc<PrequeryState>` under the lock and
//! releases it before running the kernel, so an in-flight scan keeps the
//! state alive even if a concurrent `Free` removes it from the map — lock
//! for the lookup, not for the work.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use crate::batch::{query_batch, query_batch_parallel};
use crate::error::BarrierError;
use crate::geom::Segment;
use crate::layout::PrequeryState;

/// An opaque, strictly-monotonic handle. `0` is never issued — it is
/// reserved by the C ABI as an invalid sentinel.
pub type Handle = u64;

struct Inner {
    next_handle: Handle,
    states: HashMap<Handle, Arc<PrequeryState>>,
}

/// Process-wide (or, if constructed directly, caller-scoped) mapping from
/// handle to shared prequery state.
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { next_handle: 1, states: HashMap::new() }) }
    }

    /// Build a prequery state from `barriers` and register it under a
    /// freshly issued handle.
    pub fn load(&self, barriers: &[Segment]) -> Result<Handle, BarrierError> {
        let state = Arc::new(PrequeryState::build(barriers)?);

        let mut inner = self.inner.lock();
        let handle = inner.next_handle;
        inner.next_handle += 1;
        inner.states.insert(handle, state);
        Ok(handle)
    }

    /// Clone the `Arc` for `handle` under the lock, then release the lock
    /// before returning — callers run the actual scan lock-free.
    fn clone_state(&self, handle: Handle) -> Result<Arc<PrequeryState>, BarrierError> {
        let inner = self.inner.lock();
        inner.states.get(&handle).cloned().ok_or(BarrierError::UnknownHandle(handle))
    }

    /// Evaluate `queries` against the prequery state for `handle`,
    /// sequentially, writing one byte per query into `out`.
    pub fn query(
        &self,
        handle: Handle,
        queries: &[Segment],
        out: &mut [u8],
    ) -> Result<(), BarrierError> {
        let state = self.clone_state(handle)?;
        query_batch(&state, queries, out)
    }

    /// As [`Registry::query`], but dispatches across `rayon`'s thread
    /// pool (see [`crate::batch::query_batch_parallel`]).
    pub fn query_parallel(
        &self,
        handle: Handle,
        queries: &[Segment],
        out: &mut [u8],
    ) -> Result<(), BarrierError> {
        let state = self.clone_state(handle)?;
        query_batch_parallel(&state, queries, out)
    }

    /// Remove `handle` from the registry. Any query that already cloned
    /// its `Arc` continues to completion; the chunk buffer is freed once
    /// the last holder (registry or in-flight query) drops its reference.
    pub fn free(&self, handle: Handle) -> Result<(), BarrierError> {
        let mut inner = self.inner.lock();
        inner.states.remove(&handle).map(|_| ()).ok_or(BarrierError::UnknownHandle(handle))
    }
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// The process-wide registry the C ABI operates on. Pure Rust callers
/// that want an independently-scoped registry (e.g. for tests that must
/// not interfere with each other's handles) should use [`Registry::new`]
/// directly instead.
pub fn global() -> &'static Registry {
    GLOBAL.get_or_init(Registry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn seg(x1: i16, y1: i16, x2: i16, y2: i16) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn handles_are_strictly_increasing() {
        let reg = Registry::new();
        let h1 = reg.load(&[]).unwrap();
        let h2 = reg.load(&[]).unwrap();
        let h3 = reg.load(&[]).unwrap();
        assert!(h1 < h2 && h2 < h3);
        assert!(h1 >= 1);
    }

    #[test]
    fn free_then_query_is_unknown_handle() {
        let reg = Registry::new();
        let h = reg.load(&[seg(0, 0, 10, 10)]).unwrap();
        reg.free(h).unwrap();

        let mut out = [0u8; 1];
        let err = reg.query(h, &[seg(0, 0, 1, 1)], &mut out).unwrap_err();
        assert!(matches!(err, BarrierError::UnknownHandle(hh) if hh == h));
    }

    #[test]
    fn free_unknown_handle_is_an_error() {
        let reg = Registry::new();
        assert!(matches!(reg.free(999), Err(BarrierError::UnknownHandle(999))));
    }

    #[test]
    fn query_after_load_round_trips() {
        let reg = Registry::new();
        let h = reg.load(&[seg(0, 5, 10, 5), seg(5, 0, 5, 10)]).unwrap();
        let queries = [seg(0, 0, 10, 10), seg(100, 100, 200, 200), seg(4, 6, 6, 4)];
        let mut out = [0u8; 3];
        reg.query(h, &queries, &mut out).unwrap();
        assert_eq!(out, [1, 0, 1]);
    }

    #[test]
    fn concurrent_load_query_free_from_many_threads() {
        use std::thread;

        let reg = Arc::new(Registry::new());
        let mut handles = Vec::new();

        for t in 0i16..8 {
            let reg = Arc::clone(&reg);
            handles.push(thread::spawn(move || {
                let h = reg.load(&[seg(t, 0, t, 10)]).unwrap();
                let queries = [seg(t - 1, 5, t + 1, 5)];
                let mut out = [0u8; 1];
                reg.query(h, &queries, &mut out).unwrap();
                assert_eq!(out[0], 1);
                reg.free(h).unwrap();
                assert!(reg.query(h, &queries, &mut out).is_err());
            }));
        }

        for h in handles {
            h.join().unwrap();
        }
    }
}
