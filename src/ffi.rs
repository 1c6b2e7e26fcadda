//! The C ABI: `GetVersion`, `Load/Query/FreePrequeryAnySegmentIntersections`.
//!
//! Each function is a thin translation over [`crate::registry::global`] —
//! the actual logic lives there and is exercised directly by the Rust
//! tests in that module. What belongs here is strictly FFI plumbing:
//! pointer validation, the `seg2i16` wire layout, and converting both
//! Rust errors and caught panics into [`ApiResult`], the equivalent of a
//! C try/catch boundary at the edge of the library.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::slice;

use crate::error::ApiResult;
use crate::geom::{Point, Segment};
use crate::registry::{global, Handle};

/// The wire layout for a segment: four `i16`s, `x1, y1, x2, y2`, 8 bytes
/// total, naturally 2-byte aligned. Part of the ABI — must not change.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Seg2I16 {
    pub x1: i16,
    pub y1: i16,
    pub x2: i16,
    pub y2: i16,
}

const _: () = assert!(std::mem::size_of::<Seg2I16>() == 8);

impl From<Seg2I16> for Segment {
    fn from(s: Seg2I16) -> Self {
        Segment::new(Point::new(s.x1, s.y1), Point::new(s.x2, s.y2))
    }
}

/// Run `body`, converting any unwinding panic into `ApiResult::ErrorUnknown`
/// and logging it once to the diagnostic stream. An `extern "C"` function
/// that unwinds across the FFI boundary is undefined behavior, so every
/// exported entry point routes through this.
fn guard(location: &'static str, body: impl FnOnce() -> ApiResult) -> ApiResult {
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            tracing::error!(target: "xbarrier::ffi", %location, %message, "native call panicked");
            ApiResult::ErrorUnknown
        }
    }
}

/// `GetVersion` — writes the literal `1337` through `version`. Callers
/// must treat any other value as an incompatible ABI.
///
/// # Safety
/// `version` must be a valid, writable pointer to an `i32`.
#[no_mangle]
pub unsafe extern "C" fn xbarrier_get_version(version: *mut i32) -> ApiResult {
    guard("xbarrier_get_version", || {
        if version.is_null() {
            return ApiResult::ErrorUnknown;
        }
        *version = 1337;
        ApiResult::Success
    })
}

/// `LoadPrequeryAnySegmentIntersections` — builds a prequery state from
/// `num_barriers` entries at `barriers` and writes the issued handle
/// through `handle_out`.
///
/// # Safety
/// `barriers` must point to `num_barriers` readable, initialized
/// `Seg2I16` values (or `num_barriers <= 0`); `handle_out` must be a
/// valid, writable pointer.
#[no_mangle]
pub unsafe extern "C" fn xbarrier_load_prequery_any_segment_intersections(
    barriers: *const Seg2I16,
    num_barriers: i32,
    handle_out: *mut Handle,
) -> ApiResult {
    guard("xbarrier_load_prequery_any_segment_intersections", || {
        if handle_out.is_null() || num_barriers < 0 || (num_barriers > 0 && barriers.is_null()) {
            return ApiResult::ErrorUnknown;
        }

        let raw = slice::from_raw_parts(barriers, num_barriers as usize);
        let segments: Vec<Segment> = raw.iter().map(|&s| Segment::from(s)).collect();

        match global().load(&segments) {
            Ok(handle) => {
                *handle_out = handle;
                ApiResult::Success
            }
            Err(err) => {
                tracing::error!(target: "xbarrier::ffi", %err, "load failed");
                ApiResult::from(&err)
            }
        }
    })
}

/// `QueryAnySegmentIntersections` — evaluates `num_queries` queries at
/// `queries` against the prequery state for `handle`, writing one byte
/// (`0`/`1`) per query into `results`.
///
/// # Safety
/// `queries` must point to `num_queries` readable, initialized `Seg2I16`
/// values (or `num_queries <= 0`); `results` must point to `num_queries`
/// writable bytes.
#[no_mangle]
pub unsafe extern "C" fn xbarrier_query_any_segment_intersections(
    handle: Handle,
    queries: *const Seg2I16,
    num_queries: i32,
    results: *mut u8,
) -> ApiResult {
    guard("xbarrier_query_any_segment_intersections", || {
        if num_queries < 0
            || (num_queries > 0 && (queries.is_null() || results.is_null()))
        {
            return ApiResult::ErrorUnknown;
        }

        let raw = slice::from_raw_parts(queries, num_queries as usize);
        let out = slice::from_raw_parts_mut(results, num_queries as usize);
        let segments: Vec<Segment> = raw.iter().map(|&s| Segment::from(s)).collect();

        match global().query(handle, &segments, out) {
            Ok(()) => ApiResult::Success,
            Err(err) => {
                tracing::error!(target: "xbarrier::ffi", %err, "query failed");
                ApiResult::from(&err)
            }
        }
    })
}

/// `FreePrequeryAnySegmentIntersections` — removes `handle`'s prequery
/// state from the registry.
#[no_mangle]
pub extern "C" fn xbarrier_free_prequery_any_segment_intersections(handle: Handle) -> ApiResult {
    guard("xbarrier_free_prequery_any_segment_intersections", || match global().free(handle) {
        Ok(()) => ApiResult::Success,
        Err(err) => ApiResult::from(&err),
    })
}
