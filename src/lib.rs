//! # xbarrier — exact-integer segment-vs-barrier-set intersection queries
//!
//! ## Architecture Overview
//!
//! ### The question this crate answers
//!
//! Given a fixed set of "barrier" segments loaded once, and a stream of
//! query segments arriving afterward: does a query cross *any* barrier?
//! Coordinates are signed 16-bit integers and every comparison is exact
//! integer arithmetic — no floating point, no epsilon tuning, no
//! collinear-overlap special cases (see [`geom`] for exactly which cases
//! are and are not reported).
//!
//! ### Memory layout: a chunked, SIMD-shaped buffer
//!
//! The naive approach re-derives `x1 − x2` and `y2 − y1` for every barrier
//! on every query — that's two subtractions wasted per barrier per query,
//! and it leaves barriers scattered as whatever layout the caller handed
//! in. [`layout`] instead packs barriers, two per 32-byte-aligned
//! [`layout::Chunk`], with those deltas pre-computed once at load time.
//! The kernel then walks this buffer sequentially, feeding 256-bit loads
//! straight into AVX2 registers — four barriers evaluated per iteration.
//!
//! ### Why `unsafe` intrinsics in the hot path
//!
//! [`simd::avx2`] is hand-written against `core::arch::x86_64`: pairwise
//! 16-bit multiply-add, 32-bit lane permutes, a horizontal subtract and a
//! byte-wise movemask collapse four barriers' worth of orientation tests
//! into a handful of vector instructions. [`simd::scalar`] is the
//! portable fallback — and the semantic reference every other kernel must
//! agree with — used automatically on non-AVX2 hosts or when
//! [`config::KernelConfig::force_scalar`] is set, and it is required to
//! agree with the AVX2 path bit-for-bit (see the `tests/equivalence.rs`
//! property tests).
//!
//! ### Handles, not pointers, across the C boundary
//!
//! [`registry`] owns every loaded [`layout::PrequeryState`] behind a
//! monotonically increasing 64-bit handle. [`ffi`] is the thin C ABI
//! layer (`GetVersion` / `Load...` / `Query...` / `Free...`); it is a
//! translation, not a reimplementation — the actual logic lives in
//! [`registry`] and is exercised directly by ordinary Rust callers too.
//!
//! ## Concurrency
//!
//! A single `parking_lot::Mutex` guards the registry's handle map and its
//! next-handle counter — `parking_lot` instead of `std::sync::Mutex`
//! because uncontended acquisition is a single atomic CAS with no futex
//! syscall, which matters here because `Load`/`Free` calls are expected to
//! be rare relative to `Query` calls and should not make `Query` pay for a
//! heavyweight lock. The lock is held only long enough to clone an `Arc`
//! to the prequery state; the SIMD scan itself runs lock-free. See
//! [`registry`] for the full contract.

#[cfg(feature = "diagnostics")]
pub mod diagnostics;

pub mod batch;
pub mod config;
pub mod error;
pub mod ffi;
pub mod geom;
pub mod layout;
pub mod oracle;
pub mod registry;
pub mod simd;

pub use batch::{query_batch, query_batch_parallel};
pub use error::{ApiResult, BarrierError};
pub use geom::{Orientation, Point, Segment};
pub use layout::{PrequeryState, MAX_COORD_MAGNITUDE};
pub use registry::{Handle, Registry};

// Global allocator: mimalloc.
//
// The chunk buffer (layout::Chunk, 32-byte aligned) is allocated through
// Vec<Chunk>, which sizes and aligns its allocation from Chunk's own
// Layout — mimalloc's per-thread size-segregated free lists make that,
// and the registry's handle-map churn, effectively contention-free.
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
