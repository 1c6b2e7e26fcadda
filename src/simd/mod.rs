//! Kernel dispatch: run the AVX2 kernel when available, otherwise fall
//! back to the portable scalar kernel. The scalar kernel is the semantic
//! reference — every property the AVX2 path must satisfy is defined in
//! terms of scalar agreement (`tests/equivalence.rs`).

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;
pub(crate) mod scalar;

use crate::config::kernel_config;
use crate::error::BarrierError;
use crate::geom::Segment;
use crate::layout::{validate_segment, Chunk, PrequeryState};
use std::sync::OnceLock;

#[cfg(target_arch = "x86_64")]
fn avx2_available() -> bool {
    static AVAILABLE: OnceLock<bool> = OnceLock::new();
    *AVAILABLE.get_or_init(|| std::is_x86_feature_detected!("avx2"))
}

#[cfg(not(target_arch = "x86_64"))]
fn avx2_available() -> bool {
    false
}

fn any_intersection_over(query: Segment, chunks: &[Chunk]) -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        if avx2_available() && !kernel_config().force_scalar {
            // SAFETY: avx2_available() confirmed the CPU feature is present.
            return unsafe { avx2::any_intersection(query, chunks) };
        }
    }
    scalar::any_intersection(query, chunks)
}

/// Does `query` intersect any barrier in `state`? Dispatches to the AVX2
/// kernel when available, to the portable scalar kernel otherwise.
pub fn any_intersection(state: &PrequeryState, query: Segment) -> Result<bool, BarrierError> {
    validate_segment(&query)?;
    Ok(any_intersection_over(query, &state.chunks))
}
