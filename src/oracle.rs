//! Reference scalar batch: the non-SIMD oracle, computed directly over
//! the raw barrier array with [`crate::geom::intersects`], used to
//! validate the chunked/SIMD kernel in tests.

use crate::error::BarrierError;
use crate::geom::{intersects, Segment};
use crate::layout::validate_segment;

/// `out[i] = 1` iff `queries[i]` intersects any segment in `barriers`,
/// else `0`. Same contract as [`crate::batch::query_batch`], but
/// evaluated directly against `barriers` with no prequery layout at all.
pub fn scalar_batch(
    barriers: &[Segment],
    queries: &[Segment],
    out: &mut [u8],
) -> Result<(), BarrierError> {
    if queries.len() != out.len() {
        return Err(BarrierError::LengthMismatch { expected: queries.len(), actual: out.len() });
    }
    for barrier in barriers {
        validate_segment(barrier)?;
    }
    for (query, slot) in queries.iter().zip(out.iter_mut()) {
        validate_segment(query)?;
        *slot = barriers.iter().any(|barrier| intersects(*query, *barrier)) as u8;
    }
    Ok(())
}
