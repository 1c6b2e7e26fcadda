//! The batch driver: evaluate many queries against one prequery state,
//! writing one result byte per query in input order.

use crate::error::BarrierError;
use crate::geom::Segment;
use crate::layout::PrequeryState;
use crate::simd;
use rayon::prelude::*;

fn check_lengths(queries: &[Segment], out: &[u8]) -> Result<(), BarrierError> {
    if queries.len() != out.len() {
        return Err(BarrierError::LengthMismatch { expected: queries.len(), actual: out.len() });
    }
    Ok(())
}

/// Sequential batch driver: read-only with respect to `state`, no side
/// effects beyond filling `out`.
pub fn query_batch(
    state: &PrequeryState,
    queries: &[Segment],
    out: &mut [u8],
) -> Result<(), BarrierError> {
    check_lengths(queries, out)?;
    for (query, slot) in queries.iter().zip(out.iter_mut()) {
        *slot = simd::any_intersection(state, *query)? as u8;
    }
    Ok(())
}

/// Parallel batch driver: identical contract to [`query_batch`], but
/// queries are independent of one another, so this dispatches them
/// across `rayon`'s global thread pool with a zipped `par_iter`, one
/// kernel call per query, no shared mutable state and no locking.
/// Preferred for large `M` where per-query dispatch overhead is
/// amortized; supplements, rather than replaces, the sequential driver.
pub fn query_batch_parallel(
    state: &PrequeryState,
    queries: &[Segment],
    out: &mut [u8],
) -> Result<(), BarrierError> {
    check_lengths(queries, out)?;
    queries
        .par_iter()
        .zip(out.par_iter_mut())
        .try_for_each(|(query, slot)| -> Result<(), BarrierError> {
            *slot = simd::any_intersection(state, *query)? as u8;
            Ok(())
        })
}
