//! Property tests: the dispatched kernel (AVX2 when available, scalar
//! otherwise) must agree with the non-SIMD oracle for any in-range
//! barrier set and query.

use proptest::prelude::*;
use xbarrier::{oracle, PrequeryState, Point, Segment};

const BOUND: i16 = xbarrier::MAX_COORD_MAGNITUDE;

fn coord() -> impl Strategy<Value = i16> {
    -BOUND..=BOUND
}

fn segment() -> impl Strategy<Value = Segment> {
    (coord(), coord(), coord(), coord())
        .prop_map(|(x1, y1, x2, y2)| Segment::new(Point::new(x1, y1), Point::new(x2, y2)))
}

proptest! {
    /// Single-query agreement: the dispatched kernel and the scalar oracle
    /// must never disagree on whether a query crosses any barrier.
    #[test]
    fn dispatched_matches_oracle(
        barriers in prop::collection::vec(segment(), 0..64),
        query in segment(),
    ) {
        let state = PrequeryState::build(&barriers).unwrap();
        let mut kernel_out = [0u8];
        xbarrier::query_batch(&state, &[query], &mut kernel_out).unwrap();

        let mut oracle_out = [0u8];
        oracle::scalar_batch(&barriers, &[query], &mut oracle_out).unwrap();

        prop_assert_eq!(kernel_out[0], oracle_out[0]);
    }

    /// Batch agreement across many queries in one call, exercising barrier
    /// counts that straddle chunk boundaries (the padding tail of the
    /// buffer must never manufacture a spurious hit).
    #[test]
    fn batch_matches_oracle(
        barriers in prop::collection::vec(segment(), 0..64),
        queries in prop::collection::vec(segment(), 1..32),
    ) {
        let state = PrequeryState::build(&barriers).unwrap();
        let mut kernel_out = vec![0u8; queries.len()];
        xbarrier::query_batch(&state, &queries, &mut kernel_out).unwrap();

        let mut oracle_out = vec![0u8; queries.len()];
        oracle::scalar_batch(&barriers, &queries, &mut oracle_out).unwrap();

        prop_assert_eq!(kernel_out, oracle_out);
    }

    /// The sequential and parallel batch drivers must agree on every query,
    /// independent of how rayon happens to schedule the work.
    #[test]
    fn parallel_matches_sequential(
        barriers in prop::collection::vec(segment(), 0..64),
        queries in prop::collection::vec(segment(), 1..32),
    ) {
        let state = PrequeryState::build(&barriers).unwrap();

        let mut sequential = vec![0u8; queries.len()];
        xbarrier::query_batch(&state, &queries, &mut sequential).unwrap();

        let mut parallel = vec![0u8; queries.len()];
        xbarrier::query_batch_parallel(&state, &queries, &mut parallel).unwrap();

        prop_assert_eq!(sequential, parallel);
    }

    /// Swapping a query's endpoints must never change the outcome — a
    /// segment is undirected — checked end-to-end through the dispatched
    /// kernel, not just the geometry predicate in isolation.
    #[test]
    fn query_endpoint_swap_is_invariant(
        barriers in prop::collection::vec(segment(), 0..64),
        query in segment(),
    ) {
        let state = PrequeryState::build(&barriers).unwrap();
        let swapped = Segment::new(query.p2, query.p1);

        let mut out = [0u8];
        let mut swapped_out = [0u8];
        xbarrier::query_batch(&state, &[query], &mut out).unwrap();
        xbarrier::query_batch(&state, &[swapped], &mut swapped_out).unwrap();

        prop_assert_eq!(out[0], swapped_out[0]);
    }
}
