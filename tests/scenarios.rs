//! End-to-end scenarios exercised through the public crate API and the C
//! ABI together, rather than against any one internal module in
//! isolation.

use xbarrier::ffi::{
    xbarrier_free_prequery_any_segment_intersections, xbarrier_get_version,
    xbarrier_load_prequery_any_segment_intersections, xbarrier_query_any_segment_intersections,
    Seg2I16,
};
use xbarrier::{ApiResult, Point, PrequeryState, Segment};

fn seg(x1: i16, y1: i16, x2: i16, y2: i16) -> Segment {
    Segment::new(Point::new(x1, y1), Point::new(x2, y2))
}

fn wire(x1: i16, y1: i16, x2: i16, y2: i16) -> Seg2I16 {
    Seg2I16 { x1, y1, x2, y2 }
}

fn run_via_native_api(barriers: &[Segment], queries: &[Segment]) -> Vec<u8> {
    let state = PrequeryState::build(barriers).unwrap();
    let mut out = vec![0u8; queries.len()];
    xbarrier::query_batch(&state, queries, &mut out).unwrap();
    out
}

#[test]
fn scenario_1_crossing_x() {
    let out = run_via_native_api(&[seg(0, 10, 10, 0)], &[seg(0, 0, 10, 10)]);
    assert_eq!(out, [1]);
}

#[test]
fn scenario_2_parallel_miss() {
    let out = run_via_native_api(&[seg(0, 1, 10, 1)], &[seg(0, 0, 10, 0)]);
    assert_eq!(out, [0]);
}

#[test]
fn scenario_3_collinear_overlap_not_detected() {
    let out = run_via_native_api(&[seg(5, 0, 15, 0)], &[seg(0, 0, 10, 0)]);
    assert_eq!(out, [0]);
}

#[test]
fn scenario_4_shared_endpoint_is_not_a_proper_cross() {
    let out = run_via_native_api(&[seg(10, 0, 10, 10)], &[seg(0, 0, 10, 0)]);
    assert_eq!(out, [0]);
}

#[test]
fn scenario_5_t_junction_not_detected() {
    let out = run_via_native_api(&[seg(5, 0, 5, 10)], &[seg(0, 0, 10, 0)]);
    assert_eq!(out, [0]);
}

#[test]
fn scenario_6_tail_padding_never_matches() {
    let out = run_via_native_api(&[seg(100, 100, 200, 200)], &[seg(0, 0, 1, 1)]);
    assert_eq!(out, [0]);
}

#[test]
fn scenario_7_batch() {
    let barriers = [seg(0, 5, 10, 5), seg(5, 0, 5, 10)];
    let queries = [seg(0, 0, 10, 10), seg(100, 100, 200, 200), seg(4, 6, 6, 4)];
    let out = run_via_native_api(&barriers, &queries);
    assert_eq!(out, [1, 0, 1]);
}

/// The same batch scenario, driven entirely through the C ABI: load,
/// query, free — matching how a non-Rust caller actually exercises this
/// crate.
#[test]
fn scenario_7_through_the_c_abi() {
    let mut version = 0i32;
    assert_eq!(unsafe { xbarrier_get_version(&mut version) }, ApiResult::Success);
    assert_eq!(version, 1337);

    let barriers = [wire(0, 5, 10, 5), wire(5, 0, 5, 10)];
    let mut handle = 0u64;
    let load_result = unsafe {
        xbarrier_load_prequery_any_segment_intersections(
            barriers.as_ptr(),
            barriers.len() as i32,
            &mut handle,
        )
    };
    assert_eq!(load_result, ApiResult::Success);

    let queries = [wire(0, 0, 10, 10), wire(100, 100, 200, 200), wire(4, 6, 6, 4)];
    let mut results = [0u8; 3];
    let query_result = unsafe {
        xbarrier_query_any_segment_intersections(
            handle,
            queries.as_ptr(),
            queries.len() as i32,
            results.as_mut_ptr(),
        )
    };
    assert_eq!(query_result, ApiResult::Success);
    assert_eq!(results, [1, 0, 1]);

    assert_eq!(
        unsafe { xbarrier_free_prequery_any_segment_intersections(handle) },
        ApiResult::Success
    );
    assert_eq!(
        unsafe { xbarrier_free_prequery_any_segment_intersections(handle) },
        ApiResult::ErrorUnknownHandle
    );
}

/// Registry invariants: handles strictly increase, and the parallel
/// driver must report identical results to the sequential one.
#[test]
fn registry_handles_are_strictly_increasing() {
    let registry = xbarrier::Registry::new();
    let h1 = registry.load(&[]).unwrap();
    let h2 = registry.load(&[]).unwrap();
    assert!(h2 > h1);
}

#[test]
fn parallel_driver_agrees_with_sequential_for_scenario_7() {
    let barriers = [seg(0, 5, 10, 5), seg(5, 0, 5, 10)];
    let queries = [seg(0, 0, 10, 10), seg(100, 100, 200, 200), seg(4, 6, 6, 4)];
    let state = PrequeryState::build(&barriers).unwrap();

    let mut sequential = vec![0u8; queries.len()];
    let mut parallel = vec![0u8; queries.len()];
    xbarrier::query_batch(&state, &queries, &mut sequential).unwrap();
    xbarrier::query_batch_parallel(&state, &queries, &mut parallel).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential, [1, 0, 1]);
}
