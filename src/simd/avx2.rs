//! AVX2 intersection kernel: one query against four barriers per
//! iteration. Every `__m256i` operation and lane layout below is dictated
//! by the chunk buffer's fixed memory layout — this is not a place for
//! "simplification," the lane order *is* the algorithm.

use crate::geom::Segment;
use crate::layout::Chunk;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Per-query constants: `lhs_add` and `rhs_left`, broadcast once per
/// query and reused across every chunk pair.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn load_query_registers(query: Segment) -> (__m256i, __m256i) {
    let ax = query.p1.x;
    let ay = query.p1.y;
    let bx = query.p2.x;
    let by = query.p2.y;

    let bax = bx - ax;
    let aby = ay - by;

    // Computed before lhs_add on purpose: matches the instruction
    // ordering of the reference implementation this kernel is grounded
    // on, which measured a small but reliable win from it.
    let rhs_left = _mm256_setr_epi16(
        by, bx, by, bx, ay, ax, by, bx, by, bx, by, bx, ay, ax, by, bx,
    );

    let lhs_add = _mm256_setr_epi16(
        bax, aby, bax, aby, 0, 0, 0, 0, bax, aby, bax, aby, 0, 0, 0, 0,
    );

    (lhs_add, rhs_left)
}

/// Constants reused across every iteration for a given query: the two
/// 32-bit-lane permutation masks and the all-ones vector used to extract
/// each cross product's sign.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn load_constant_vectors() -> (__m256i, __m256i, __m256i, __m256i) {
    let zeros = _mm256_setzero_si256();
    let ones = _mm256_set1_epi32(1);
    let rhs_right_swizzle = _mm256_setr_epi32(0, 1, 1, 1, 4, 5, 5, 5);
    let lhs_swizzle = _mm256_setr_epi32(3, 3, 2, 2, 7, 7, 6, 6);
    (zeros, ones, rhs_right_swizzle, lhs_swizzle)
}

/// Compute the four orientations for each of the two barriers packed
/// into `chunk`, as two `__m256i` words of eight `i32` lanes.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn clocknesses_for_chunk(
    ones: __m256i,
    rhs_right_swizzle: __m256i,
    lhs_swizzle: __m256i,
    lhs_add: __m256i,
    rhs_left: __m256i,
    chunk: __m256i,
) -> __m256i {
    let rhs_right = _mm256_permutevar8x32_epi32(chunk, rhs_right_swizzle);
    let rhs = _mm256_sub_epi16(rhs_left, rhs_right);

    let lhs = _mm256_add_epi16(lhs_add, _mm256_permutevar8x32_epi32(chunk, lhs_swizzle));

    // lhs . rhs, pairwise: [bax.bcy+aby.bcx, bax.bdy+aby.bdx,
    // cdx.ady+dcy.adx, cdx.bdy+dcy.bdx] per barrier -> o1, o2, o3, o4.
    let crosses = _mm256_madd_epi16(lhs, rhs);
    _mm256_sign_epi32(ones, crosses)
}

/// Evaluate `query` against the four barriers packed into `(chunk1,
/// chunk2)` and report whether any of them intersect it.
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
unsafe fn any_intersection_in_pair(
    ones: __m256i,
    zeros: __m256i,
    rhs_right_swizzle: __m256i,
    lhs_swizzle: __m256i,
    lhs_add: __m256i,
    rhs_left: __m256i,
    chunk1: __m256i,
    chunk2: __m256i,
) -> bool {
    let clocknesses1 =
        clocknesses_for_chunk(ones, rhs_right_swizzle, lhs_swizzle, lhs_add, rhs_left, chunk1);
    let clocknesses2 =
        clocknesses_for_chunk(ones, rhs_right_swizzle, lhs_swizzle, lhs_add, rhs_left, chunk2);

    // Interleaved horizontal subtract: yields, per barrier, (o1-o2, o3-o4).
    let cmp = _mm256_hsub_epi32(clocknesses1, clocknesses2);
    let win = _mm256_cmpeq_epi32(cmp, zeros);
    let mask = _mm256_movemask_epi8(win) as u32;

    // Top bit of every byte corresponds to one (o1==o2) or (o3==o4) flag.
    // `abits` isolates the four (o3==o4) flags, `bbits` (shifted into
    // alignment) the four (o1==o2) flags. A barrier intersects iff both
    // its flags are clear, i.e. the OR'd bit is 0 at its position.
    let abits = mask & 0b1000_0000_1000_0000_1000_0000_1000_0000;
    let bbits = (mask & 0b0000_1000_0000_1000_0000_1000_0000_1000) << 4;
    (abits | bbits) != 0b1000_0000_1000_0000_1000_0000_1000_0000
}

/// Evaluate `query` against every barrier packed into `chunks`,
/// processing four barriers (two chunks) per iteration, returning as
/// soon as any one intersects.
///
/// # Safety
/// Caller must ensure the AVX2 target feature is available (checked by
/// [`super::dispatch`] before this is ever called).
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn any_intersection(query: Segment, chunks: &[Chunk]) -> bool {
    debug_assert_eq!(chunks.len() % 2, 0);

    let (lhs_add, rhs_left) = load_query_registers(query);
    let (zeros, ones, rhs_right_swizzle, lhs_swizzle) = load_constant_vectors();

    for pair in chunks.chunks_exact(2) {
        let chunk1 = _mm256_load_si256(pair[0].0.as_ptr().cast());
        let chunk2 = _mm256_load_si256(pair[1].0.as_ptr().cast());

        if any_intersection_in_pair(
            ones,
            zeros,
            rhs_right_swizzle,
            lhs_swizzle,
            lhs_add,
            rhs_left,
            chunk1,
            chunk2,
        ) {
            return true;
        }
    }
    false
}
