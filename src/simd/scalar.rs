//! Portable scalar kernel over the chunk buffer: the semantic reference
//! every other kernel must agree with. Used on non-x86_64 targets, on
//! x86_64 hosts without AVX2, and whenever
//! [`crate::config::KernelConfig::force_scalar`] is set.
//!
//! This walks the *same* [`Chunk`] buffer the AVX2 kernel reads, four
//! barriers at a time, and computes the identical `o1..o4` raw cross
//! products the AVX2 `madd` step produces, with plain `i32` arithmetic. It
//! is not derived from [`crate::geom::intersects`] — that independence is
//! what makes the SIMD/scalar-over-chunks and
//! scalar-over-chunks/oracle-over-raw-barriers comparisons in
//! `tests/equivalence.rs` meaningful cross-checks rather than the same
//! code twice.

use crate::geom::Segment;
use crate::layout::Chunk;

struct QueryRegisters {
    bax: i32,
    aby: i32,
    ax: i32,
    ay: i32,
    bx: i32,
    by: i32,
}

impl QueryRegisters {
    fn new(query: Segment) -> Self {
        let (ax, ay) = (query.p1.x as i32, query.p1.y as i32);
        let (bx, by) = (query.p2.x as i32, query.p2.y as i32);
        Self { bax: bx - ax, aby: ay - by, ax, ay, bx, by }
    }
}

/// One barrier's four lanes as read back out of its half-chunk.
struct Barrier {
    cx: i32,
    cy: i32,
    dx: i32,
    dy: i32,
    cdx: i32, // x1 - x2, pre-stored
    dcy: i32, // y2 - y1, pre-stored
}

fn read_barrier(chunk: &Chunk, half: usize) -> Barrier {
    let base = half * 8;
    let l = &chunk.0;
    Barrier {
        cy: l[base] as i32,
        cx: l[base + 1] as i32,
        dy: l[base + 2] as i32,
        dx: l[base + 3] as i32,
        cdx: l[base + 4] as i32,
        dcy: l[base + 5] as i32,
    }
}

/// `o1..o4` raw cross products for one barrier against the query:
/// `[bax·bcy+aby·bcx, bax·bdy+aby·bdx, cdx·ady+dcy·adx, cdx·bdy+dcy·bdx]`.
/// Each pair's sign disagreement is what [`barrier_intersects`] checks for.
fn raw_orientations(q: &QueryRegisters, b: &Barrier) -> [i32; 4] {
    let bcx = q.bx - b.cx;
    let bcy = q.by - b.cy;
    let bdx = q.bx - b.dx;
    let bdy = q.by - b.dy;
    let adx = q.ax - b.dx;
    let ady = q.ay - b.dy;

    let o1 = q.bax * bcy + q.aby * bcx;
    let o2 = q.bax * bdy + q.aby * bdx;
    let o3 = b.cdx * ady + b.dcy * adx;
    let o4 = b.cdx * bdy + b.dcy * bdx;
    [o1, o2, o3, o4]
}

fn barrier_intersects(q: &QueryRegisters, b: &Barrier) -> bool {
    let [o1, o2, o3, o4] = raw_orientations(q, b);
    o1.signum() != o2.signum() && o3.signum() != o4.signum()
}

/// Evaluate `query` against every barrier packed into `chunks`, in pairs
/// (two chunks = four barriers per step), short-circuiting on the first
/// intersecting barrier — same iteration shape as the AVX2 kernel.
pub(crate) fn any_intersection(query: Segment, chunks: &[Chunk]) -> bool {
    let q = QueryRegisters::new(query);
    for pair in chunks.chunks_exact(2) {
        for chunk in pair {
            for half in 0..2 {
                let barrier = read_barrier(chunk, half);
                if barrier_intersects(&q, &barrier) {
                    return true;
                }
            }
        }
    }
    false
}
