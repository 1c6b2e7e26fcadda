//! Exact integer orientation and the four-point segment-intersection test.
//!
//! Every coordinate is a signed 16-bit integer; every cross product is
//! computed in 32-bit arithmetic before taking its sign, so the result is
//! exact for any pair of in-range points (see [`crate::layout::MAX_COORD_MAGNITUDE`]).

use serde::{Deserialize, Serialize};

/// A point in the integer plane.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i16,
    pub y: i16,
}

impl Point {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// A directed pair of endpoints. No semantic distinction is made between
/// `p1`/`p2` beyond which point the predicate calls "A" vs "B" — swapping
/// them never changes whether two segments intersect (see
/// `tests::endpoint_swap_invariant`).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// A segment is degenerate if both endpoints coincide. The predicate
    /// still behaves deterministically on these (it reports no
    /// intersection — see module docs).
    pub fn is_degenerate(&self) -> bool {
        self.p1 == self.p2
    }
}

/// Sign of a 2D cross product: `−1`, `0`, or `+1`.
#[repr(i8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Clockwise = -1,
    Neither = 0,
    CounterClockwise = 1,
}

impl Orientation {
    fn from_i32(v: i32) -> Self {
        match v.cmp(&0) {
            std::cmp::Ordering::Less => Orientation::Clockwise,
            std::cmp::Ordering::Equal => Orientation::Neither,
            std::cmp::Ordering::Greater => Orientation::CounterClockwise,
        }
    }
}

/// `sign((i32)ux·vy − (i32)uy·vx)`. Widening to 32 bits is mandatory:
/// `±32767 · ±32767` overflows `i16`.
pub fn orient(u: (i16, i16), v: (i16, i16)) -> Orientation {
    let (ux, uy) = (u.0 as i32, u.1 as i32);
    let (vx, vy) = (v.0 as i32, v.1 as i32);
    Orientation::from_i32(ux * vy - uy * vx)
}

/// `clockness(A, B, C) = orient(B−A, B−C)`. Note `B−C`, not `C−B` — this
/// convention is load-bearing for sign parity with the rest of the
/// predicate and must not be "simplified" away.
///
/// Intermediate differences are taken in `i16`. This is exact as long as
/// every coordinate satisfies [`crate::layout::MAX_COORD_MAGNITUDE`] —
/// the API boundary (`PrequeryState::build`, `query_batch`, `oracle::*`)
/// validates that before any predicate runs.
pub fn clockness(a: Point, b: Point, c: Point) -> Orientation {
    let bax = (b.x as i32 - a.x as i32) as i16;
    let bay = (b.y as i32 - a.y as i32) as i16;
    let bcx = (b.x as i32 - c.x as i32) as i16;
    let bcy = (b.y as i32 - c.y as i32) as i16;
    orient((bax, bay), (bcx, bcy))
}

/// Do segments `query` and `barrier` properly intersect?
///
/// `o1 = clockness(A,B,C)`, `o2 = clockness(A,B,D)`, `o3 = clockness(C,D,A)`,
/// `o4 = clockness(C,D,B)`; intersection holds iff `o1 ≠ o2 ∧ o3 ≠ o4`.
/// Collinear and endpoint-touching cases (any `o_i == Neither`) are never
/// reported — only a proper transversal cross counts. Short-circuits on
/// `o1 == o2` without computing `o3`/`o4`.
pub fn intersects(query: Segment, barrier: Segment) -> bool {
    let (a, b) = (query.p1, query.p2);
    let (c, d) = (barrier.p1, barrier.p2);

    let o1 = clockness(a, b, c);
    let o2 = clockness(a, b, d);
    if o1 == o2 {
        return false;
    }

    let o3 = clockness(c, d, a);
    let o4 = clockness(c, d, b);
    o3 != o4
}
