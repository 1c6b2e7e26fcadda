//! The prequery barrier layout: a packed, 32-byte-aligned chunk buffer
//! derived from an input array of barrier segments.

use crate::error::BarrierError;
use crate::geom::Segment;

/// Coordinates must satisfy `|x|, |y| ≤ MAX_COORD_MAGNITUDE`.
///
/// `x1 − x2` / `y2 − y1` can silently overflow `i16` at the full `i16`
/// range (e.g. `32767 − (−32768)`). Widening the stored deltas to 32 bits
/// would break the fixed 16-lane, 32-byte [`Chunk`] layout the SIMD kernel
/// depends on, so this crate enforces a validated safe range instead.
/// `2^14 − 1` guarantees `|x1 − x2|, |y2 − y1| ≤ 32_766 < i16::MAX`.
pub const MAX_COORD_MAGNITUDE: i16 = 16_383;

/// Validate a segment's coordinates against [`MAX_COORD_MAGNITUDE`].
/// Called at every boundary that feeds a segment into the chunk layout or
/// the kernel's query-side precomputation (barriers at load time, queries
/// at query time).
pub fn validate_segment(seg: &Segment) -> Result<(), BarrierError> {
    for pt in [seg.p1, seg.p2] {
        if pt.x.unsigned_abs() > MAX_COORD_MAGNITUDE as u16
            || pt.y.unsigned_abs() > MAX_COORD_MAGNITUDE as u16
        {
            return Err(BarrierError::CoordinateRangeExceeded { x: pt.x, y: pt.y });
        }
    }
    Ok(())
}

/// A 256-bit (32-byte) aligned record holding two pre-processed barriers
/// as sixteen 16-bit lanes:
///
/// ```text
/// lane:  0   1   2   3   4     5     6  7  |  8   9  10  11  12    13    14 15
///        y1  x1  y2  x2  x1−x2 y2−y1 0  0     y1  x1  y2  x2  x1−x2 y2−y1 0  0
///        └──────── barrier A ────────┘        └──────── barrier B ────────┘
/// ```
///
/// The two zero tails are load-bearing: they are multiplied in as
/// operands in lanes that must not affect the orientation result for a
/// padding barrier (see [`PrequeryState::build`]).
#[repr(C, align(32))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Chunk(pub [i16; 16]);

impl Chunk {
    const ZERO: Chunk = Chunk([0; 16]);

    /// Write one barrier into this chunk's lower (`half == 0`) or upper
    /// (`half == 1`) half.
    fn set_barrier(&mut self, half: usize, seg: Segment) {
        debug_assert!(half < 2);
        let base = half * 8;
        let (p1, p2) = (seg.p1, seg.p2);
        self.0[base] = p1.y;
        self.0[base + 1] = p1.x;
        self.0[base + 2] = p2.y;
        self.0[base + 3] = p2.x;
        self.0[base + 4] = p1.x - p2.x;
        self.0[base + 5] = p2.y - p1.y;
        self.0[base + 6] = 0;
        self.0[base + 7] = 0;
    }
}

/// `num_chunks = 2 · ⌈N / 4⌉` — one SIMD iteration consumes two chunks
/// (four barriers), so the chunk count is always even.
pub(crate) fn num_chunks_for(n: usize) -> usize {
    2 * n.div_ceil(4)
}

/// The immutable, 32-byte-aligned chunk buffer plus its chunk count,
/// built once per barrier set and queried many times. Read-only after
/// construction — no query mutates it — so it is safely shared behind an
/// `Arc` across threads (see [`crate::registry`]).
#[derive(Debug)]
pub struct PrequeryState {
    pub(crate) chunks: Vec<Chunk>,
}

impl PrequeryState {
    /// Build a prequery state from `barriers`. `Vec<Chunk>` is used
    /// (rather than a hand-rolled aligned allocation) specifically
    /// because `Chunk`'s own `align(32)` makes the global allocator size
    /// and align the backing allocation correctly for us, and frees it
    /// correctly on drop — no matching "aligned free" call to get wrong.
    ///
    /// Every chunk starts zeroed before any barrier is written, so any
    /// unfilled slot reads back as an all-zero barrier (`p1 = p2 = (0,0)`)
    /// unconditionally rather than only for the trailing two chunks.
    pub fn build(barriers: &[Segment]) -> Result<Self, BarrierError> {
        for barrier in barriers {
            validate_segment(barrier)?;
        }

        let num_chunks = num_chunks_for(barriers.len());
        let mut chunks = vec![Chunk::ZERO; num_chunks];

        for (i, barrier) in barriers.iter().enumerate() {
            let chunk_idx = i / 2;
            let half = i % 2;
            chunks[chunk_idx].set_barrier(half, *barrier);
        }

        Ok(Self { chunks })
    }

    /// Number of 32-byte chunks in the buffer. Always even.
    pub fn num_chunks(&self) -> usize {
        self.chunks.len()
    }

    /// Number of barrier slots the buffer has capacity for (`≥` the
    /// number of barriers actually loaded; extra slots are zero-padded).
    pub fn capacity(&self) -> usize {
        self.chunks.len() * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;

    fn seg(x1: i16, y1: i16, x2: i16, y2: i16) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn num_chunks_is_always_even_and_covers_n() {
        for n in 0..20usize {
            let nc = num_chunks_for(n);
            assert_eq!(nc % 2, 0, "num_chunks must be even for n={n}");
            assert!(nc >= 2 * n.div_ceil(4));
        }
    }

    #[test]
    fn empty_barrier_set_has_zero_chunks() {
        let state = PrequeryState::build(&[]).unwrap();
        assert_eq!(state.num_chunks(), 0);
    }

    #[test]
    fn tail_padding_is_zeroed() {
        // 1 barrier -> num_chunks = 2 * ceil(1/4) = 2; barrier lives in
        // chunk 0 half 0. Chunk 0 half 1 and all of chunk 1 must be zero.
        let state = PrequeryState::build(&[seg(100, 100, 200, 200)]).unwrap();
        assert_eq!(state.num_chunks(), 2);
        assert_eq!(&state.chunks[0].0[8..16], &[0i16; 8]);
        assert_eq!(state.chunks[1], Chunk::ZERO);
    }

    #[test]
    fn barrier_fields_land_in_expected_lanes() {
        let state = PrequeryState::build(&[seg(1, 2, 3, 4)]).unwrap();
        let lanes = &state.chunks[0].0[0..8];
        // y1, x1, y2, x2, x1-x2, y2-y1, 0, 0
        assert_eq!(lanes, &[2, 1, 4, 3, 1 - 3, 4 - 2, 0, 0]);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let too_big = MAX_COORD_MAGNITUDE as i32 + 1;
        let s = seg(too_big as i16, 0, 0, 0);
        assert!(matches!(
            PrequeryState::build(&[s]),
            Err(BarrierError::CoordinateRangeExceeded { .. })
        ));
    }
}
