//! Error types: a rich internal [`BarrierError`] for Rust callers, and the
//! three-value [`ApiResult`] the C ABI actually returns.

/// Errors this crate can produce. Using `thiserror` keeps each variant's
/// `Display` message colocated with its definition instead of in a
/// hand-written `impl Display` match.
#[derive(thiserror::Error, Debug)]
pub enum BarrierError {
    #[error("handle {0} is not registered")]
    UnknownHandle(u64),

    #[error("failed to allocate the prequery chunk buffer")]
    Allocation,

    #[error("coordinate ({x}, {y}) exceeds the safe range (|x|, |y| <= {})", crate::layout::MAX_COORD_MAGNITUDE)]
    CoordinateRangeExceeded { x: i16, y: i16 },

    #[error("query length {actual} does not match results buffer length {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// The three-way result code the C ABI returns. `Success` means every
/// `OUT` parameter was written; on any other value their contents are
/// undefined.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiResult {
    Success = 0,
    ErrorUnknownHandle = -100,
    ErrorUnknown = -999,
}

impl From<&BarrierError> for ApiResult {
    fn from(err: &BarrierError) -> Self {
        match err {
            BarrierError::UnknownHandle(_) => ApiResult::ErrorUnknownHandle,
            _ => ApiResult::ErrorUnknown,
        }
    }
}

impl From<BarrierError> for ApiResult {
    fn from(err: BarrierError) -> Self {
        ApiResult::from(&err)
    }
}
