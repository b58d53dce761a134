use thiserror::Error;

/// Structural failures that abort a plan run before any buffer is allocated.
///
/// Degraded-but-successful conditions (unmet stock caps, malformed supplier
/// lines) are *not* errors; they travel as data in the successful result.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("palette is empty after filtering; nothing to quantize against")]
    EmptyPalette,

    #[error("grid dimensions cannot be zero")]
    ZeroGridDimension,

    #[error("pixel buffer length {len} does not match grid {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },
}
