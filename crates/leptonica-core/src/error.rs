//! Error types for leptonica-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Recoverable parameter anomalies are not errors; they are reported through
//! [`crate::diagnostic::Diagnosed`] alongside a successful result.

use thiserror::Error;

/// Leptonica-rs error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid pixel depth
    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// Colormap required but not present
    #[error("colormap required but not present")]
    ColormapRequired,

    /// Colormap not allowed for this depth or operation
    #[error("colormap not allowed for depth {0} bpp")]
    ColormapNotAllowed(u32),

    /// Colormap has no room for another entry
    #[error("colormap full: {0} entries")]
    ColormapFull(usize),

    /// Index out of bounds
    #[error("index out of bounds: {index} >= {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Image dimension mismatch
    #[error("dimension mismatch: expected {}x{}, got {}x{}", .expected.0, .expected.1, .actual.0, .actual.1)]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Gray conversion weights do not sum to 1
    #[error("invalid gray weights: sum is {sum}, expected 1.0")]
    InvalidWeights { sum: f32 },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for Leptonica operations
pub type Result<T> = std::result::Result<T, Error>;
