//! Error types for tensorfile

use crate::types::ElementType;

/// Errors raised by the tensorfile format layer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Introspection or read before the header was committed
    #[error("tensor file header not initialized")]
    Uninitialized,

    /// Re-initialization after the header was committed
    #[error("tensor file header already initialized")]
    AlreadyInitialized,

    /// Operation on a closed stream
    #[error("tensor stream is closed")]
    Closed,

    /// Element type disagrees with the committed header or requested type
    #[error("element type mismatch: expected {expected:?}, got {actual:?}")]
    TypeMismatch {
        expected: ElementType,
        actual: ElementType,
    },

    /// Shape disagrees with the committed header
    #[error("shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch { expected: Vec<u64>, actual: Vec<u64> },

    /// Requested dimensionality disagrees with the stored dimensionality
    #[error("dimensionality mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Read past the last stored tensor, or out-of-range dimension index
    #[error("index {index} out of bounds (len {len})")]
    IndexOutOfBounds { index: u64, len: u64 },

    /// Raw storage size disagrees with dtype and shape
    #[error("data size mismatch: expected {expected} bytes, got {actual}")]
    DataSizeMismatch { expected: u64, actual: u64 },

    /// Invalid magic bytes
    #[error("invalid magic bytes, not a tensor file")]
    BadMagic,

    /// Unsupported format version
    #[error("unsupported tensor file version: {0}")]
    UnsupportedVersion(u32),

    /// Invalid dtype tag in the header
    #[error("invalid dtype tag: 0x{0:02X}")]
    InvalidDType(u8),

    /// Dimensionality outside 1..=MAX_DIMS
    #[error("invalid dimensionality: {0}")]
    InvalidDimensionality(usize),

    /// Shape with a zero extent
    #[error("invalid shape, extents must be positive: {0:?}")]
    InvalidShape(Vec<u64>),

    /// Array is not in standard (contiguous row-major) layout
    #[error("array is not contiguous; call .as_standard_layout().into_owned() first")]
    NotContiguous,

    /// Underlying stream open/seek/read/write failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
