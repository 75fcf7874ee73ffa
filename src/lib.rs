//! tensorfile - Sequential binary container for homogeneous tensors
//!
//! A single file holds one fixed-size header (element type, shape, running
//! array count) followed by raw tensor payloads, all of identical type and
//! shape. The header is committed by the first write and frozen thereafter,
//! which keeps random access by index well-defined: every payload has the
//! same byte size.
//!
//! # Features
//!
//! - Sequential append and sequential/random-access reads by index
//! - Type-erased [`Tensor`] buffers with lossless typed round-trips
//! - Self-describing little-endian header with magic and version
//! - Crash-conservative array count (persisted after each payload)
//! - Optional ndarray integration behind the `ndarray` feature
//!
//! # Example
//!
//! ```rust
//! use tensorfile::{OpenMode, Tensor, TensorStream};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("batch.tensor");
//!
//! let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
//! let tensor = Tensor::from_elems(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
//! out.write(&tensor).unwrap();
//! out.close().unwrap();
//!
//! let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
//! assert_eq!(input.len().unwrap(), 1);
//! assert_eq!(input.shape().unwrap(), &[2, 2]);
//! let back = input.read_next().unwrap();
//! assert_eq!(back.to_elems::<f32>().unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
//! ```

pub mod error;
pub mod stream;
pub mod types;

#[cfg(feature = "ndarray")]
pub mod ndarray_ext;

// Re-export common types at crate root
pub use error::{Error, Result};
pub use stream::{OpenMode, TensorStream};
pub use types::{
    COUNT_OFFSET, Element, ElementType, FileHeader, HEADER_SIZE, MAGIC, MAX_DIMS, Tensor, VERSION,
};
