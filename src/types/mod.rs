//! Core types for the tensorfile format

mod dtype;
mod header;
mod tensor;

pub use dtype::ElementType;
pub use header::{COUNT_OFFSET, FileHeader, HEADER_SIZE, MAGIC, MAX_DIMS, VERSION};
pub use tensor::{Element, Tensor};
