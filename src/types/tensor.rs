//! Type-erased tensor buffer

use num_complex::{Complex32, Complex64};

use super::ElementType;
use crate::error::{Error, Result};

/// Trait for scalar types that can be stored in a tensor
pub trait Element: Copy + 'static {
    const DTYPE: ElementType;
}

impl Element for u8 {
    const DTYPE: ElementType = ElementType::U8;
}
impl Element for i8 {
    const DTYPE: ElementType = ElementType::I8;
}
impl Element for u16 {
    const DTYPE: ElementType = ElementType::U16;
}
impl Element for i16 {
    const DTYPE: ElementType = ElementType::I16;
}
impl Element for u32 {
    const DTYPE: ElementType = ElementType::U32;
}
impl Element for i32 {
    const DTYPE: ElementType = ElementType::I32;
}
impl Element for u64 {
    const DTYPE: ElementType = ElementType::U64;
}
impl Element for i64 {
    const DTYPE: ElementType = ElementType::I64;
}
impl Element for f32 {
    const DTYPE: ElementType = ElementType::F32;
}
impl Element for f64 {
    const DTYPE: ElementType = ElementType::F64;
}
impl Element for Complex32 {
    const DTYPE: ElementType = ElementType::C64;
}
impl Element for Complex64 {
    const DTYPE: ElementType = ElementType::C128;
}

/// Owned type-erased tensor: element type, shape and raw row-major storage
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    pub dtype: ElementType,
    pub shape: Vec<u64>,
    pub data: Vec<u8>,
}

impl Tensor {
    /// Create from raw parts, validating the storage size against dtype and shape
    pub fn new(dtype: ElementType, shape: Vec<u64>, data: Vec<u8>) -> Result<Self> {
        let expected = shape.iter().product::<u64>() * dtype.element_size() as u64;
        if data.len() as u64 != expected {
            return Err(Error::DataSizeMismatch {
                expected,
                actual: data.len() as u64,
            });
        }
        Ok(Self { dtype, shape, data })
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Storage size in bytes
    pub fn byte_size(&self) -> u64 {
        self.num_elements() * self.dtype.element_size() as u64
    }

    /// Raw element storage for zero-copy handoff
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Create a tensor by moving a typed element vector into raw storage
    ///
    /// The element count must match the shape product.
    pub fn from_elems<T: Element>(shape: Vec<u64>, elems: Vec<T>) -> Result<Self> {
        let count: u64 = shape.iter().product();
        if count != elems.len() as u64 {
            return Err(Error::DataSizeMismatch {
                expected: count * std::mem::size_of::<T>() as u64,
                actual: (elems.len() * std::mem::size_of::<T>()) as u64,
            });
        }

        let byte_len = elems.len() * std::mem::size_of::<T>();
        let cap = elems.capacity() * std::mem::size_of::<T>();
        let ptr = elems.as_ptr();

        std::mem::forget(elems);

        // SAFETY:
        // - elems is forgotten so we own the allocation
        // - byte_len/cap are correctly scaled for u8
        // - T is a primitive (Element) with same memory repr as bytes
        let data = unsafe { Vec::from_raw_parts(ptr as *mut u8, byte_len, cap) };
        Ok(Self {
            dtype: T::DTYPE,
            shape,
            data,
        })
    }

    /// Decode the raw storage back into a typed element vector
    ///
    /// Fails with `TypeMismatch` if `T` differs from the stored dtype. No
    /// numeric casting is performed; type and size must match exactly.
    pub fn to_elems<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype {
            return Err(Error::TypeMismatch {
                expected: T::DTYPE,
                actual: self.dtype,
            });
        }

        let expected = self.num_elements() * std::mem::size_of::<T>() as u64;
        if self.data.len() as u64 != expected {
            return Err(Error::DataSizeMismatch {
                expected,
                actual: self.data.len() as u64,
            });
        }

        let elems: Vec<T> = self
            .data
            .chunks_exact(std::mem::size_of::<T>())
            .map(|chunk| {
                let mut arr = [0u8; 16]; // Max element size we support
                arr[..chunk.len()].copy_from_slice(chunk);
                // SAFETY:
                // - arr is a local buffer we just wrote valid bytes into
                // - T is constrained to Element (primitives only)
                // - All primitive types have no invalid bit patterns
                // - read_unaligned handles any alignment
                unsafe { std::ptr::read_unaligned(arr.as_ptr() as *const T) }
            })
            .collect();

        Ok(elems)
    }
}
