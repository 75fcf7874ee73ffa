//! ndarray integration for tensorfile
//!
//! Conversions between the type-erased [`Tensor`] and statically-typed
//! ndarray arrays, plus typed read/write shortcuts on [`TensorStream`].
//!
//! Enable with the `ndarray` feature flag.

use ndarray::{Array, ArrayD, Dimension, IxDyn};

use crate::error::{Error, Result};
use crate::stream::TensorStream;
use crate::types::{Element, Tensor};

impl Tensor {
    /// Create a tensor from an ndarray array
    ///
    /// Takes ownership of a contiguous array. Returns error if not contiguous.
    /// Use `.as_standard_layout().into_owned()` to make non-contiguous arrays
    /// contiguous.
    pub fn from_ndarray<T: Element, D: Dimension>(arr: Array<T, D>) -> Result<Self> {
        if !arr.is_standard_layout() {
            return Err(Error::NotContiguous);
        }

        let shape: Vec<u64> = arr.shape().iter().map(|&d| d as u64).collect();
        let (vec, offset) = arr.into_raw_vec_and_offset();

        // offset must be 0 for safe reinterpretation
        // (offset > 0 means data doesn't start at vec's allocation start)
        if offset != Some(0) {
            return Err(Error::NotContiguous);
        }

        Tensor::from_elems(shape, vec)
    }

    /// Convert to an ndarray array of fixed dimensionality `D`
    ///
    /// Fails with `TypeMismatch` if `T` differs from the stored dtype and
    /// `DimensionMismatch` if `D` differs from the stored dimensionality.
    pub fn to_ndarray<T: Element, D: Dimension>(&self) -> Result<Array<T, D>> {
        if let Some(ndim) = D::NDIM
            && ndim != self.ndim()
        {
            return Err(Error::DimensionMismatch {
                expected: ndim,
                actual: self.ndim(),
            });
        }

        self.to_ndarray_dyn()?
            .into_dimensionality::<D>()
            .map_err(|_| Error::DimensionMismatch {
                expected: D::NDIM.unwrap_or(self.ndim()),
                actual: self.ndim(),
            })
    }

    /// Convert to an ndarray array of dynamic dimensionality
    pub fn to_ndarray_dyn<T: Element>(&self) -> Result<ArrayD<T>> {
        let elems = self.to_elems::<T>()?;
        let shape: Vec<usize> = self.shape.iter().map(|&d| d as usize).collect();

        ArrayD::from_shape_vec(IxDyn(&shape), elems).map_err(|_| Error::ShapeMismatch {
            expected: self.shape.clone(),
            actual: vec![self.num_elements()],
        })
    }
}

impl TensorStream {
    /// Append one ndarray array
    pub fn write_ndarray<T: Element, D: Dimension>(&mut self, arr: Array<T, D>) -> Result<()> {
        let tensor = Tensor::from_ndarray(arr)?;
        self.write(&tensor)
    }

    /// Read the array at the sequential cursor and advance it
    pub fn read_next_ndarray<T: Element, D: Dimension>(&mut self) -> Result<Array<T, D>> {
        self.read_next()?.to_ndarray()
    }

    /// Read the array at `index` without moving the sequential cursor
    pub fn read_at_ndarray<T: Element, D: Dimension>(&mut self, index: u64) -> Result<Array<T, D>> {
        self.read_at(index)?.to_ndarray()
    }
}
