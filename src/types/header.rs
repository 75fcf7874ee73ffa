//! Fixed-size file header

use super::ElementType;
use crate::error::{Error, Result};

/// Magic bytes identifying a tensor file
pub const MAGIC: &[u8; 8] = b"TENSORF\0";

/// Current format version
pub const VERSION: u32 = 1;

/// Maximum supported number of dimensions
pub const MAX_DIMS: usize = 4;

/// Header size in bytes
///
/// Layout (all integers little-endian):
///
/// ```text
/// offset  size  field
/// 0       8     magic
/// 8       4     version (u32)
/// 12      1     dtype tag (u8)
/// 13      1     ndim (u8)
/// 14      2     reserved (zeros)
/// 16      32    shape[0..MAX_DIMS] (u64 each, unused trailing dims zero)
/// 48      8     array count (u64, rewritten in place on every write)
/// ```
pub const HEADER_SIZE: usize = 56;

/// Byte offset of the array count field
pub const COUNT_OFFSET: u64 = 48;

/// Committed header: element type and per-tensor shape, fixed for the
/// lifetime of the file. The running array count lives at [`COUNT_OFFSET`]
/// and is owned by the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub dtype: ElementType,
    pub shape: Vec<u64>,
}

impl FileHeader {
    /// Create a header, validating dimensionality and extents
    pub fn new(dtype: ElementType, shape: Vec<u64>) -> Result<Self> {
        if shape.is_empty() || shape.len() > MAX_DIMS {
            return Err(Error::InvalidDimensionality(shape.len()));
        }
        if shape.contains(&0) {
            return Err(Error::InvalidShape(shape));
        }
        Ok(Self { dtype, shape })
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements in one stored tensor
    pub fn num_elements(&self) -> u64 {
        self.shape.iter().product()
    }

    /// Size in bytes of one stored tensor payload
    pub fn payload_size(&self) -> u64 {
        self.num_elements() * self.dtype.element_size() as u64
    }

    /// Encode the header record with the given array count
    pub fn encode(&self, count: u64) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..8].copy_from_slice(MAGIC);
        buf[8..12].copy_from_slice(&VERSION.to_le_bytes());
        buf[12] = self.dtype as u8;
        buf[13] = self.shape.len() as u8;
        for (i, dim) in self.shape.iter().enumerate() {
            let at = 16 + i * 8;
            buf[at..at + 8].copy_from_slice(&dim.to_le_bytes());
        }
        buf[48..56].copy_from_slice(&count.to_le_bytes());
        buf
    }

    /// Decode and validate a header record, returning the stored array count
    pub fn decode(buf: &[u8; HEADER_SIZE]) -> Result<(Self, u64)> {
        if &buf[0..8] != MAGIC {
            return Err(Error::BadMagic);
        }

        let version = u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let dtype = ElementType::from_u8(buf[12]).ok_or(Error::InvalidDType(buf[12]))?;

        let ndim = buf[13] as usize;
        if ndim == 0 || ndim > MAX_DIMS {
            return Err(Error::InvalidDimensionality(ndim));
        }

        let mut shape = Vec::with_capacity(ndim);
        for i in 0..ndim {
            let at = 16 + i * 8;
            let dim = u64::from_le_bytes([
                buf[at],
                buf[at + 1],
                buf[at + 2],
                buf[at + 3],
                buf[at + 4],
                buf[at + 5],
                buf[at + 6],
                buf[at + 7],
            ]);
            shape.push(dim);
        }
        if shape.contains(&0) {
            return Err(Error::InvalidShape(shape));
        }

        let count = u64::from_le_bytes([
            buf[48], buf[49], buf[50], buf[51], buf[52], buf[53], buf[54], buf[55],
        ]);

        Ok((Self { dtype, shape }, count))
    }
}
