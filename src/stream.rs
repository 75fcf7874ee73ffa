//! File-backed stream of homogeneous tensors
//!
//! A tensor file holds one fixed-size header (element type, shape, running
//! array count) followed by raw row-major payloads, all of identical type
//! and shape. The first write commits the header; every later write and
//! read is validated against it.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::{COUNT_OFFSET, ElementType, FileHeader, HEADER_SIZE, Tensor};

/// Mode a tensor file is opened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, header parsed eagerly, read-only
    Read,
    /// Create or truncate, header committed by the first write
    Write,
    /// Existing file with its header and count preserved, new writes land
    /// after the last payload; a missing file behaves like `Write`
    Append,
}

/// Reader/writer for a tensor file
///
/// Header state transitions once from uninitialized to committed: on the
/// first write in `Write` mode, or immediately at open in `Read`/`Append`
/// mode over an existing file. Reads and introspection fail with
/// [`Error::Uninitialized`] before that point.
pub struct TensorStream {
    file: Option<File>,
    header: Option<FileHeader>,
    count: u64,
    cursor: u64,
    mode: OpenMode,
}

impl TensorStream {
    /// Open a tensor file in the given mode
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        match mode {
            OpenMode::Read => {
                let mut file = OpenOptions::new().read(true).open(path)?;
                let (header, count) = read_header(&mut file)?;
                Ok(Self {
                    file: Some(file),
                    header: Some(header),
                    count,
                    cursor: 0,
                    mode,
                })
            }
            OpenMode::Write => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)?;
                Ok(Self {
                    file: Some(file),
                    header: None,
                    count: 0,
                    cursor: 0,
                    mode,
                })
            }
            OpenMode::Append => {
                let mut file = OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .open(path)?;
                let (header, count) = if file.metadata()?.len() == 0 {
                    (None, 0)
                } else {
                    let (header, count) = read_header(&mut file)?;
                    (Some(header), count)
                };
                Ok(Self {
                    file: Some(file),
                    header,
                    count,
                    cursor: 0,
                    mode,
                })
            }
        }
    }

    /// Commit the header explicitly, without writing a payload
    ///
    /// Fails with [`Error::AlreadyInitialized`] if the header was already
    /// committed, by a previous call or by a write.
    pub fn initialize(&mut self, dtype: ElementType, shape: Vec<u64>) -> Result<()> {
        if self.header.is_some() {
            return Err(Error::AlreadyInitialized);
        }
        let header = FileHeader::new(dtype, shape)?;
        self.commit_header(header)
    }

    /// Append one tensor
    ///
    /// The first write commits the header from the tensor's type and shape;
    /// later writes must match it exactly. The payload is written before the
    /// count field, so a crash leaves the persisted count no greater than
    /// the number of complete payloads present.
    pub fn write(&mut self, tensor: &Tensor) -> Result<()> {
        let expected = tensor.num_elements() * tensor.dtype.element_size() as u64;
        if tensor.data.len() as u64 != expected {
            return Err(Error::DataSizeMismatch {
                expected,
                actual: tensor.data.len() as u64,
            });
        }

        match &self.header {
            None => {
                let header = FileHeader::new(tensor.dtype, tensor.shape.clone())?;
                self.commit_header(header)?;
            }
            Some(header) => {
                if header.dtype != tensor.dtype {
                    return Err(Error::TypeMismatch {
                        expected: header.dtype,
                        actual: tensor.dtype,
                    });
                }
                if header.shape != tensor.shape {
                    return Err(Error::ShapeMismatch {
                        expected: header.shape.clone(),
                        actual: tensor.shape.clone(),
                    });
                }
            }
        }

        let offset = HEADER_SIZE as u64 + self.count * self.header()?.payload_size();
        let file = self.file.as_mut().ok_or(Error::Closed)?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(&tensor.data)?;
        self.count += 1;

        file.seek(SeekFrom::Start(COUNT_OFFSET))?;
        file.write_all(&self.count.to_le_bytes())?;
        Ok(())
    }

    /// Read the tensor at the sequential cursor and advance it
    pub fn read_next(&mut self) -> Result<Tensor> {
        self.header()?;
        if self.cursor >= self.count {
            return Err(Error::IndexOutOfBounds {
                index: self.cursor,
                len: self.count,
            });
        }
        let tensor = self.read_at(self.cursor)?;
        self.cursor += 1;
        Ok(tensor)
    }

    /// Read the tensor at `index` without moving the sequential cursor
    pub fn read_at(&mut self, index: u64) -> Result<Tensor> {
        let header = self.header()?;
        if index >= self.count {
            return Err(Error::IndexOutOfBounds {
                index,
                len: self.count,
            });
        }

        let payload_size = header.payload_size();
        let dtype = header.dtype;
        let shape = header.shape.clone();

        let file = self.file.as_mut().ok_or(Error::Closed)?;
        file.seek(SeekFrom::Start(HEADER_SIZE as u64 + index * payload_size))?;
        let mut data = vec![0u8; payload_size as usize];
        file.read_exact(&mut data)?;

        Tensor::new(dtype, shape, data)
    }

    /// Element type of every stored tensor
    pub fn dtype(&self) -> Result<ElementType> {
        Ok(self.header()?.dtype)
    }

    /// Number of dimensions of every stored tensor
    pub fn ndim(&self) -> Result<usize> {
        Ok(self.header()?.ndim())
    }

    /// Shape of every stored tensor
    pub fn shape(&self) -> Result<&[u64]> {
        Ok(&self.header()?.shape)
    }

    /// Extent of dimension `i`
    pub fn dim(&self, i: usize) -> Result<u64> {
        let header = self.header()?;
        header
            .shape
            .get(i)
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                index: i as u64,
                len: header.ndim() as u64,
            })
    }

    /// Number of elements in one stored tensor
    pub fn num_elements(&self) -> Result<u64> {
        Ok(self.header()?.num_elements())
    }

    /// Number of tensors stored so far
    pub fn len(&self) -> Result<u64> {
        self.header()?;
        Ok(self.count)
    }

    /// Whether no tensors are stored yet
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Mode the stream was opened in
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Whether the next operation can be attempted (false once closed)
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Flush and release the underlying file; repeat calls are a no-op
    ///
    /// The count is already persisted after every write, so this only syncs
    /// the handle in write modes.
    pub fn close(&mut self) -> Result<()> {
        if let Some(file) = self.file.take()
            && self.mode != OpenMode::Read
        {
            file.sync_all()?;
        }
        Ok(())
    }

    fn header(&self) -> Result<&FileHeader> {
        self.header.as_ref().ok_or(Error::Uninitialized)
    }

    fn commit_header(&mut self, header: FileHeader) -> Result<()> {
        let file = self.file.as_mut().ok_or(Error::Closed)?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(&header.encode(0))?;
        self.header = Some(header);
        self.count = 0;
        Ok(())
    }
}

impl Drop for TensorStream {
    fn drop(&mut self) {
        if let Some(file) = self.file.take()
            && self.mode != OpenMode::Read
        {
            let _ = file.sync_all();
        }
    }
}

fn read_header(file: &mut File) -> Result<(FileHeader, u64)> {
    let mut buf = [0u8; HEADER_SIZE];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut buf)?;
    FileHeader::decode(&buf)
}
