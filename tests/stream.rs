//! Integration tests for the tensor container stream
//!
//! These exercise the full write/close/reopen lifecycle on real files.

use num_complex::Complex64;
use tensorfile::{ElementType, Error, HEADER_SIZE, OpenMode, Tensor, TensorStream};

fn scratch(name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

// =============================================================================
// Write, close, reopen
// =============================================================================

#[test]
fn write_close_reopen_describes_contents() {
    let (_dir, path) = scratch("describe.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    let tensor = Tensor::from_elems(vec![2, 4, 8], vec![0u16; 64]).unwrap();
    out.write(&tensor).unwrap();
    out.close().unwrap();

    let input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.dtype().unwrap(), ElementType::U16);
    assert_eq!(input.ndim().unwrap(), 3);
    assert_eq!(input.shape().unwrap(), &[2, 4, 8]);
    assert_eq!(input.len().unwrap(), 1);
    assert_eq!(input.num_elements().unwrap(), 64);
}

#[test]
fn roundtrip_is_byte_for_byte() {
    let (_dir, path) = scratch("roundtrip.tensor");

    let values: Vec<f64> = (0..12).map(|i| i as f64 * 0.25 - 1.0).collect();
    let tensor = Tensor::from_elems(vec![3, 4], values.clone()).unwrap();

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&tensor).unwrap();
    out.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    let back = input.read_next().unwrap();
    assert_eq!(back.as_bytes(), tensor.as_bytes());
    assert_eq!(back.to_elems::<f64>().unwrap(), values);
}

#[test]
fn roundtrip_complex128() {
    let (_dir, path) = scratch("complex.tensor");

    let values: Vec<Complex64> = (0..64)
        .map(|i| Complex64::new(i as f64, -(i as f64) / 2.0))
        .collect();
    let tensor = Tensor::from_elems(vec![2, 4, 8], values.clone()).unwrap();

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&tensor).unwrap();
    out.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.dtype().unwrap(), ElementType::C128);
    let back = input.read_next().unwrap();
    assert_eq!(back.to_elems::<Complex64>().unwrap(), values);
}

// =============================================================================
// Count and indexing
// =============================================================================

#[test]
fn count_is_monotonic_and_bounds_reads() {
    let (_dir, path) = scratch("count.tensor");

    let n = 10u64;
    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    for k in 0..n {
        let tensor = Tensor::from_elems(vec![3], vec![k as i64; 3]).unwrap();
        out.write(&tensor).unwrap();
        assert_eq!(out.len().unwrap(), k + 1);
    }
    out.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.len().unwrap(), n);
    for k in 0..n {
        let tensor = input.read_at(k).unwrap();
        assert_eq!(tensor.to_elems::<i64>().unwrap(), vec![k as i64; 3]);
    }
    assert!(matches!(
        input.read_at(n),
        Err(Error::IndexOutOfBounds { index, len }) if index == n && len == n
    ));
}

#[test]
fn random_access_does_not_move_sequential_cursor() {
    let (_dir, path) = scratch("cursor.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    for k in 0..3u8 {
        out.write(&Tensor::from_elems(vec![2], vec![k, k]).unwrap())
            .unwrap();
    }
    out.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.read_next().unwrap().to_elems::<u8>().unwrap(), [0, 0]);

    // Random access in between must not disturb the cursor
    assert_eq!(input.read_at(2).unwrap().to_elems::<u8>().unwrap(), [2, 2]);
    assert_eq!(input.read_at(0).unwrap().to_elems::<u8>().unwrap(), [0, 0]);

    assert_eq!(input.read_next().unwrap().to_elems::<u8>().unwrap(), [1, 1]);
    assert_eq!(input.read_next().unwrap().to_elems::<u8>().unwrap(), [2, 2]);
    assert!(matches!(
        input.read_next(),
        Err(Error::IndexOutOfBounds { .. })
    ));
}

// =============================================================================
// Header lock-in
// =============================================================================

#[test]
fn shape_and_type_are_locked_by_first_write() {
    let (_dir, path) = scratch("lockin.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&Tensor::from_elems(vec![2, 3], vec![0.0f32; 6]).unwrap())
        .unwrap();

    let wrong_shape = Tensor::from_elems(vec![3, 2], vec![0.0f32; 6]).unwrap();
    assert!(matches!(
        out.write(&wrong_shape),
        Err(Error::ShapeMismatch { .. })
    ));

    let wrong_type = Tensor::from_elems(vec![2, 3], vec![0.0f64; 6]).unwrap();
    assert!(matches!(
        out.write(&wrong_type),
        Err(Error::TypeMismatch { .. })
    ));

    // Header and count are unchanged by the failed writes
    assert_eq!(out.shape().unwrap(), &[2, 3]);
    assert_eq!(out.dtype().unwrap(), ElementType::F32);
    assert_eq!(out.len().unwrap(), 1);
    out.close().unwrap();

    let input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.shape().unwrap(), &[2, 3]);
    assert_eq!(input.len().unwrap(), 1);
}

#[test]
fn uninitialized_guards_on_fresh_output() {
    let (_dir, path) = scratch("fresh.tensor");
    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();

    assert!(matches!(out.len(), Err(Error::Uninitialized)));
    assert!(matches!(out.dtype(), Err(Error::Uninitialized)));
    assert!(matches!(out.ndim(), Err(Error::Uninitialized)));
    assert!(matches!(out.shape(), Err(Error::Uninitialized)));
    assert!(matches!(out.num_elements(), Err(Error::Uninitialized)));
    assert!(matches!(out.dim(0), Err(Error::Uninitialized)));
    assert!(matches!(out.read_next(), Err(Error::Uninitialized)));
    assert!(matches!(out.read_at(0), Err(Error::Uninitialized)));
}

#[test]
fn oversized_dimensionality_rejected_at_commit() {
    let (_dir, path) = scratch("dims.tensor");
    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();

    let tensor = Tensor::from_elems(vec![1, 1, 1, 1, 2], vec![0u8; 2]).unwrap();
    assert!(matches!(
        out.write(&tensor),
        Err(Error::InvalidDimensionality(5))
    ));
    assert!(matches!(out.len(), Err(Error::Uninitialized)));
}

// =============================================================================
// Append mode
// =============================================================================

#[test]
fn append_preserves_existing_tensors() {
    let (_dir, path) = scratch("append.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&Tensor::from_elems(vec![2], vec![1u32, 2]).unwrap())
        .unwrap();
    out.write(&Tensor::from_elems(vec![2], vec![3u32, 4]).unwrap())
        .unwrap();
    out.close().unwrap();

    let mut appender = TensorStream::open(&path, OpenMode::Append).unwrap();
    assert_eq!(appender.len().unwrap(), 2);
    appender
        .write(&Tensor::from_elems(vec![2], vec![5u32, 6]).unwrap())
        .unwrap();
    assert_eq!(appender.len().unwrap(), 3);
    appender.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.len().unwrap(), 3);
    for (k, expected) in [[1u32, 2], [3, 4], [5, 6]].iter().enumerate() {
        assert_eq!(
            input.read_at(k as u64).unwrap().to_elems::<u32>().unwrap(),
            expected.to_vec()
        );
        assert_eq!(
            input.read_next().unwrap().to_elems::<u32>().unwrap(),
            expected.to_vec()
        );
    }
}

#[test]
fn append_to_missing_file_behaves_like_write() {
    let (_dir, path) = scratch("append_fresh.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Append).unwrap();
    assert!(matches!(out.len(), Err(Error::Uninitialized)));

    out.write(&Tensor::from_elems(vec![1], vec![9i8]).unwrap())
        .unwrap();
    assert_eq!(out.len().unwrap(), 1);
    out.close().unwrap();

    let input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.len().unwrap(), 1);
}

#[test]
fn append_validates_against_existing_header() {
    let (_dir, path) = scratch("append_lockin.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&Tensor::from_elems(vec![4], vec![0.0f32; 4]).unwrap())
        .unwrap();
    out.close().unwrap();

    let mut appender = TensorStream::open(&path, OpenMode::Append).unwrap();
    let wrong = Tensor::from_elems(vec![4], vec![0i32; 4]).unwrap();
    assert!(matches!(
        appender.write(&wrong),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(appender.len().unwrap(), 1);
}

// =============================================================================
// On-disk layout
// =============================================================================

#[test]
fn file_size_tracks_payloads() {
    let (_dir, path) = scratch("layout.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    let tensor = Tensor::from_elems(vec![1, 4], vec![1i32, 2, 3, 4]).unwrap();
    out.write(&tensor).unwrap();
    out.write(&tensor).unwrap();
    out.close().unwrap();

    let len = std::fs::metadata(&path).unwrap().len();
    assert_eq!(len, HEADER_SIZE as u64 + 2 * 16);
}

#[test]
fn truncated_payload_surfaces_as_io_error() {
    let (_dir, path) = scratch("truncated.tensor");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&Tensor::from_elems(vec![8], vec![0u64; 8]).unwrap())
        .unwrap();
    out.close().unwrap();

    // Chop off the tail of the only payload; the persisted count now
    // overstates what is actually on disk.
    let full = std::fs::metadata(&path).unwrap().len();
    let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
    file.set_len(full - 8).unwrap();
    drop(file);

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.len().unwrap(), 1);
    assert!(matches!(input.read_at(0), Err(Error::Io(_))));
}

// =============================================================================
// Full scenario (two int32 rows through write, reopen, both read paths)
// =============================================================================

#[test]
fn scenario_two_int32_rows() {
    let (_dir, path) = scratch("t.bin");

    let mut out = TensorStream::open(&path, OpenMode::Write).unwrap();
    out.write(&Tensor::from_elems(vec![1, 4], vec![1i32, 2, 3, 4]).unwrap())
        .unwrap();
    out.write(&Tensor::from_elems(vec![1, 4], vec![5i32, 6, 7, 8]).unwrap())
        .unwrap();
    out.close().unwrap();

    let mut input = TensorStream::open(&path, OpenMode::Read).unwrap();
    assert_eq!(input.len().unwrap(), 2);
    assert_eq!(
        input.read_at(0).unwrap().to_elems::<i32>().unwrap(),
        [1, 2, 3, 4]
    );
    assert_eq!(
        input.read_at(1).unwrap().to_elems::<i32>().unwrap(),
        [5, 6, 7, 8]
    );

    // Sequential reads start at the beginning regardless of the random
    // accesses above, then run off the end.
    assert_eq!(
        input.read_next().unwrap().to_elems::<i32>().unwrap(),
        [1, 2, 3, 4]
    );
    assert_eq!(
        input.read_next().unwrap().to_elems::<i32>().unwrap(),
        [5, 6, 7, 8]
    );
    assert!(matches!(
        input.read_next(),
        Err(Error::IndexOutOfBounds { .. })
    ));
}
