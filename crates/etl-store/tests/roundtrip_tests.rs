//! Integration tests for etl-store.
//!
//! Datasets written batch by batch must replay bit for bit, and their arrays
//! must stay readable as ordinary `.npy` files.

use etl_core::batch::Batch;
use ndarray::{Array1, Array3};

use etl_store::prelude::*;

// ============================================================================
// Test Utilities
// ============================================================================

/// Deterministic batches with awkward values mixed in.
fn batches(count: usize, size: usize) -> Vec<Batch<f64>> {
    (0..count)
        .map(|b| {
            let x = Array3::from_shape_fn((size, 4, 3), |(w, r, c)| {
                let v = ((b * 131 + w * 17 + r * 5 + c) as f64).sin() / 3.0;
                if (w + r + c) % 11 == 0 {
                    -v * 1e-300
                } else {
                    v
                }
            });
            let y = Array1::from_shape_fn(size, |w| ((b * size + w) as f64).cos() * 7.0);
            Batch::new(x, y).unwrap()
        })
        .collect()
}

fn bits(values: impl IntoIterator<Item = f64>) -> Vec<u64> {
    values.into_iter().map(f64::to_bits).collect()
}

// ============================================================================
// Round Trip Tests
// ============================================================================

#[test]
fn test_replay_is_bit_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.etl");
    let written = batches(6, 5);

    let summary = DatasetWriter::create(&path)
        .unwrap()
        .write_all(written.iter().cloned().map(Ok))
        .unwrap();
    assert_eq!(summary.batches, 6);
    assert_eq!(summary.rows, 30);
    assert_eq!(summary.window_shape, (4, 3));

    let reader = DatasetReader::<f64>::open(&path, 5).unwrap();
    assert_eq!(reader.shape(), (30, 4, 3));

    let replayed: Vec<_> = reader
        .batches(0)
        .take(written.len())
        .collect::<Result<_, _>>()
        .unwrap();
    for (original, copy) in written.iter().zip(&replayed) {
        assert_eq!(copy.x.dim(), original.x.dim());
        assert_eq!(bits(copy.x.iter().copied()), bits(original.x.iter().copied()));
        assert_eq!(bits(copy.y.iter().copied()), bits(original.y.iter().copied()));
    }
}

#[test]
fn test_replay_with_different_batch_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rebatch.etl");
    let written = batches(3, 4);
    DatasetWriter::create(&path)
        .unwrap()
        .write_all(written.iter().cloned().map(Ok))
        .unwrap();

    let all_y: Vec<f64> = written.iter().flat_map(|b| b.y.to_vec()).collect();
    let reader = DatasetReader::<f64>::open(&path, 5).unwrap();

    let tail = reader.read_range(10, 100).unwrap();
    assert_eq!(bits(tail.y.iter().copied()), bits(all_y[10..].iter().copied()));

    let replayed: Vec<f64> = reader
        .batches(0)
        .until_exhausted()
        .map(|b| b.unwrap().y.to_vec())
        .collect::<Vec<_>>()
        .concat();
    assert_eq!(bits(replayed), bits(all_y.iter().copied()));
}

#[test]
fn test_f32_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narrow.etl");

    let x = Array3::from_shape_fn((3, 2, 2), |(w, r, c)| (w * 4 + r * 2 + c) as f32 * 0.25);
    let y = Array1::from_vec(vec![0.1f32, 0.2, 0.3]);
    let batch = Batch::new(x, y).unwrap();
    DatasetWriter::create(&path)
        .unwrap()
        .write_all(vec![Ok(batch.clone())])
        .unwrap();

    let reader = DatasetReader::<f32>::open(&path, 3).unwrap();
    let replayed = reader.batches(0).next().unwrap().unwrap();
    assert_eq!(replayed, batch);
    assert!(DatasetReader::<f64>::open(&path, 3).is_err());
}

#[test]
fn test_rewrite_replaces_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rewrite.etl");

    DatasetWriter::create(&path)
        .unwrap()
        .write_all(batches(2, 3).into_iter().map(Ok))
        .unwrap();
    DatasetWriter::create(&path)
        .unwrap()
        .write_all(batches(1, 3).into_iter().map(Ok))
        .unwrap();

    let reader = DatasetReader::<f64>::open(&path, 3).unwrap();
    assert_eq!(reader.len(), 3);
}

#[test]
fn test_arrays_are_plain_npy_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.etl");
    let written = batches(2, 3);
    DatasetWriter::create(&path)
        .unwrap()
        .write_all(written.iter().cloned().map(Ok))
        .unwrap();

    let file = std::fs::File::open(path.join("y.npy")).unwrap();
    let npy = npyz::NpyFile::new(std::io::BufReader::new(file)).unwrap();
    assert_eq!(npy.shape(), &[6]);
    let y: Vec<f64> = npy.into_vec().unwrap();
    let expected: Vec<f64> = written.iter().flat_map(|b| b.y.to_vec()).collect();
    assert_eq!(bits(y), bits(expected));

    let file = std::fs::File::open(path.join("x.npy")).unwrap();
    let npy = npyz::NpyFile::new(std::io::BufReader::new(file)).unwrap();
    assert_eq!(npy.shape(), &[6 * 4 * 3]);
}
