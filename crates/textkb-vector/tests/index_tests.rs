use tempfile::TempDir;

use textkb_core::error::Error;
use textkb_vector::FlatIndex;

fn unit(v: &[f32]) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    v.iter().map(|x| x / norm).collect()
}

fn sample_index() -> FlatIndex {
    let mut index = FlatIndex::new(2).expect("index");
    index
        .add(&[
            unit(&[1.0, 0.0]),
            unit(&[0.0, 1.0]),
            unit(&[1.0, 1.0]),
        ])
        .expect("add");
    index
}

#[test]
fn search_orders_by_descending_inner_product() {
    let index = sample_index();
    let hits = index.search(&unit(&[1.0, 0.0]), 2).expect("search");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].0, 0);
    assert!((hits[0].1 - 1.0).abs() < 1e-5);
    assert_eq!(hits[1].0, 2);
    assert!(hits[0].1 >= hits[1].1);
}

#[test]
fn ties_go_to_the_earlier_row() {
    let mut index = FlatIndex::new(2).expect("index");
    let v = unit(&[3.0, 4.0]);
    index
        .add(&[v.clone(), unit(&[0.0, 1.0]), v.clone()])
        .expect("add");
    let hits = index.search(&v, 2).expect("search");
    assert_eq!(hits[0].0, 0, "earlier duplicate wins");
    assert_eq!(hits[1].0, 2);
}

#[test]
fn returns_at_most_len_hits_without_error() {
    let index = sample_index();
    let hits = index.search(&unit(&[1.0, 2.0]), 10).expect("search");
    assert_eq!(hits.len(), 3);
}

#[test]
fn dimension_mismatch_is_rejected() {
    let mut index = FlatIndex::new(2).expect("index");
    assert!(index.add(&[vec![1.0, 2.0, 3.0]]).is_err());
    assert!(index.search(&[1.0, 2.0, 3.0], 1).is_err());
}

#[test]
fn save_load_roundtrip_preserves_search_results() {
    let index = sample_index();
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("index.bin");
    index.save(&path).expect("save");

    let reloaded = FlatIndex::load(&path).expect("load");
    assert_eq!(reloaded.len(), index.len());
    assert_eq!(reloaded.dim(), index.dim());

    let query = unit(&[0.3, 0.7]);
    for k in 1..=3 {
        let before = index.search(&query, k).expect("search");
        let after = reloaded.search(&query, k).expect("search");
        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.0, a.0);
            assert!((b.1 - a.1).abs() < 1e-5);
        }
    }
}

#[test]
fn truncated_index_file_is_corruption() {
    let index = sample_index();
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("index.bin");
    index.save(&path).expect("save");

    let bytes = std::fs::read(&path).expect("read");
    std::fs::write(&path, &bytes[..bytes.len() - 3]).expect("truncate");

    let err = FlatIndex::load(&path).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::IndexCorruption(_))
    ));
}

#[test]
fn header_declaring_more_vectors_than_stored_is_corruption() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("index.bin");

    // Valid magic and version, dim 1, but a count far beyond the file's
    // actual payload. Loading must fail cleanly instead of allocating.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"TKBF");
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&u64::MAX.to_le_bytes());
    std::fs::write(&path, &bytes).expect("write");

    let err = FlatIndex::load(&path).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::IndexCorruption(_))
    ));
}

#[test]
fn trailing_bytes_after_vector_data_are_corruption() {
    let index = sample_index();
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("index.bin");
    index.save(&path).expect("save");

    let mut bytes = std::fs::read(&path).expect("read");
    bytes.extend_from_slice(&[0u8; 4]);
    std::fs::write(&path, &bytes).expect("write back");

    let err = FlatIndex::load(&path).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::IndexCorruption(_))
    ));
}

#[test]
fn wrong_magic_is_corruption() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("index.bin");
    std::fs::write(&path, b"NOPE-not-an-index").expect("write");

    let err = FlatIndex::load(&path).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::IndexCorruption(_))
    ));
}
