use tempfile::TempDir;

use textkb_core::error::Error;
use textkb_core::types::{ChunkMeta, ChunkRecord};
use textkb_vector::store::{read_records, write_records};

fn record(i: usize) -> ChunkRecord {
    ChunkRecord {
        meta: ChunkMeta {
            id: format!("digest-{i}"),
            file: format!("/corpus/doc{i}.txt"),
            title: format!("doc{i}"),
            chunk_index: i,
        },
        text: format!("chunk text number {i}"),
    }
}

#[test]
fn roundtrip_preserves_records_and_order() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("meta.jsonl");
    let records: Vec<ChunkRecord> = (0..5).map(record).collect();

    write_records(&path, &records).expect("write");
    let loaded = read_records(&path).expect("read");
    assert_eq!(loaded, records);
}

#[test]
fn text_with_newlines_stays_one_record_per_line() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("meta.jsonl");
    let mut r = record(0);
    r.text = "line one\nline two\n\nline four".to_string();

    write_records(&path, std::slice::from_ref(&r)).expect("write");
    let raw = std::fs::read_to_string(&path).expect("read file");
    assert_eq!(raw.lines().count(), 1, "newlines must be escaped into one JSON line");
    assert_eq!(read_records(&path).expect("read")[0], r);
}

#[test]
fn malformed_line_is_corruption() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("meta.jsonl");
    write_records(&path, &[record(0)]).expect("write");

    let mut raw = std::fs::read_to_string(&path).expect("read");
    raw.push_str("{not json\n");
    std::fs::write(&path, raw).expect("write back");

    let err = read_records(&path).expect_err("must fail");
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::IndexCorruption(_))
    ));
}
