//! Line-delimited metadata store.
//!
//! One JSON record per line, `{"meta": {...}, "text": "..."}`, in index row
//! order. There is no update or delete; a rebuild rewrites the whole file.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use textkb_core::error::Error;
use textkb_core::types::ChunkRecord;

pub fn write_records(path: &Path, records: &[ChunkRecord]) -> anyhow::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    for record in records {
        serde_json::to_writer(&mut w, record)?;
        w.write_all(b"\n")?;
    }
    w.flush()?;
    Ok(())
}

pub fn read_records(path: &Path) -> anyhow::Result<Vec<ChunkRecord>> {
    let r = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (lineno, line) in r.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ChunkRecord = serde_json::from_str(&line).map_err(|e| {
            Error::IndexCorruption(format!(
                "{}: bad metadata record on line {}: {e}",
                path.display(),
                lineno + 1
            ))
        })?;
        records.push(record);
    }
    Ok(records)
}
