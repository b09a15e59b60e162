//! A knowledge base is one directory holding three files written together by
//! a single build: the vector index, the metadata JSONL, and the info
//! record. Opening validates the positional-alignment invariant before any
//! query is served.

use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

use textkb_core::error::Error;
use textkb_core::types::{ChunkRecord, KbInfo};

use crate::flat::FlatIndex;
use crate::store;

pub const INDEX_FILE: &str = "index.bin";
pub const META_FILE: &str = "meta.jsonl";
pub const INFO_FILE: &str = "kb_info.json";

#[derive(Debug)]
pub struct KnowledgeBase {
    pub index: FlatIndex,
    pub records: Vec<ChunkRecord>,
    pub info: KbInfo,
}

impl KnowledgeBase {
    /// Load and validate a knowledge base. Any mismatch between the index,
    /// the metadata store, and the info record refuses to serve.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let index_path = dir.join(INDEX_FILE);
        let meta_path = dir.join(META_FILE);
        let info_path = dir.join(INFO_FILE);
        for path in [&index_path, &meta_path, &info_path] {
            if !path.is_file() {
                return Err(Error::Input(format!(
                    "no knowledge base at {} (missing {})",
                    dir.display(),
                    path.display()
                ))
                .into());
            }
        }

        let index = FlatIndex::load(&index_path)?;
        let records = store::read_records(&meta_path)?;
        let info: KbInfo = serde_json::from_reader(File::open(&info_path)?).map_err(|e| {
            Error::IndexCorruption(format!("{}: bad info record: {e}", info_path.display()))
        })?;

        if index.len() != records.len() {
            return Err(Error::IndexCorruption(format!(
                "{}: index holds {} vectors but metadata holds {} records",
                dir.display(),
                index.len(),
                records.len()
            ))
            .into());
        }
        if index.len() != info.count || index.dim() != info.dim {
            return Err(Error::IndexCorruption(format!(
                "{}: info record ({} x dim {}) disagrees with index ({} x dim {})",
                dir.display(),
                info.count,
                info.dim,
                index.len(),
                index.dim()
            ))
            .into());
        }

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.meta.id.as_str()) {
                return Err(Error::IndexCorruption(format!(
                    "{}: duplicate chunk id {}",
                    dir.display(),
                    record.meta.id
                ))
                .into());
            }
        }

        Ok(Self { index, records, info })
    }
}
