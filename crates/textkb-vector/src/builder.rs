//! Corpus builder: directory of .txt files in, knowledge base out.
//!
//! The build is all-or-nothing. Everything is staged into a temporary
//! sibling directory and only renamed over the target once the index,
//! metadata, and info files are all written, so a failed build leaves any
//! previous knowledge base untouched.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use textkb_core::chunker;
use textkb_core::config::{ChunkingConfig, EmbedConfig, KbConfig};
use textkb_core::embedding::embed_all;
use textkb_core::error::Error;
use textkb_core::ids;
use textkb_core::traits::Embedder;
use textkb_core::types::{ChunkMeta, ChunkRecord, KbInfo};

use crate::flat::FlatIndex;
use crate::kb::{INDEX_FILE, INFO_FILE, META_FILE};
use crate::store;

pub struct CorpusBuilder {
    chunking: ChunkingConfig,
    embed: EmbedConfig,
    embedder: Box<dyn Embedder>,
}

impl CorpusBuilder {
    pub fn new(config: &KbConfig, embedder: Box<dyn Embedder>) -> Self {
        Self {
            chunking: config.chunking.clone(),
            embed: config.embed.clone(),
            embedder,
        }
    }

    /// Build (or fully rebuild) the knowledge base at `kb_dir` from every
    /// `.txt` file under `src_dir`.
    pub fn build(&self, src_dir: &Path, kb_dir: &Path) -> anyhow::Result<KbInfo> {
        let files = list_txt_files(src_dir);
        if files.is_empty() {
            return Err(Error::NoInputFiles(src_dir.to_path_buf()).into());
        }

        let records = self.collect_chunks(&files)?;
        if records.is_empty() {
            return Err(Error::NoInputFiles(src_dir.to_path_buf()).into());
        }

        let texts: Vec<String> = records.iter().map(|r| r.text.clone()).collect();
        println!("Embedding {} chunks from {} files...", texts.len(), files.len());
        let embeddings = embed_all(self.embedder.as_ref(), &texts, &self.embed)?;
        let dim = embeddings[0].len();

        let mut index = FlatIndex::new(dim)?;
        index.add(&embeddings)?;

        let info = KbInfo {
            dim,
            count: records.len(),
            built_from: src_dir
                .canonicalize()
                .unwrap_or_else(|_| src_dir.to_path_buf())
                .to_string_lossy()
                .to_string(),
            embed_model: self.embedder.model().to_string(),
            built_at: Utc::now().to_rfc3339(),
        };

        write_kb(kb_dir, &index, &records, &info)?;
        Ok(info)
    }

    /// Scan, read, and chunk every file. Files that cannot be read are
    /// skipped with a warning; one bad file must not block the rest.
    fn collect_chunks(&self, files: &[PathBuf]) -> anyhow::Result<Vec<ChunkRecord>> {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut records = Vec::new();
        for file in files {
            pb.inc(1);
            let bytes = match fs::read(file) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let digest = ids::content_digest(&bytes);
            let raw = String::from_utf8_lossy(&bytes);

            let title = file
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            // The title doubles as a heading so it lands inside the chunks.
            let content = format!("# {title}\n\n{raw}");

            for (ordinal, text) in chunker::chunk(&content, &self.chunking).into_iter().enumerate() {
                records.push(ChunkRecord {
                    meta: ChunkMeta {
                        id: ids::chunk_id(&digest, ordinal),
                        file: file.to_string_lossy().to_string(),
                        title: title.clone(),
                        chunk_index: ordinal,
                    },
                    text,
                });
            }
        }
        pb.finish_and_clear();
        Ok(records)
    }
}

/// Stage the three knowledge-base files in a temp dir next to `kb_dir`,
/// then swap it into place. A previous knowledge base survives any failure
/// before the final rename.
fn write_kb(
    kb_dir: &Path,
    index: &FlatIndex,
    records: &[ChunkRecord],
    info: &KbInfo,
) -> anyhow::Result<()> {
    let parent = match kb_dir.parent() {
        Some(p) if p != Path::new("") => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let staging = tempfile::Builder::new()
        .prefix(".textkb-build-")
        .tempdir_in(&parent)?;
    index.save(&staging.path().join(INDEX_FILE))?;
    store::write_records(&staging.path().join(META_FILE), records)?;
    let info_file = fs::File::create(staging.path().join(INFO_FILE))?;
    serde_json::to_writer_pretty(info_file, info)?;

    let staged = staging.keep();
    if kb_dir.exists() {
        fs::remove_dir_all(kb_dir)?;
    }
    fs::rename(&staged, kb_dir)?;
    Ok(())
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("txt"))
        .map(|e| e.path().to_path_buf())
        .collect();
    // Lexicographic order keeps builds reproducible.
    txt_files.sort();
    txt_files
}
