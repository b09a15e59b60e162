//! Domain types shared by the chunking, indexing and retrieval layers.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// Identity of a chunk within a knowledge base.
///
/// - `id`: content-hash-plus-ordinal identifier, stable across rebuilds of
///   an unchanged source file (see [`crate::ids`])
/// - `file`: path of the source document
/// - `title`: source file name without extension
/// - `chunk_index`: position of the chunk within its document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub id: ChunkId,
    pub file: String,
    pub title: String,
    pub chunk_index: usize,
}

/// One metadata-store record: the chunk identity plus its text payload.
/// Record `i` always describes the vector stored at index row `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub meta: ChunkMeta,
    pub text: String,
}

/// A retrieval result. `score` is the inner product of unit vectors, so it
/// equals cosine similarity and approaches 1.0 for close matches.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub score: f32,
    pub chunk: ChunkRecord,
}

/// Summary record persisted next to the index (`kb_info.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KbInfo {
    pub dim: usize,
    pub count: usize,
    pub built_from: String,
    pub embed_model: String,
    pub built_at: String,
}
