//! Nearest-neighbor retrieval and greedy context packing.

use std::path::Path;

use tracing::debug;

use textkb_core::embedding::embed_query;
use textkb_core::traits::{Embedder, Generator};
use textkb_core::types::SearchHit;
use textkb_vector::KnowledgeBase;

use crate::prompts;

/// Embed `query` and return the `k` most similar chunks, best first.
pub fn search(
    kb: &KnowledgeBase,
    embedder: &dyn Embedder,
    query: &str,
    k: usize,
) -> anyhow::Result<Vec<SearchHit>> {
    let query_vec = embed_query(embedder, query)?;
    let rows = kb.index.search(&query_vec, k)?;
    debug!(hits = rows.len(), k, "vector search");
    Ok(rows
        .into_iter()
        .map(|(row, score)| SearchHit { score, chunk: kb.records[row].clone() })
        .collect())
}

/// Greedily pack hit texts into a context block under `max_chars`.
///
/// Hits are taken in the given (descending-score) order; packing stops at
/// the first chunk that would overflow the budget, and chunks are never
/// truncated to squeeze into the remainder. Each included chunk is rendered
/// under a sequential `[n]` citation marker.
pub fn pack_context(hits: &[SearchHit], max_chars: usize) -> (String, Vec<SearchHit>) {
    let mut picked: Vec<SearchHit> = Vec::new();
    let mut total = 0usize;
    for hit in hits {
        let len = hit.chunk.text.chars().count();
        if total + len > max_chars {
            break;
        }
        total += len;
        picked.push(hit.clone());
    }

    let blocks: Vec<String> = picked
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let source = Path::new(&hit.chunk.meta.file)
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| hit.chunk.meta.file.clone());
            format!(
                "[{}] Source: {} (chunk #{})\n{}",
                i + 1,
                source,
                hit.chunk.meta.chunk_index,
                tidy(&hit.chunk.text)
            )
        })
        .collect();

    (blocks.join("\n\n"), picked)
}

fn tidy(s: &str) -> String {
    s.trim().replace("\r\n", "\n")
}

/// A generated answer plus the hits that were actually packed into its
/// context, in citation order.
pub struct Answer {
    pub text: String,
    pub cited: Vec<SearchHit>,
}

/// Full `ask` pipeline: retrieve, pack, and generate a cited answer.
pub fn answer(
    kb: &KnowledgeBase,
    embedder: &dyn Embedder,
    generator: &dyn Generator,
    query: &str,
    top_k: usize,
    max_context_chars: usize,
) -> anyhow::Result<Answer> {
    let hits = search(kb, embedder, query, top_k)?;
    let (context, cited) = pack_context(&hits, max_context_chars);
    let text = generator.generate(prompts::ANSWER_SYSTEM, &prompts::answer_user(query, &context))?;
    Ok(Answer { text, cited })
}
