//! Core-owned batching and normalization around an [`Embedder`].
//!
//! Providers return raw vectors; the core slices requests to the configured
//! batch size, verifies shape, and L2-normalizes every vector so that inner
//! product equals cosine similarity regardless of which provider produced
//! the embedding.

use std::time::Duration;

use tracing::debug;

use crate::config::EmbedConfig;
use crate::error::Error;
use crate::traits::Embedder;

/// Scale a vector to unit L2 norm. The epsilon keeps all-zero vectors finite.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt() + 1e-12;
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Embed all `texts`, batching to at most `cfg.batch_size` per provider call
/// and sleeping `cfg.pace_ms` between batches. Any provider failure aborts
/// the whole operation; no partial result is returned.
pub fn embed_all(
    embedder: &dyn Embedder,
    texts: &[String],
    cfg: &EmbedConfig,
) -> anyhow::Result<Vec<Vec<f32>>> {
    let batch_size = cfg.batch_size.max(1);
    let mut out: Vec<Vec<f32>> = Vec::with_capacity(texts.len());

    let batches = texts.chunks(batch_size).count();
    for (i, batch) in texts.chunks(batch_size).enumerate() {
        debug!(batch = i + 1, batches, size = batch.len(), "embedding batch");
        let vectors = embedder.embed_batch(batch)?;
        if vectors.len() != batch.len() {
            return Err(Error::Collaborator(format!(
                "embedding provider returned {} vectors for {} inputs",
                vectors.len(),
                batch.len()
            ))
            .into());
        }
        out.extend(vectors);
        if cfg.pace_ms > 0 && i + 1 < batches {
            std::thread::sleep(Duration::from_millis(cfg.pace_ms));
        }
    }

    if let Some(first) = out.first() {
        let dim = first.len();
        if dim == 0 {
            return Err(Error::Collaborator("embedding provider returned empty vectors".into()).into());
        }
        if let Some(bad) = out.iter().find(|v| v.len() != dim) {
            return Err(Error::Collaborator(format!(
                "embedding provider returned mixed dimensions ({} and {})",
                dim,
                bad.len()
            ))
            .into());
        }
    }

    for v in &mut out {
        normalize(v);
    }
    Ok(out)
}

/// Embed a single query string and normalize it.
pub fn embed_query(embedder: &dyn Embedder, query: &str) -> anyhow::Result<Vec<f32>> {
    let mut vectors = embedder.embed_batch(std::slice::from_ref(&query.to_string()))?;
    if vectors.len() != 1 {
        return Err(Error::Collaborator(format!(
            "embedding provider returned {} vectors for one query",
            vectors.len()
        ))
        .into());
    }
    let mut v = vectors.remove(0);
    if v.is_empty() {
        return Err(Error::Collaborator("embedding provider returned an empty vector".into()).into());
    }
    normalize(&mut v);
    Ok(v)
}
