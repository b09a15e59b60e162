//! Map-reduce corpus summarization.
//!
//! Map: the first `max_docs` stored chunks, in storage order, are condensed
//! batch by batch into bullet-point partial summaries. Reduce: one final
//! call combines the partials into a structured report for the caller's
//! goal. The phases run strictly in order and a failing map call aborts the
//! whole run, naming the batch that failed.

use anyhow::Context;
use tracing::debug;

use textkb_core::config::SummarizeConfig;
use textkb_core::error::Error;
use textkb_core::traits::Generator;
use textkb_vector::KnowledgeBase;

use crate::prompts;

pub fn summarize(
    kb: &KnowledgeBase,
    generator: &dyn Generator,
    config: &SummarizeConfig,
    goal: &str,
) -> anyhow::Result<String> {
    let take = config.max_docs.min(kb.records.len());
    let chunks = &kb.records[..take];
    if chunks.is_empty() {
        return Err(Error::Input("knowledge base holds no chunks to summarize".into()).into());
    }

    let batch_size = config.map_batch_size.max(1);
    let batch_count = chunks.chunks(batch_size).count();

    let mut partials = Vec::with_capacity(batch_count);
    for (i, batch) in chunks.chunks(batch_size).enumerate() {
        debug!(batch = i + 1, batch_count, chunks = batch.len(), "map phase");
        let partial = generator
            .generate(prompts::MAP_SYSTEM, &prompts::map_user(batch))
            .with_context(|| format!("map batch {}/{} failed", i + 1, batch_count))?;
        partials.push(partial.trim().to_string());
    }

    debug!(partials = partials.len(), "reduce phase");
    let report = generator.generate(prompts::REDUCE_SYSTEM, &prompts::reduce_user(goal, &partials))?;
    Ok(report.trim().to_string())
}
