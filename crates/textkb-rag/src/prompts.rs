//! Prompt text for the generation collaborator. Kept in one place so the
//! retrieval and summarization code stays free of string assembly noise.

use textkb_core::types::ChunkRecord;

pub const ANSWER_SYSTEM: &str = "You are a careful knowledge assistant. Answer \
using only the provided source excerpts. If the excerpts are insufficient, say \
so explicitly instead of guessing. Keep answers concise and well structured.";

pub const MAP_SYSTEM: &str = "You condense source material into bullet points.";

pub const REDUCE_SYSTEM: &str = "You write clear, structured reports.";

pub fn answer_user(query: &str, context: &str) -> String {
    format!(
        "Question: {query}\n\nSource excerpts (numbered):\n{context}\n\n\
         Answer based on the excerpts above. When you state a specific fact, \
         append the number of the excerpt it came from, like [1]."
    )
}

pub fn map_user(batch: &[ChunkRecord]) -> String {
    let joined = batch
        .iter()
        .map(|r| r.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");
    format!(
        "Condense the following excerpts into a bullet list. Preserve key \
         facts, figures, dates, and conclusions:\n\n{joined}"
    )
}

pub fn reduce_user(goal: &str, partials: &[String]) -> String {
    let joined = partials.join("\n\n====\n\n");
    format!(
        "Goal: {goal}\n\nBelow are partial summaries of a larger corpus. \
         Combine them into one structured report with an overview, key \
         points, and risks/conclusions/follow-ups:\n\n{joined}"
    )
}
