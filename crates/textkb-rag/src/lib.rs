//! textkb-rag
//!
//! Query-time layers over a knowledge base: nearest-neighbor retrieval with
//! greedy context packing and citation markers, grounded answer generation,
//! and the map-reduce corpus summarizer.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod prompts;
pub mod retriever;
pub mod summarize;

pub use retriever::{answer, pack_context, search, Answer};
pub use summarize::summarize;
