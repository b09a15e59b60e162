//! textkb-vector
//!
//! Exact inner-product vector index with file persistence, the parallel
//! line-delimited metadata store, and the corpus builder that writes both
//! (plus `kb_info.json`) as one atomically-replaced knowledge-base
//! directory.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod builder;
pub mod flat;
pub mod kb;
pub mod store;

pub use builder::CorpusBuilder;
pub use flat::FlatIndex;
pub use kb::KnowledgeBase;
