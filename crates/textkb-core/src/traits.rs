//! Seams to the external collaborators. Providers are swappable behind these
//! traits; the core owns batching and vector normalization so that any
//! implementation keeps the cosine-via-inner-product contract.

/// Turns a batch of texts into embedding vectors, one per input, in input
/// order. Implementations return raw provider output; normalization happens
/// in [`crate::embedding::embed_all`].
pub trait Embedder: Send + Sync {
    /// Model identifier recorded in `kb_info.json`.
    fn model(&self) -> &str;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// One blocking chat round-trip with a text-generation provider.
pub trait Generator: Send + Sync {
    fn generate(&self, system: &str, user: &str) -> anyhow::Result<String>;
}
