//! textkb-llm
//!
//! External-collaborator clients behind the core `Embedder` and `Generator`
//! traits: an OpenAI-compatible HTTP provider, plus a deterministic fake
//! embedder for tests and offline development (enabled with
//! `APP_USE_FAKE_EMBEDDINGS=1`).

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod client;
pub mod fake;

use textkb_core::config::KbConfig;
use textkb_core::traits::{Embedder, Generator};

pub use client::OpenAiClient;
pub use fake::FakeEmbedder;

const FAKE_DIM: usize = 256;

fn use_fake_embeddings() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The embedder selected by configuration: the HTTP provider, or the fake
/// one when `APP_USE_FAKE_EMBEDDINGS` is set.
pub fn default_embedder(config: &KbConfig) -> anyhow::Result<Box<dyn Embedder>> {
    if use_fake_embeddings() {
        println!("Using fake embeddings (APP_USE_FAKE_EMBEDDINGS)");
        return Ok(Box::new(FakeEmbedder::new(FAKE_DIM)));
    }
    Ok(Box::new(OpenAiClient::from_env(&config.provider)?))
}

pub fn default_generator(config: &KbConfig) -> anyhow::Result<Box<dyn Generator>> {
    Ok(Box::new(OpenAiClient::from_env(&config.provider)?))
}
