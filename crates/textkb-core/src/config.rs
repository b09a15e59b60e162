use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// Chunker settings. `overlap` must stay below `size`; the loader clamps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub size: usize,
    /// Characters shared between consecutive chunks.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { size: 1200, overlap: 200 }
    }
}

/// Batching policy for embedding calls. The pacing delay is a politeness
/// knob for rate-limited providers, not a correctness requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub batch_size: usize,
    pub pace_ms: u64,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self { batch_size: 96, pace_ms: 50 }
    }
}

/// Remote provider endpoints and model names (OpenAI-compatible API).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            embed_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 6, max_context_chars: 12_000 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeConfig {
    /// How many stored chunks (in storage order) feed the map phase.
    pub max_docs: usize,
    /// Chunks per map call.
    pub map_batch_size: usize,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self { max_docs: 24, map_batch_size: 8 }
    }
}

/// Full configuration, one section per component. Constructed explicitly and
/// passed into component constructors so knowledge bases with different
/// settings can coexist in one process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KbConfig {
    pub chunking: ChunkingConfig,
    pub embed: EmbedConfig,
    pub provider: ProviderConfig,
    pub retrieval: RetrievalConfig,
    pub summarize: SummarizeConfig,
}

impl KbConfig {
    /// Merge defaults, `config.toml`, and `APP_*` environment variables.
    /// Nested keys use a double underscore, e.g. `APP_CHUNKING__SIZE=800`.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_figment(
            Figment::from(Serialized::defaults(Self::default()))
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("APP_").split("__")),
        )
    }

    fn from_figment(figment: Figment) -> anyhow::Result<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunking.size == 0 {
            return Err(Error::Config("chunking.size must be > 0".into()).into());
        }
        if self.chunking.overlap >= self.chunking.size {
            return Err(Error::Config(format!(
                "chunking.overlap ({}) must be smaller than chunking.size ({})",
                self.chunking.overlap, self.chunking.size
            ))
            .into());
        }
        if self.embed.batch_size == 0 {
            return Err(Error::Config("embed.batch_size must be > 0".into()).into());
        }
        if self.retrieval.top_k == 0 {
            return Err(Error::Config("retrieval.top_k must be > 0".into()).into());
        }
        if self.summarize.max_docs == 0 {
            return Err(Error::Config("summarize.max_docs must be > 0".into()).into());
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
