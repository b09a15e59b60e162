//! Blocking OpenAI-compatible client for the two collaborator calls the
//! engine needs: `/embeddings` and `/chat/completions`. Every failure is
//! surfaced as `Error::Collaborator` and aborts the current operation.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use textkb_core::config::ProviderConfig;
use textkb_core::error::Error;
use textkb_core::traits::{Embedder, Generator};

pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: String,
    embed_model: String,
    chat_model: String,
}

impl OpenAiClient {
    /// Build a client taking the API key from `OPENAI_API_KEY`. A missing
    /// key is a configuration error raised before any work begins.
    pub fn from_env(config: &ProviderConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Config("OPENAI_API_KEY is not set".into()))?;
        Self::new(config, api_key)
    }

    pub fn new(config: &ProviderConfig, api_key: String) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            embed_model: config.embed_model.clone(),
            chat_model: config.chat_model.clone(),
        })
    }

    fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> anyhow::Result<T> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "provider request");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .map_err(|e| Error::Collaborator(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let mut detail = response.text().unwrap_or_default();
            detail.truncate(500);
            return Err(Error::Collaborator(format!("{url} returned {status}: {detail}")).into());
        }
        Ok(response
            .json::<T>()
            .map_err(|e| Error::Collaborator(format!("bad response from {url}: {e}")))?)
    }
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedder for OpenAiClient {
    fn model(&self) -> &str {
        &self.embed_model
    }

    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let request = EmbeddingsRequest { model: &self.embed_model, input: texts };
        let mut response: EmbeddingsResponse = self.post("embeddings", &request)?;

        if response.data.len() != texts.len() {
            return Err(Error::Collaborator(format!(
                "provider returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            ))
            .into());
        }
        // Pair responses to inputs by the explicit index tag, not arrival
        // order.
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl Generator for OpenAiClient {
    fn generate(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: 0.2,
        };
        let response: ChatResponse = self.post("chat/completions", &request)?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::Collaborator("provider returned no choices".into()))?;
        Ok(choice.message.content.trim().to_string())
    }
}
