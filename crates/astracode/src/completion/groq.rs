use std::time::Duration;

use async_trait::async_trait;

use super::CompletionBackend;
use crate::prelude::*;
use astracode_core::codegen::completion::{
    build_chat_request, describe_error_body, first_choice_text, ChatCompletionResponse,
};
use astracode_core::codegen::SamplingParams;

/// Client for Groq's OpenAI-compatible chat completions endpoint.
pub struct GroqBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GroqBackend {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_seconds: Option<u64>,
    ) -> Result<Self, Error> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("astracode/", env!("CARGO_PKG_VERSION")));
        if let Some(seconds) = timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| Error::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a backend from the global options. A missing or blank API key is
    /// a configuration error.
    pub fn from_global(global: &crate::Global) -> Result<Self, Error> {
        let api_key = global
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(Error::missing_api_key)?;

        Self::new(api_key, global.base_url.clone(), global.timeout)
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionBackend for GroqBackend {
    async fn complete(
        &self,
        prompt: &str,
        model: &str,
        params: &SamplingParams,
    ) -> Result<String, Error> {
        let body = build_chat_request(prompt, model, params);
        let url = self.endpoint();

        log::debug!("POST {url} (model={model}, prompt={} chars)", prompt.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Generation(format!("Request to {model} failed: {e}")))?;

        let status = response.status();
        log::debug!("{model} HTTP status: {status}");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!(
                "{model} returned HTTP {status}: {}",
                describe_error_body(&text)
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Generation(format!("Failed to parse response from {model}: {e}")))?;

        first_choice_text(parsed).map_err(Error::Generation)
    }
}
