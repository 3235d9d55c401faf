//! Ollama HTTP client
//!
//! A thin, stateless client for Ollama's generate endpoint. Each call is
//! fully independent: one prompt in, one response out, no message
//! history. Model identity and sampling parameters are fixed when the
//! client is built, not per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::{debug, info};

use crate::config::LlmConfig;
use crate::error::{Error, Result};

use super::types::{GenerateOptions, GenerateRequest, GenerateResponse, TagsResponse};

/// Default Ollama endpoint
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model, small enough to run anywhere
pub const DEFAULT_MODEL: &str = "qwen2.5:0.5b";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// The generation capability the pipeline runs against.
///
/// Implementations are expected to be stateless from the caller's point
/// of view: no call depends on a prior one.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for a single prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Identifier of the model answering the prompts.
    fn model_name(&self) -> &str;
}

/// Ollama-backed [`Generator`].
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http_client: HttpClient,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

/// Builder for creating an [`OllamaClient`]
pub struct OllamaClientBuilder {
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    options: GenerateOptions,
}

impl Default for OllamaClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaClientBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            base_url: None,
            model: None,
            timeout_secs: None,
            options: GenerateOptions::default(),
        }
    }

    /// Set the Ollama base URL (defaults to the local daemon)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the request timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    /// Cap the number of tokens generated per call
    pub fn num_predict(mut self, num_predict: i32) -> Self {
        self.options.num_predict = Some(num_predict);
        self
    }

    /// Take every setting from an [`LlmConfig`]
    pub fn config(mut self, config: &LlmConfig) -> Self {
        self.base_url = Some(config.base_url.clone());
        self.model = Some(config.model.clone());
        self.timeout_secs = Some(config.timeout_secs);
        self.options = GenerateOptions {
            temperature: config.temperature,
            num_predict: config.num_predict,
        };
        self
    }

    /// Build the client
    pub fn build(self) -> Result<OllamaClient> {
        let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(Error::Network)?;

        Ok(OllamaClient {
            http_client,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            options: self.options,
        })
    }
}

impl OllamaClient {
    /// Create a client from configuration
    pub fn new(config: &LlmConfig) -> Result<Self> {
        OllamaClientBuilder::new().config(config).build()
    }

    /// Create a new builder for OllamaClient
    pub fn builder() -> OllamaClientBuilder {
        OllamaClientBuilder::new()
    }

    /// The endpoint this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Probe the daemon and return the locally available model names.
    pub async fn health_check(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation {
                status: status.as_u16(),
                body,
            });
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

#[async_trait]
impl Generator for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request =
            GenerateRequest::new(&self.model, prompt).with_options(self.options.clone());

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending generate request"
        );

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(Error::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation {
                status: status.as_u16(),
                body,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        info!(
            model = %self.model,
            response_len = body.response.len(),
            "Generation complete"
        );

        Ok(body.response)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = OllamaClient::builder().build().unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.model_name(), DEFAULT_MODEL);
        assert!(client.options.is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let client = OllamaClient::builder()
            .base_url("http://ollama.local:11434")
            .model("phi3:mini")
            .timeout_secs(10)
            .temperature(0.1)
            .num_predict(512)
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "http://ollama.local:11434");
        assert_eq!(client.model_name(), "phi3:mini");
        assert_eq!(client.options.temperature, Some(0.1));
        assert_eq!(client.options.num_predict, Some(512));
    }

    #[test]
    fn test_client_from_config() {
        let config = LlmConfig {
            model: "phi3:mini".to_string(),
            base_url: "http://127.0.0.1:9999".to_string(),
            temperature: Some(0.5),
            num_predict: None,
            timeout_secs: 30,
        };
        let client = OllamaClient::new(&config).unwrap();
        assert_eq!(client.model_name(), "phi3:mini");
        assert_eq!(client.base_url(), "http://127.0.0.1:9999");
        assert_eq!(client.options.temperature, Some(0.5));
    }

    #[test]
    fn test_client_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<OllamaClient>();
    }
}
