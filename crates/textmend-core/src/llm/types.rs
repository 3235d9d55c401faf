//! Request/response types for the Ollama API.

use serde::{Deserialize, Serialize};

/// Sampling options forwarded to Ollama verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateOptions {
    /// Sampling temperature (0.0 to 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

impl GenerateOptions {
    /// True when no option is set, so the field can be omitted entirely.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.num_predict.is_none()
    }
}

/// Request body for `/api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g., "qwen2.5:0.5b")
    pub model: String,
    /// Full prompt, instruction prefix included
    pub prompt: String,
    /// Always false; the pipeline consumes whole responses
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<GenerateOptions>,
}

impl GenerateRequest {
    /// Create a new non-streaming generate request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            options: None,
        }
    }

    /// Attach sampling options, omitting them when empty.
    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        if !options.is_empty() {
            self.options = Some(options);
        }
        self
    }
}

/// Response body of a non-streaming `/api/generate` call. Ollama returns
/// more fields (timings, context); only the text matters here.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
}

/// One model entry from `/api/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub name: String,
}

/// Response body of `/api/tags`, used for health checks.
#[derive(Debug, Clone, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
}
