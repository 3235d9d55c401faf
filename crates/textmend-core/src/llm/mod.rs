//! LLM integration - Ollama generate API
//!
//! This module provides:
//! - The `Generator` trait the pipeline runs against
//! - An Ollama HTTP client for non-streaming generation
//! - Request/response types matching the `/api/generate` endpoint

mod client;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, Generator, OllamaClient, OllamaClientBuilder};
pub use types::{GenerateOptions, GenerateRequest, GenerateResponse, ModelInfo, TagsResponse};
