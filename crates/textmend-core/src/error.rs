//! Error types for textmend

use thiserror::Error;

/// Result type alias using textmend's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Textmend error types with helpful messages
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid chunk size {0}: the budget must be at least 1 byte")]
    InvalidChunkSize(usize),

    #[error("Network error: {0}. Check that Ollama is running (`ollama serve`).")]
    Network(#[from] reqwest::Error),

    #[error("Generation failed: Ollama returned HTTP {status}: {body}")]
    Generation { status: u16, body: String },

    #[error("Invalid response from Ollama: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
