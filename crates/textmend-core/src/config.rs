//! Configuration management with file persistence

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};

use crate::chunker::DEFAULT_CHUNK_SIZE;
use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Textmend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chunk: ChunkConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Chunk budget in bytes
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub temperature: Option<f32>,
    pub num_predict: Option<i32>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig {
                size: DEFAULT_CHUNK_SIZE,
            },
            llm: LlmConfig {
                model: DEFAULT_MODEL.to_string(),
                base_url: DEFAULT_BASE_URL.to_string(),
                temperature: None,
                num_predict: None,
                timeout_secs: 120,
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("TEXTMEND_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("textmend")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or fall back to defaults
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.chunk.size == 0 {
            return Err(anyhow!("Chunk size must be at least 1 byte"));
        }
        if let Some(temp) = self.llm.temperature
            && !(0.0..=2.0).contains(&temp)
        {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "chunk.size" => Ok(self.chunk.size.to_string()),

            "llm.model" => Ok(self.llm.model.clone()),
            "llm.base_url" => Ok(self.llm.base_url.clone()),
            "llm.temperature" => Ok(self
                .llm
                .temperature
                .map(|t| t.to_string())
                .unwrap_or_else(|| "(not set)".to_string())),
            "llm.num_predict" => Ok(self
                .llm
                .num_predict
                .map(|n| n.to_string())
                .unwrap_or_else(|| "(not set)".to_string())),
            "llm.timeout_secs" => Ok(self.llm.timeout_secs.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `textmend config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "chunk.size" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Invalid chunk size: {}", value))?;
                if size == 0 {
                    return Err(anyhow!("Chunk size must be at least 1 byte"));
                }
                self.chunk.size = size;
            }

            "llm.model" => {
                self.llm.model = value.to_string();
            }
            "llm.base_url" => {
                self.llm.base_url = value.trim_end_matches('/').to_string();
            }
            "llm.temperature" => {
                let temp: f32 = value
                    .parse()
                    .with_context(|| format!("Invalid temperature value: {}", value))?;
                if !(0.0..=2.0).contains(&temp) {
                    return Err(anyhow!("Temperature must be between 0.0 and 2.0"));
                }
                self.llm.temperature = Some(temp);
            }
            "llm.num_predict" => {
                let num: i32 = value
                    .parse()
                    .with_context(|| format!("Invalid num_predict value: {}", value))?;
                self.llm.num_predict = Some(num);
            }
            "llm.timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs value: {}", value))?;
                if secs == 0 {
                    return Err(anyhow!("Timeout must be at least 1 second"));
                }
                self.llm.timeout_secs = secs;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `textmend config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "chunk.size",
            "llm.model",
            "llm.base_url",
            "llm.temperature",
            "llm.num_predict",
            "llm.timeout_secs",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}
