//! Textmend CLI - chunked LLM text cleanup

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::ProgressBar;
use textmend_core::chunker;
use textmend_core::config::Config;
use textmend_core::llm::OllamaClient;
use textmend_core::pipeline::Pipeline;
use textmend_core::progress::{NullProgress, ProgressSink};
use tracing::warn;

#[derive(Parser)]
#[command(name = "textmend")]
#[command(author, version, about = "Chunked LLM text cleanup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (no progress bar, minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a file into chunks and print them
    Chunk {
        /// Input file
        input: PathBuf,
        /// Chunk size budget in bytes
        #[arg(long)]
        size: Option<usize>,
    },

    /// Run a file through the generation pipeline chunk by chunk
    Prompt {
        /// Prompt prefix file
        prompt: PathBuf,
        /// Input file
        input: PathBuf,
        /// Chunk size budget in bytes
        #[arg(long)]
        size: Option<usize>,
        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,
        /// Ollama base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check that Ollama is reachable and the model is available
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

/// indicatif-backed progress sink; draws on stderr.
struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new() -> Self {
        Self {
            bar: ProgressBar::new(0),
        }
    }
}

impl ProgressSink for BarProgress {
    fn begin(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn tick(&self) {
        self.bar.inc(1);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so they never mix with the
    // cleaned text on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("textmend_core=info".parse()?)
                .add_directive("textmend_cli=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Chunk { input, size } => cmd_chunk(&input, size),

        Commands::Prompt {
            prompt,
            input,
            size,
            model,
            base_url,
        } => {
            cmd_prompt(
                &prompt,
                &input,
                size,
                model.as_deref(),
                base_url.as_deref(),
                cli.quiet,
            )
            .await
        }

        Commands::Config { action } => cmd_config(action, cli.quiet),

        Commands::Doctor => cmd_doctor(cli.quiet).await,
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

// ============================================================================
// Command Implementations
// ============================================================================

fn cmd_chunk(input: &Path, size: Option<usize>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let size = size.unwrap_or(config.chunk.size);

    let text = read_input(input)?;
    let chunks = chunker::chunk(&text, size)?;

    for chunk in chunks {
        print!("{chunk}\n\n");
    }
    Ok(())
}

async fn cmd_prompt(
    prompt: &Path,
    input: &Path,
    size: Option<usize>,
    model: Option<&str>,
    base_url: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(model) = model {
        config.llm.model = model.to_string();
    }
    if let Some(base_url) = base_url {
        config.llm.base_url = base_url.trim_end_matches('/').to_string();
    }
    let size = size.unwrap_or(config.chunk.size);

    let instruction = read_input(prompt)?;
    let text = read_input(input)?;

    let client = OllamaClient::new(&config.llm)?;
    let pipeline = Pipeline::new(client, size);

    let result = if quiet {
        pipeline.run(&text, &instruction, &NullProgress).await?
    } else {
        let progress = BarProgress::new();
        let result = pipeline.run(&text, &instruction, &progress).await;
        progress.bar.finish_and_clear();
        result?
    };

    println!("{result}");
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Textmend Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    // Check configuration
    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            Config::default()
        }
    };

    // Check config file location
    if !quiet {
        match Config::config_path() {
            Ok(path) => {
                if path.exists() {
                    println!("[OK] Config file: {}", path.display());
                } else {
                    println!("[--] Config file: {} (using defaults)", path.display());
                }
            }
            Err(e) => {
                println!("[!!] Config file: Error - {}", e);
            }
        }
    }

    // Check Ollama connectivity and model availability
    let client = OllamaClient::new(&config.llm)?;
    match client.health_check().await {
        Ok(models) => {
            if !quiet {
                println!("[OK] Ollama: Reachable at {}", config.llm.base_url);
            }
            if models.iter().any(|m| m == &config.llm.model) {
                if !quiet {
                    println!("[OK] Model: '{}' is available", config.llm.model);
                }
            } else {
                all_ok = false;
                if !quiet {
                    println!("[!!] Model: '{}' not found", config.llm.model);
                    println!("     Pull it with `ollama pull {}`", config.llm.model);
                }
            }
        }
        Err(e) => {
            all_ok = false;
            warn!("Ollama health check failed: {}", e);
            if !quiet {
                println!("[!!] Ollama: Unreachable - {}", e);
                println!("     Start it with `ollama serve`");
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed.");
        } else {
            println!("Some checks failed.");
        }
    }

    if all_ok {
        Ok(())
    } else {
        Err(anyhow::anyhow!("One or more health checks failed"))
    }
}
