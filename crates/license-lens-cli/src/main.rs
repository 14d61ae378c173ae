use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use license_lens_core::{
    client_from_settings, render_report, ModelSettings, OutputFormat, Pipeline,
};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "license-lens",
    author,
    version,
    about = "License agreement risk analyzer"
)]
struct Cli {
    /// Optional TOML config file; environment variables take precedence
    #[arg(long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Model provider override (`gemini` or `canned`)
    #[arg(long = "provider", value_name = "NAME", global = true)]
    provider: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a license agreement PDF and print the risk report
    Analyze {
        /// Path to the PDF file (omit when using --text-stdin)
        file: Option<PathBuf>,

        /// Emit the report as JSON instead of human-readable text
        #[arg(long)]
        json: bool,

        /// Read pre-extracted document text from stdin instead of a PDF
        #[arg(long = "text-stdin")]
        text_stdin: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze {
            file,
            json,
            text_stdin,
        } => {
            analyze(
                cli.config.as_deref(),
                cli.provider.as_deref(),
                file.as_deref(),
                json,
                text_stdin,
            )
            .await?
        }
    }
    Ok(())
}

async fn analyze(
    config: Option<&Path>,
    provider: Option<&str>,
    file: Option<&Path>,
    json: bool,
    text_stdin: bool,
) -> Result<()> {
    let settings = load_settings(config, provider)?;
    let client = client_from_settings(&settings)?;
    let pipeline = Pipeline::new(client);

    let outcome = if text_stdin {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read document text from stdin")?;
        pipeline.analyze_text(&text).await
    } else {
        let path = match file {
            Some(path) => path,
            None => bail!("a PDF file path is required unless --text-stdin is given"),
        };
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read PDF file at {}", path.display()))?;
        pipeline
            .analyze_pdf(&bytes)
            .await
            .with_context(|| format!("failed to extract text from {}", path.display()))?
    };

    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    print!("{}", render_report(&outcome, format)?);
    Ok(())
}

/// File-level configuration mirror of the `LICENSE_LENS_*` environment
/// variables. Environment values win over file values.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    llm: LlmSection,
}

#[derive(Debug, Default, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

fn load_settings(config: Option<&Path>, provider_override: Option<&str>) -> Result<ModelSettings> {
    if config.is_none() && provider_override.is_none() {
        return ModelSettings::from_env();
    }

    let file = match config {
        Some(path) => {
            let parsed: FileConfig = config::Config::builder()
                .add_source(config::File::from(path))
                .build()
                .with_context(|| format!("failed to read config file at {}", path.display()))?
                .try_deserialize()
                .with_context(|| format!("invalid config file at {}", path.display()))?;
            parsed
        }
        None => FileConfig::default(),
    };

    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    let provider = provider_override
        .map(str::to_string)
        .or_else(|| env(ModelSettings::PROVIDER_ENV))
        .or(file.llm.provider)
        .unwrap_or_else(|| "gemini".to_string());
    let api_key = env(ModelSettings::API_KEY_ENV)
        .or(file.llm.api_key)
        .unwrap_or_default();
    if provider.to_lowercase() != "canned" && api_key.trim().is_empty() {
        bail!(
            "an API key is required: set {} or `llm.api_key` in a config file",
            ModelSettings::API_KEY_ENV
        );
    }

    Ok(ModelSettings {
        provider,
        api_key,
        endpoint: env(ModelSettings::ENDPOINT_ENV).or(file.llm.endpoint),
        model: env(ModelSettings::MODEL_ENV).or(file.llm.model),
        timeout_secs: std::env::var(ModelSettings::TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .or(file.llm.timeout_secs),
    })
}

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tokio=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
