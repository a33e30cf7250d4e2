use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ferret_agents::{PromptOrchestrator, ReplayOrchestrator, Researcher};
use ferret_core::{Orchestrator, SearchBackend, DEFAULT_FEEDBACK};
use ferret_providers::OpenAIProvider;
use ferret_tools::{BingSearch, FixtureSearch};

mod config;

use config::{BackendKind, Config};

const DEFAULT_INSTRUCTIONS: &str =
    "Can you find the latest camping trends and what folks are doing in the winter?";

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose: all tracing including request bodies
    Trace,
    /// Verbose: orchestrator responses, each completed tool call
    Debug,
    /// Standard: high-level flow
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "ferret")]
#[command(author, version, about = "Ferret: gather web, entity and news research for a writing task", long_about = None)]
pub struct Cli {
    /// Research instructions
    #[arg(default_value = DEFAULT_INSTRUCTIONS)]
    pub instructions: String,

    /// Feedback on a previous research attempt
    #[arg(short, long, default_value = DEFAULT_FEEDBACK)]
    pub feedback: String,

    /// Configuration file (defaults to ~/.config/ferret/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Replay tool calls from a JSON plan instead of asking the model
    #[arg(long)]
    pub plan: Option<PathBuf>,

    /// Answer searches from fixture files in this directory
    #[arg(long, conflicts_with = "live")]
    pub fixtures: Option<PathBuf>,

    /// Use the live Bing search backend
    #[arg(long)]
    pub live: bool,

    /// Print the raw research records instead of the normalized summary
    #[arg(long)]
    pub raw: bool,

    /// Print the resolved configuration (secrets redacted) and exit
    #[arg(long)]
    pub print_config: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format) instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let config = Config::load(cli.config.as_deref())?;

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config.redacted())?);
        return Ok(());
    }

    let backend = build_backend(&cli, &config)?;
    let orchestrator = build_orchestrator(&cli, &config)?;
    let researcher = Researcher::new(orchestrator, backend);

    let output = if cli.raw {
        let records = researcher
            .execute(&cli.instructions, &cli.feedback)
            .await
            .context("Research failed")?;
        serde_json::to_string_pretty(&records)?
    } else {
        let processed = researcher
            .research(&cli.instructions, &cli.feedback)
            .await
            .context("Research failed")?;
        serde_json::to_string_pretty(&processed)?
    };

    println!("{}", output);
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    // Resolve log level: --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };
    let filter = EnvFilter::new(log_level.as_filter());

    // stdout carries the JSON result, so logs never go there
    if let Some(log_path) = &cli.log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    Ok(())
}

/// Pick the search backend: --live and --fixtures override the configured one.
fn build_backend(cli: &Cli, config: &Config) -> Result<Arc<dyn SearchBackend>> {
    let kind = if cli.live {
        BackendKind::Bing
    } else if cli.fixtures.is_some() {
        BackendKind::Fixture
    } else {
        config.search.backend
    };

    match kind {
        BackendKind::Fixture => {
            let dir = cli
                .fixtures
                .clone()
                .unwrap_or_else(|| config.search.fixtures_dir.clone());
            tracing::info!(dir = %dir.display(), "Using fixture search backend");
            Ok(Arc::new(FixtureSearch::new(dir)))
        }
        BackendKind::Bing => {
            let bing = config.search.bing_config()?;
            tracing::info!(endpoint = %bing.endpoint, "Using Bing search backend");
            Ok(Arc::new(BingSearch::new(bing)))
        }
    }
}

fn build_orchestrator(cli: &Cli, config: &Config) -> Result<Arc<dyn Orchestrator>> {
    if let Some(plan) = &cli.plan {
        let replay = ReplayOrchestrator::from_file(plan)?;
        tracing::info!(path = %plan.display(), tool_calls = replay.calls().len(), "Replaying tool call plan");
        return Ok(Arc::new(replay));
    }

    let settings = &config.orchestrator;
    let api_key = settings.api_key.as_deref().context(
        "No orchestrator API key configured. Set [orchestrator] api_key or \
         FERRET_ORCHESTRATOR__API_KEY, or pass --plan to replay a fixed plan",
    )?;

    let mut provider = OpenAIProvider::new(api_key);
    if let Some(url) = &settings.base_url {
        provider = provider.with_base_url(url);
    }
    if let Some(model) = &settings.model {
        provider = provider.with_default_model(model);
    }

    let mut orchestrator = PromptOrchestrator::new(Arc::new(provider));
    if let Some(temperature) = settings.temperature {
        orchestrator = orchestrator.with_temperature(temperature);
    }
    Ok(Arc::new(orchestrator))
}
