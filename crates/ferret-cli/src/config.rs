use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ferret_tools::BingConfig;

/// Environment variables understood for compatibility with existing
/// deployments; they override everything else.
const LEGACY_SEARCH_VARS: &[&str] = &["BING_SEARCH_ENDPOINT", "BING_SEARCH_KEY"];

const REDACTED: &str = "(configured)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local fixture files
    #[default]
    Fixture,
    /// Live Bing Search APIs
    Bing,
}

/// Search backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub backend: BackendKind,

    /// Directory holding articles.json, entities.json and news.json
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    /// Bing base URL (e.g., "https://api.bing.microsoft.com/")
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bing subscription key
    #[serde(default)]
    pub key: Option<String>,

    /// Per-request timeout for live searches
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            fixtures_dir: default_fixtures_dir(),
            endpoint: None,
            key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SearchConfig {
    pub fn bing_config(&self) -> Result<BingConfig> {
        let endpoint = self.endpoint.as_deref().filter(|s| !s.is_empty()).context(
            "Bing search endpoint is not configured. Set BING_SEARCH_ENDPOINT or [search] endpoint",
        )?;
        let key = self.key.as_deref().filter(|s| !s.is_empty()).context(
            "Bing search key is not configured. Set BING_SEARCH_KEY or [search] key",
        )?;

        Ok(BingConfig::new(endpoint, key).with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}

/// OpenAI-compatible model used to choose tool calls
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Config {
    /// Load configuration, lowest precedence first: built-in defaults, the
    /// TOML file, `FERRET_*` variables (`__` separates sections), then the
    /// legacy `BING_SEARCH_*` variables.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("Configuration file not found: {}", p.display());
                }
                Some(p.to_path_buf())
            }
            None => Self::config_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(file) = &file {
            figment = figment.merge(Toml::file(file));
        }
        figment = figment
            .merge(Env::prefixed("FERRET_").split("__"))
            .merge(Env::raw().only(LEGACY_SEARCH_VARS).map(|key| {
                key.as_str()
                    .to_ascii_lowercase()
                    .replacen("bing_search_", "search.", 1)
                    .into()
            }));

        figment.extract().context("Invalid configuration")
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ferret").join("config.toml"))
    }

    /// Copy with secrets replaced, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.search.key.is_some() {
            config.search.key = Some(REDACTED.to_string());
        }
        if config.orchestrator.api_key.is_some() {
            config.orchestrator.api_key = Some(REDACTED.to_string());
        }
        config
    }
}
