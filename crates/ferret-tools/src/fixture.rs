//! Offline search backend that answers every capability from local JSON files.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use ferret_core::{Capability, Error, SearchArgs, SearchBackend};

/// Serves fixed fixture files regardless of query or market:
/// `articles.json` for web search, `entities.json` and `news.json`.
#[derive(Clone, Debug)]
pub struct FixtureSearch {
    dir: PathBuf,
}

impl FixtureSearch {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn file_name(capability: Capability) -> &'static str {
        match capability {
            Capability::FindInformation => "articles.json",
            Capability::FindEntities => "entities.json",
            Capability::FindNews => "news.json",
        }
    }

    async fn load(&self, capability: Capability) -> Result<Value, Error> {
        let path = self.dir.join(Self::file_name(capability));
        debug!(path = %path.display(), capability = %capability, "Reading fixture");

        let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
            Error::capability(
                capability.name(),
                format!("Failed to read fixture '{}': {}", path.display(), e),
            )
        })?;

        serde_json::from_str(&content).map_err(|e| {
            Error::capability(
                capability.name(),
                format!("Invalid JSON in fixture '{}': {}", path.display(), e),
            )
        })
    }
}

#[async_trait]
impl SearchBackend for FixtureSearch {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn find_information(&self, _args: &SearchArgs) -> Result<Value, Error> {
        self.load(Capability::FindInformation).await
    }

    async fn find_entities(&self, _args: &SearchArgs) -> Result<Value, Error> {
        self.load(Capability::FindEntities).await
    }

    async fn find_news(&self, _args: &SearchArgs) -> Result<Value, Error> {
        self.load(Capability::FindNews).await
    }
}
