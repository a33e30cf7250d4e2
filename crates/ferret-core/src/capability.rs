//! The closed set of lookup capabilities the orchestrator may call.
//!
//! Each capability shares one argument schema ([`SearchArgs`]) and is served
//! by a [`SearchBackend`]. Names that are not listed here fail to resolve.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::tool::{PropertySchema, ToolDefinition, ToolParameters};

pub const DEFAULT_MARKET: &str = "en-US";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// General web search.
    FindInformation,
    /// Entity (people, places, things) search.
    FindEntities,
    /// News article search.
    FindNews,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::FindInformation,
        Capability::FindEntities,
        Capability::FindNews,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Capability::FindInformation => "find_information",
            Capability::FindEntities => "find_entities",
            Capability::FindNews => "find_news",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Capability::FindInformation => {
                "Search the web for pages about a topic. Returns page titles, urls and snippets."
            }
            Capability::FindEntities => {
                "Look up well-known people, places, organizations or things related to a topic."
            }
            Capability::FindNews => "Search recent news articles about a topic.",
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new()
                .add_property("query", PropertySchema::string("The search query"), true)
                .add_property(
                    "market",
                    PropertySchema::string("Market/locale code for the search, e.g. en-US")
                        .with_default(Value::from(DEFAULT_MARKET)),
                    false,
                ),
        )
    }

    /// Tool definitions for every capability, in declaration order.
    pub fn definitions() -> Vec<ToolDefinition> {
        Self::ALL.iter().map(|c| c.definition()).collect()
    }

    /// Decode a JSON-encoded argument string into the raw object and the
    /// validated [`SearchArgs`].
    pub fn decode_arguments(&self, raw: &str) -> Result<(Map<String, Value>, SearchArgs), Error> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| Error::invalid_arguments(self.name(), format!("malformed JSON: {}", e)))?;

        let Value::Object(map) = value else {
            return Err(Error::invalid_arguments(
                self.name(),
                "expected a JSON object of named arguments",
            ));
        };

        let args = SearchArgs::deserialize(&Value::Object(map.clone()))
            .map_err(|e| Error::invalid_arguments(self.name(), e.to_string()))?;

        Ok((map, args))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::unknown_capability(s))
    }
}

/// Arguments accepted by every capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    pub query: String,
    #[serde(default = "default_market", deserialize_with = "market_or_default")]
    pub market: String,
}

impl SearchArgs {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            market: default_market(),
        }
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = market.into();
        self
    }
}

fn default_market() -> String {
    DEFAULT_MARKET.to_string()
}

/// Models often send `null` for an optional parameter; treat it as absent.
fn market_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_market))
}

/// Something that can answer the three lookup capabilities.
///
/// Result shapes:
/// - `find_information`: `{"pages": [page, ...]}`
/// - `find_entities`: `[{"name", "description", ...}, ...]`
/// - `find_news`: `[{"url", "name", "description", ...}, ...]`
#[async_trait]
pub trait SearchBackend: Send + Sync {
    fn name(&self) -> &str;

    async fn find_information(&self, args: &SearchArgs) -> Result<Value, Error>;

    async fn find_entities(&self, args: &SearchArgs) -> Result<Value, Error>;

    async fn find_news(&self, args: &SearchArgs) -> Result<Value, Error>;

    async fn search(&self, capability: Capability, args: &SearchArgs) -> Result<Value, Error> {
        match capability {
            Capability::FindInformation => self.find_information(args).await,
            Capability::FindEntities => self.find_entities(args).await,
            Capability::FindNews => self.find_news(args).await,
        }
    }
}
