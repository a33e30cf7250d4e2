//! Live search backend for the Bing Search v7 APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use ferret_core::{Capability, Error, SearchArgs, SearchBackend};

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const RESULT_COUNT: &str = "5";

/// Connection settings for the Bing Search APIs.
#[derive(Clone, Debug)]
pub struct BingConfig {
    /// Base URL, e.g. "https://api.bing.microsoft.com/"
    pub endpoint: String,
    /// Subscription key sent with every request
    pub key: String,
    pub timeout: Duration,
}

impl BingConfig {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct BingSearch {
    client: Client,
    config: BingConfig,
}

impl BingSearch {
    pub fn new(config: BingConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("ferret/0.1.0")
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    fn path(capability: Capability) -> &'static str {
        match capability {
            Capability::FindInformation => "v7.0/search",
            Capability::FindEntities => "v7.0/entities",
            Capability::FindNews => "v7.0/news/search",
        }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        capability: Capability,
        args: &SearchArgs,
    ) -> Result<T, Error> {
        let url = make_endpoint(&self.config.endpoint, Self::path(capability));
        let mut params = vec![("q", args.query.as_str()), ("mkt", args.market.as_str())];
        if capability != Capability::FindEntities {
            params.push(("count", RESULT_COUNT));
        }
        debug!(url = %url, query = %args.query, market = %args.market, "Bing request");

        let response = self
            .client
            .get(&url)
            .header(KEY_HEADER, &self.config.key)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::capability(capability.name(), format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::capability(
                capability.name(),
                format!("Search API error {}: {}", status, body),
            ));
        }

        response.json().await.map_err(|e| {
            Error::capability(
                capability.name(),
                format!("Failed to parse search response: {}", e),
            )
        })
    }
}

#[async_trait]
impl SearchBackend for BingSearch {
    fn name(&self) -> &str {
        "bing"
    }

    async fn find_information(&self, args: &SearchArgs) -> Result<Value, Error> {
        let body: WebSearchResponse = self.request(Capability::FindInformation, args).await?;
        Ok(shape_web(body))
    }

    async fn find_entities(&self, args: &SearchArgs) -> Result<Value, Error> {
        let body: EntitySearchResponse = self.request(Capability::FindEntities, args).await?;
        Ok(shape_entities(body))
    }

    async fn find_news(&self, args: &SearchArgs) -> Result<Value, Error> {
        let body: NewsSearchResponse = self.request(Capability::FindNews, args).await?;
        Ok(shape_news(body))
    }
}

/// Join a base URL and a path with exactly one `/`.
fn make_endpoint(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn shape_web(body: WebSearchResponse) -> Value {
    let pages: Vec<Value> = body
        .web_pages
        .map(|w| w.value)
        .unwrap_or_default()
        .into_iter()
        .map(|p| json!({"url": p.url, "name": p.name, "description": p.snippet}))
        .collect();
    let related: Vec<String> = body
        .related_searches
        .map(|r| r.value.into_iter().map(|s| s.text).collect())
        .unwrap_or_default();

    json!({"pages": pages, "related": related})
}

fn shape_entities(body: EntitySearchResponse) -> Value {
    let entities: Vec<Value> = body
        .entities
        .map(|e| e.value)
        .unwrap_or_default()
        .into_iter()
        .map(|e| json!({"name": e.name, "description": e.description}))
        .collect();

    Value::Array(entities)
}

fn shape_news(body: NewsSearchResponse) -> Value {
    let articles: Vec<Value> = body
        .value
        .into_iter()
        .map(|a| {
            json!({
                "name": a.name,
                "url": a.url,
                "description": a.description,
                "provider": a.provider.into_iter().next().map(|p| p.name),
                "datePublished": a.date_published,
            })
        })
        .collect();

    Value::Array(articles)
}

#[derive(Deserialize)]
struct Listing<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebSearchResponse {
    web_pages: Option<Listing<WebPage>>,
    related_searches: Option<Listing<RelatedSearch>>,
}

#[derive(Deserialize)]
struct WebPage {
    name: String,
    url: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Deserialize)]
struct RelatedSearch {
    text: String,
}

#[derive(Deserialize)]
struct EntitySearchResponse {
    entities: Option<Listing<Entity>>,
}

#[derive(Deserialize)]
struct Entity {
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct NewsSearchResponse {
    #[serde(default)]
    value: Vec<NewsArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsArticle {
    name: String,
    url: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    provider: Vec<NewsProvider>,
    date_published: Option<String>,
}

#[derive(Deserialize)]
struct NewsProvider {
    name: String,
}
