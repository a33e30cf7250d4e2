//! Research records produced by dispatching tool calls, and their
//! normalization into a uniform summary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::capability::Capability;
use crate::error::Error;

/// Placeholder url for entity results; the entity provider has none.
pub const NO_URL: &str = "None Available";

/// One executed tool call and its provider-specific result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    pub id: String,
    pub function: Capability,
    pub arguments: Map<String, Value>,
    pub result: Value,
}

/// A normalized `{url, name, description}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub url: String,
    pub name: String,
    pub description: String,
}

/// Uniform summary of a research run. Web pages are passed through as the
/// provider returned them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessedResearch {
    pub web: Vec<Value>,
    pub entities: Vec<SummaryItem>,
    pub news: Vec<SummaryItem>,
}

impl ProcessedResearch {
    pub fn is_empty(&self) -> bool {
        self.web.is_empty() && self.entities.is_empty() && self.news.is_empty()
    }
}

#[derive(Deserialize)]
struct WebResult {
    pages: Vec<Value>,
}

#[derive(Deserialize)]
struct Entity {
    name: String,
    description: String,
}

#[derive(Deserialize)]
struct Article {
    url: String,
    name: String,
    description: String,
}

/// Partition records by capability and reshape each group.
///
/// Output order follows record order, then item order within each record.
pub fn process(records: &[ResearchRecord]) -> Result<ProcessedResearch, Error> {
    let mut processed = ProcessedResearch::default();

    for record in records.iter().filter(|r| r.function == Capability::FindInformation) {
        let web: WebResult = decode_result(record)?;
        processed.web.extend(web.pages);
    }

    for record in records.iter().filter(|r| r.function == Capability::FindEntities) {
        let entities: Vec<Entity> = decode_result(record)?;
        processed
            .entities
            .extend(entities.into_iter().map(|e| SummaryItem {
                url: NO_URL.to_string(),
                name: e.name,
                description: e.description,
            }));
    }

    for record in records.iter().filter(|r| r.function == Capability::FindNews) {
        let articles: Vec<Article> = decode_result(record)?;
        processed.news.extend(articles.into_iter().map(|a| SummaryItem {
            url: a.url,
            name: a.name,
            description: a.description,
        }));
    }

    tracing::debug!(
        web = processed.web.len(),
        entities = processed.entities.len(),
        news = processed.news.len(),
        "Processed research records"
    );

    Ok(processed)
}

fn decode_result<'a, T: Deserialize<'a>>(record: &'a ResearchRecord) -> Result<T, Error> {
    T::deserialize(&record.result)
        .map_err(|e| Error::shape(&record.id, record.function.name(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str, function: Capability, result: Value) -> ResearchRecord {
        ResearchRecord {
            id: id.to_string(),
            function,
            arguments: Map::new(),
            result,
        }
    }

    #[test]
    fn test_process_empty() {
        let processed = process(&[]).unwrap();
        assert!(processed.is_empty());
        assert_eq!(
            serde_json::to_value(&processed).unwrap(),
            json!({"web": [], "entities": [], "news": []})
        );
    }

    #[test]
    fn test_process_entities_get_placeholder_url() {
        let records = vec![record(
            "call_1",
            Capability::FindEntities,
            json!([
                {"name": "Yosemite", "description": "A national park", "type": "Place"},
                {"name": "REI", "description": "An outdoor retailer"}
            ]),
        )];

        let processed = process(&records).unwrap();
        assert!(processed.web.is_empty());
        assert!(processed.news.is_empty());
        assert_eq!(
            processed.entities,
            vec![
                SummaryItem {
                    url: "None Available".to_string(),
                    name: "Yosemite".to_string(),
                    description: "A national park".to_string(),
                },
                SummaryItem {
                    url: "None Available".to_string(),
                    name: "REI".to_string(),
                    description: "An outdoor retailer".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_process_web_pages_unchanged_and_news_reshaped() {
        let page_a = json!({"url": "https://a.example", "name": "A", "description": "first", "extra": 1});
        let page_b = json!({"url": "https://b.example", "name": "B", "description": "second"});
        let records = vec![
            record(
                "call_1",
                Capability::FindInformation,
                json!({"pages": [page_a.clone(), page_b.clone()], "related": ["x"]}),
            ),
            record(
                "call_2",
                Capability::FindNews,
                json!([{
                    "url": "https://news.example/c",
                    "name": "C",
                    "description": "third",
                    "provider": "Example News",
                    "datePublished": "2024-01-01"
                }]),
            ),
        ];

        let processed = process(&records).unwrap();
        assert_eq!(processed.web, vec![page_a, page_b]);
        assert!(processed.entities.is_empty());
        assert_eq!(
            processed.news,
            vec![SummaryItem {
                url: "https://news.example/c".to_string(),
                name: "C".to_string(),
                description: "third".to_string(),
            }]
        );
    }

    #[test]
    fn test_process_preserves_record_then_item_order() {
        let records = vec![
            record("1", Capability::FindNews, json!([
                {"url": "u1", "name": "n1", "description": "d1"},
                {"url": "u2", "name": "n2", "description": "d2"}
            ])),
            record("2", Capability::FindInformation, json!({"pages": [{"name": "p1"}]})),
            record("3", Capability::FindNews, json!([
                {"url": "u3", "name": "n3", "description": "d3"}
            ])),
            record("4", Capability::FindInformation, json!({"pages": [{"name": "p2"}, {"name": "p3"}]})),
        ];

        let processed = process(&records).unwrap();
        let news: Vec<_> = processed.news.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(news, vec!["n1", "n2", "n3"]);
        let web: Vec<_> = processed.web.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(web, vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_process_is_idempotent() {
        let records = vec![
            record("1", Capability::FindEntities, json!([{"name": "n", "description": "d"}])),
            record("2", Capability::FindInformation, json!({"pages": [{"url": "u"}]})),
        ];

        let first = process(&records).unwrap();
        let second = process(&records).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_process_missing_pages_is_shape_error() {
        let records = vec![record("call_9", Capability::FindInformation, json!({"results": []}))];

        let err = process(&records).unwrap_err();
        match err {
            Error::Shape { id, capability, .. } => {
                assert_eq!(id, "call_9");
                assert_eq!(capability, "find_information");
            }
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[test]
    fn test_process_news_missing_url_is_shape_error() {
        let records = vec![record(
            "call_3",
            Capability::FindNews,
            json!([{"name": "n", "description": "d"}]),
        )];
        assert!(matches!(process(&records), Err(Error::Shape { .. })));
    }

    #[test]
    fn test_record_serializes_function_name() {
        let rec = record("call_1", Capability::FindNews, json!([]));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["function"], "find_news");
        assert_eq!(json["id"], "call_1");
    }
}
