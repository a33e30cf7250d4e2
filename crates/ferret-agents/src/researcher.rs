//! Researcher agent: dispatches the orchestrator's tool calls to a search
//! backend and normalizes the results.

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};

use ferret_core::{
    process, Capability, Error, Orchestrator, ProcessedResearch, ResearchRecord, SearchBackend,
};

pub struct Researcher {
    orchestrator: Arc<dyn Orchestrator>,
    backend: Arc<dyn SearchBackend>,
}

impl Researcher {
    pub fn new(orchestrator: Arc<dyn Orchestrator>, backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            orchestrator,
            backend,
        }
    }

    /// Ask the orchestrator for tool calls and run each one, in order.
    ///
    /// The first failing call aborts the rest; no partial results are
    /// returned.
    pub async fn execute(
        &self,
        instructions: &str,
        feedback: &str,
    ) -> Result<Vec<ResearchRecord>, Error> {
        let calls = self.orchestrator.orchestrate(instructions, feedback).await?;
        info!(
            tool_calls = calls.len(),
            backend = self.backend.name(),
            "Dispatching research tool calls"
        );

        let mut records = Vec::with_capacity(calls.len());
        for call in calls {
            let capability: Capability = call.name.parse()?;
            let (arguments, args) = capability.decode_arguments(&call.arguments)?;

            let span = info_span!(
                "capability",
                id = %call.id,
                function = %capability,
                query = %args.query,
                market = %args.market
            );
            let result = self
                .backend
                .search(capability, &args)
                .instrument(span)
                .await?;
            debug!(id = %call.id, function = %capability, "Tool call completed");

            records.push(ResearchRecord {
                id: call.id,
                function: capability,
                arguments,
                result,
            });
        }

        Ok(records)
    }

    pub fn process(&self, records: &[ResearchRecord]) -> Result<ProcessedResearch, Error> {
        process(records)
    }

    pub async fn research(
        &self,
        instructions: &str,
        feedback: &str,
    ) -> Result<ProcessedResearch, Error> {
        let records = self.execute(instructions, feedback).await?;
        self.process(&records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferret_core::testing::{MockOrchestrator, MockSearch};
    use ferret_core::{SearchArgs, ToolCall, DEFAULT_FEEDBACK};
    use ferret_tools::FixtureSearch;
    use serde_json::{json, Value};

    fn mock_search() -> MockSearch {
        MockSearch::new(
            json!({"pages": [{"url": "https://a.example", "name": "A", "description": "a"}]}),
            json!([{"name": "Yosemite", "description": "A park"}]),
            json!([{"url": "https://n.example", "name": "N", "description": "n", "provider": "P"}]),
        )
    }

    fn researcher(plan: Vec<ToolCall>, search: Arc<MockSearch>) -> (Researcher, Arc<MockOrchestrator>) {
        let orchestrator = Arc::new(MockOrchestrator::new(plan));
        (Researcher::new(orchestrator.clone(), search), orchestrator)
    }

    #[tokio::test]
    async fn test_execute_one_record_per_call_in_order() {
        let search = Arc::new(mock_search());
        let plan = vec![
            ToolCall::new("call_1", "find_news", r#"{"query": "camping"}"#),
            ToolCall::new("call_2", "find_information", r#"{"query": "tents", "market": "en-GB"}"#),
            ToolCall::new("call_3", "find_entities", r#"{"query": "Yosemite"}"#),
        ];
        let (researcher, _) = researcher(plan.clone(), search.clone());

        let records = researcher.execute("Find camping trends", DEFAULT_FEEDBACK).await.unwrap();

        assert_eq!(records.len(), plan.len());
        for (record, call) in records.iter().zip(&plan) {
            assert_eq!(record.id, call.id);
            assert_eq!(record.function.name(), call.name);
            let decoded: Value = serde_json::from_str(&call.arguments).unwrap();
            assert_eq!(Value::Object(record.arguments.clone()), decoded);
        }
        assert_eq!(records[0].result, search.news);

        let invocations = search.invocations.lock().unwrap().clone();
        assert_eq!(
            invocations,
            vec![
                (Capability::FindNews, SearchArgs::new("camping")),
                (Capability::FindInformation, SearchArgs::new("tents").with_market("en-GB")),
                (Capability::FindEntities, SearchArgs::new("Yosemite")),
            ]
        );
    }

    #[tokio::test]
    async fn test_execute_unknown_capability_aborts() {
        let search = Arc::new(mock_search());
        let plan = vec![
            ToolCall::new("call_1", "find_images", r#"{"query": "tents"}"#),
            ToolCall::new("call_2", "find_news", r#"{"query": "tents"}"#),
        ];
        let (researcher, _) = researcher(plan, search.clone());

        let err = researcher.execute("x", DEFAULT_FEEDBACK).await.unwrap_err();
        assert!(matches!(err, Error::UnknownCapability(name) if name == "find_images"));
        assert_eq!(search.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_execute_malformed_arguments_aborts_remaining_calls() {
        let search = Arc::new(mock_search());
        let plan = vec![
            ToolCall::new("call_1", "find_news", r#"{"query": "tents"}"#),
            ToolCall::new("call_2", "find_entities", "{not json"),
            ToolCall::new("call_3", "find_information", r#"{"query": "tents"}"#),
        ];
        let (researcher, _) = researcher(plan, search.clone());

        let err = researcher.execute("x", DEFAULT_FEEDBACK).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArguments { capability, .. } if capability == "find_entities"));
        assert_eq!(search.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_propagates_capability_error() {
        let search = Arc::new(mock_search().failing_on(Capability::FindInformation));
        let plan = vec![
            ToolCall::new("call_1", "find_information", r#"{"query": "tents"}"#),
            ToolCall::new("call_2", "find_news", r#"{"query": "tents"}"#),
        ];
        let (researcher, _) = researcher(plan, search.clone());

        let err = researcher.execute("x", DEFAULT_FEEDBACK).await.unwrap_err();
        assert!(matches!(err, Error::Capability { .. }));
        assert_eq!(search.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_execute_empty_plan() {
        let (researcher, _) = researcher(Vec::new(), Arc::new(mock_search()));
        let records = researcher.execute("x", DEFAULT_FEEDBACK).await.unwrap();
        assert!(records.is_empty());
        assert!(researcher.process(&records).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_research_forwards_feedback() {
        let (researcher, orchestrator) = researcher(Vec::new(), Arc::new(mock_search()));

        researcher
            .research("Find camping trends", "Too few news sources")
            .await
            .unwrap();
        assert_eq!(
            orchestrator.last_feedback(),
            Some("Too few news sources".to_string())
        );
    }

    #[tokio::test]
    async fn test_research_normalizes_results() {
        let plan = vec![
            ToolCall::new("call_1", "find_entities", r#"{"query": "Yosemite"}"#),
            ToolCall::new("call_2", "find_news", r#"{"query": "camping"}"#),
            ToolCall::new("call_3", "find_information", r#"{"query": "camping"}"#),
        ];
        let (researcher, _) = researcher(plan, Arc::new(mock_search()));

        let processed = researcher.research("x", DEFAULT_FEEDBACK).await.unwrap();
        assert_eq!(
            serde_json::to_value(&processed).unwrap(),
            json!({
                "web": [{"url": "https://a.example", "name": "A", "description": "a"}],
                "entities": [{"url": "None Available", "name": "Yosemite", "description": "A park"}],
                "news": [{"url": "https://n.example", "name": "N", "description": "n"}]
            })
        );
    }

    #[tokio::test]
    async fn test_research_with_bundled_fixtures_is_deterministic() {
        let data = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data");
        let plan = vec![
            ToolCall::new("call_1", "find_information", r#"{"query": "camping trends"}"#),
            ToolCall::new("call_2", "find_entities", r#"{"query": "camping"}"#),
            ToolCall::new("call_3", "find_news", r#"{"query": "winter camping"}"#),
        ];
        let researcher = Researcher::new(
            Arc::new(MockOrchestrator::new(plan)),
            Arc::new(FixtureSearch::new(data)),
        );

        let first = researcher.research("find camping trends", DEFAULT_FEEDBACK).await.unwrap();
        let second = researcher.research("find camping trends", DEFAULT_FEEDBACK).await.unwrap();

        assert_eq!(first, second);
        assert!(!first.web.is_empty());
        assert!(!first.news.is_empty());
        assert!(first.entities.iter().all(|e| e.url == "None Available"));
    }
}
