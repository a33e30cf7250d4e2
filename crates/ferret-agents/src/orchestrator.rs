//! Orchestrators that turn research instructions into capability calls.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use ferret_core::{
    Capability, CompletionRequest, Error, Message, Orchestrator, Provider, ToolCall,
};

const SYSTEM_PROMPT: &str = r#"You are a researcher who helps writers gather material for an article.

## Your Tools
- `find_information`: general web search. Use it for background, how-tos and trends.
- `find_entities`: look up specific people, places, organizations or products.
- `find_news`: recent news articles. Use it for anything time-sensitive.

## How You Work
1. Read the instructions and decide what the writer actually needs.
2. Call every tool that would help, as many times as useful, each with a focused query.
3. Pass `market` only when the instructions call for a specific region or language.
4. If feedback on a previous attempt is given, use it to change your queries.

Respond only with tool calls."#;

/// Asks a chat model which capabilities to call, advertising all three as
/// tools and returning the tool calls it chose, in order.
pub struct PromptOrchestrator {
    provider: Arc<dyn Provider>,
    model: Option<String>,
    temperature: Option<f32>,
}

impl PromptOrchestrator {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            model: None,
            temperature: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn build_request(&self, instructions: &str, feedback: &str) -> CompletionRequest {
        let user = format!(
            "# Research instructions\n{}\n\n# Feedback on previous research\n{}",
            instructions.trim(),
            feedback.trim()
        );

        let mut request = CompletionRequest::new(vec![
            Message::system(SYSTEM_PROMPT),
            Message::user(user),
        ])
        .with_tools(Capability::definitions());

        if let Some(model) = &self.model {
            request = request.with_model(model);
        }
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }
}

#[async_trait]
impl Orchestrator for PromptOrchestrator {
    async fn orchestrate(&self, instructions: &str, feedback: &str) -> Result<Vec<ToolCall>, Error> {
        let request = self.build_request(instructions, feedback);
        let response = self.provider.complete(request).await?;

        debug!(
            provider = self.provider.name(),
            model = %response.model,
            tool_calls = response.message.tool_calls.len(),
            finish_reason = ?response.finish_reason,
            "Orchestrator response"
        );

        Ok(response.message.tool_calls)
    }
}

/// Replays a fixed plan of tool calls loaded from JSON, ignoring the
/// instructions. Used for offline, repeatable runs.
///
/// The plan is an array of `{"id", "name", "arguments"}` objects; `arguments`
/// may be a JSON-encoded string or an inline object. A missing `id` becomes
/// `call_<index>`.
#[derive(Debug, Clone)]
pub struct ReplayOrchestrator {
    calls: Vec<ToolCall>,
}

#[derive(Deserialize)]
struct PlannedCall {
    #[serde(default)]
    id: Option<String>,
    name: String,
    #[serde(default = "empty_arguments")]
    arguments: Value,
}

fn empty_arguments() -> Value {
    Value::Object(Default::default())
}

impl ReplayOrchestrator {
    pub fn new(calls: Vec<ToolCall>) -> Self {
        Self { calls }
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let planned: Vec<PlannedCall> = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Invalid tool call plan: {}", e)))?;

        let calls = planned
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let arguments = match p.arguments {
                    Value::String(raw) => raw,
                    other => other.to_string(),
                };
                ToolCall::new(p.id.unwrap_or_else(|| format!("call_{}", i)), p.name, arguments)
            })
            .collect();

        Ok(Self::new(calls))
    }

    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read plan '{}': {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn calls(&self) -> &[ToolCall] {
        &self.calls
    }
}

#[async_trait]
impl Orchestrator for ReplayOrchestrator {
    async fn orchestrate(&self, _instructions: &str, _feedback: &str) -> Result<Vec<ToolCall>, Error> {
        Ok(self.calls.clone())
    }
}
