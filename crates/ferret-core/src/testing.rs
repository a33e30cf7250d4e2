//! Test utilities shared across the workspace.
//! Only compiled when running tests or with the `testing` feature.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use crate::capability::{Capability, SearchArgs, SearchBackend};
use crate::error::Error;
use crate::message::{Message, ToolCall, Usage};
use crate::orchestrator::Orchestrator;
use crate::provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};

/// A mock provider that returns pre-configured responses.
pub struct MockProvider {
    responses: Mutex<Vec<CompletionResponse>>,
    /// Captured requests (for assertion).
    pub captured_requests: Mutex<Vec<CompletionRequest>>,
    pub name: String,
    pub default_model: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            captured_requests: Mutex::new(Vec::new()),
            name: "mock".to_string(),
            default_model: None,
        }
    }

    /// Queue a plain text response.
    /// Responses are returned in FIFO order (first queued = first returned).
    pub fn queue_response(&self, content: &str) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant(content),
            usage: Usage::new(0, 0),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::Stop,
        });
    }

    /// Queue a response that requests the given tool calls.
    pub fn queue_tool_calls(&self, tool_calls: Vec<ToolCall>) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant_with_tool_calls("", tool_calls),
            usage: Usage::new(0, 0),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::ToolCalls,
        });
    }

    /// Queue a raw CompletionResponse.
    pub fn queue_raw_response(&self, response: CompletionResponse) {
        self.responses.lock().unwrap().insert(0, response);
    }

    /// Get the number of captured requests.
    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    /// Get the last captured request.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        self.captured_requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| Error::invalid_request("No mock response queued"))
    }
}

/// An orchestrator that always returns the same plan and records what it
/// was asked.
pub struct MockOrchestrator {
    plan: Vec<ToolCall>,
    /// Captured `(instructions, feedback)` pairs.
    pub calls: Mutex<Vec<(String, String)>>,
}

impl MockOrchestrator {
    pub fn new(plan: Vec<ToolCall>) -> Self {
        Self {
            plan,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_feedback(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(_, f)| f.clone())
    }
}

#[async_trait]
impl Orchestrator for MockOrchestrator {
    async fn orchestrate(&self, instructions: &str, feedback: &str) -> Result<Vec<ToolCall>, Error> {
        self.calls
            .lock()
            .unwrap()
            .push((instructions.to_string(), feedback.to_string()));
        Ok(self.plan.clone())
    }
}

/// A search backend with fixed per-capability results that records every
/// invocation.
pub struct MockSearch {
    pub web: Value,
    pub entities: Value,
    pub news: Value,
    /// Captured invocations, in order.
    pub invocations: Mutex<Vec<(Capability, SearchArgs)>>,
    /// When set, this capability fails instead of answering.
    pub fail_on: Option<Capability>,
}

impl MockSearch {
    pub fn new(web: Value, entities: Value, news: Value) -> Self {
        Self {
            web,
            entities,
            news,
            invocations: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    pub fn failing_on(mut self, capability: Capability) -> Self {
        self.fail_on = Some(capability);
        self
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }

    fn answer(&self, capability: Capability, args: &SearchArgs, value: &Value) -> Result<Value, Error> {
        self.invocations
            .lock()
            .unwrap()
            .push((capability, args.clone()));
        if self.fail_on == Some(capability) {
            return Err(Error::capability(capability.name(), "mock failure"));
        }
        Ok(value.clone())
    }
}

#[async_trait]
impl SearchBackend for MockSearch {
    fn name(&self) -> &str {
        "mock"
    }

    async fn find_information(&self, args: &SearchArgs) -> Result<Value, Error> {
        self.answer(Capability::FindInformation, args, &self.web)
    }

    async fn find_entities(&self, args: &SearchArgs) -> Result<Value, Error> {
        self.answer(Capability::FindEntities, args, &self.entities)
    }

    async fn find_news(&self, args: &SearchArgs) -> Result<Value, Error> {
        self.answer(Capability::FindNews, args, &self.news)
    }
}
