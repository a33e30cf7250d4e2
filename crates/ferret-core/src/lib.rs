//! ferret-core: Core types and traits for ferret
//!
//! This crate provides the types shared by the researcher agent: tool calls,
//! the capability set and its argument schema, the search backend and
//! orchestrator seams, and normalization of research records.

pub mod capability;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod provider;
pub mod research;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use capability::{Capability, SearchArgs, SearchBackend, DEFAULT_MARKET};
pub use error::Error;
pub use message::{Message, Role, ToolCall, Usage};
pub use orchestrator::{Orchestrator, DEFAULT_FEEDBACK};
pub use provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
pub use research::{process, ProcessedResearch, ResearchRecord, SummaryItem, NO_URL};
pub use tool::{PropertySchema, ToolDefinition, ToolParameters};

pub type Result<T> = std::result::Result<T, Error>;
