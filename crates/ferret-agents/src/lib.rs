//! Researcher agent and orchestrators for ferret.
//!
//! This crate provides:
//! - `Researcher`: runs the orchestrator's tool calls against a search
//!   backend and normalizes the results
//! - `PromptOrchestrator`: lets a chat model choose the tool calls
//! - `ReplayOrchestrator`: replays a fixed plan from JSON

mod orchestrator;
mod researcher;

pub use orchestrator::{PromptOrchestrator, ReplayOrchestrator};
pub use researcher::Researcher;
