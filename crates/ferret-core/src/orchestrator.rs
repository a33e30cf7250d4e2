use async_trait::async_trait;

use crate::error::Error;
use crate::message::ToolCall;

pub const DEFAULT_FEEDBACK: &str = "No feedback";

/// Maps research instructions to an ordered list of capability calls.
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// `feedback` is a free-text hint about the quality of a previous
    /// attempt; [`DEFAULT_FEEDBACK`] when there is none.
    async fn orchestrate(&self, instructions: &str, feedback: &str) -> Result<Vec<ToolCall>, Error>;
}
