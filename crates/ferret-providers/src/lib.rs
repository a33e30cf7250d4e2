//! ferret-providers: LLM provider implementations for ferret
//!
//! This crate provides implementations of the Provider trait used by the
//! orchestrator to turn research instructions into tool calls.

pub mod openai;

pub use openai::OpenAIProvider;
