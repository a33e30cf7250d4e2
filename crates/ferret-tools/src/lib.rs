//! ferret-tools: Search backends for ferret
//!
//! This crate provides the backends that answer the researcher's lookup
//! capabilities:
//! - Fixture: fixed local JSON files, for offline runs
//! - Bing: the live Bing web, entity and news search APIs

pub mod bing;
pub mod fixture;

pub use bing::{BingConfig, BingSearch};
pub use fixture::FixtureSearch;
