//! Harvesting engine abstraction.
//!
//! # Data Flow
//! ```text
//! HTTP handler
//!     → QueryConfig (typed, validated)
//!     → HarvestEngine::harvest (async, bounded by ServerContext timeout)
//!     → command.rs spawns the harvester CLI and reads its JSON report
//!     → HarvestResult (opaque JSON object)
//! ```
//!
//! # Design Decisions
//! - The engine is a trait object so handlers never see the transport
//! - Capability listing is synchronous; harvesting is async
//! - Failures are values (`EngineError`), never panics

pub mod command;
pub mod sources;
pub mod types;

use futures_util::future::BoxFuture;

pub use command::CommandEngine;
pub use types::{EngineError, HarvestResult, InvalidQuery, QueryConfig, DEFAULT_LIMIT};

/// An OSINT harvesting backend.
pub trait HarvestEngine: Send + Sync {
    /// Data-source identifiers this engine can query.
    fn supported_sources(&self) -> Result<Vec<String>, EngineError>;

    /// Run a harvest and return the aggregated findings.
    fn harvest(&self, config: QueryConfig) -> BoxFuture<'_, Result<HarvestResult, EngineError>>;

    /// Release engine resources. Called once during server shutdown.
    fn shutdown(&self) {}
}
