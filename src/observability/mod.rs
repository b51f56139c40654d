//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, middleware and the engine produce:
//!     → logging.rs (structured log events to stdout and the log file)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log file (api.log by default)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is attached by the HTTP layer and shows up in trace spans
//! - Engine error details are logged here and never returned to callers

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogHandle};
