//! REST API for the theHarvester OSINT tool.

pub mod config;
pub mod context;
pub mod engine;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ApiConfig;
pub use context::ServerContext;
pub use engine::{HarvestEngine, QueryConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
