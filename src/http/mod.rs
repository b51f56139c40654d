//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → security (user-agent filter, rate limit) on guarded routes
//!     → params.rs (query string → QueryConfig)
//!     → handlers.rs (call the engine through ServerContext)
//!     → response.rs (JSON payloads, generic failures)
//! ```

pub mod handlers;
pub mod params;
pub mod response;
pub mod server;
pub mod static_files;

pub use params::ParamError;
pub use server::{build_router, HttpServer};
pub use static_files::ensure_static_dir;
