//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request (filtered routes):
//!     → user_agent.rs (redirect known scanners to the decoy)
//!     → rate_limit.rs (per-client fixed window, per endpoint)
//!     → handler
//! ```
//!
//! # Design Decisions
//! - Deflection happens before rate limiting, so scanners never consume quota
//! - Limits are keyed by (endpoint, client IP)
//! - No trust in client input

pub mod rate_limit;
pub mod user_agent;

pub use rate_limit::{rate_limit_middleware, RateDecision, RateLimiter, RouteLimit};
pub use user_agent::{user_agent_middleware, UserAgentFilter};
