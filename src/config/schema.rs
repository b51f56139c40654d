//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the API.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::engine::sources::SUPPORTED_SOURCES;

/// Root configuration for the harvest API.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static report hosting.
    pub static_files: StaticFilesConfig,

    /// User-agent deflection.
    pub filter: FilterConfig,

    /// Per-client rate limits.
    pub rate_limit: RateLimitConfig,

    /// Harvesting engine invocation.
    pub engine: EngineConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Static file hosting for generated reports.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding report files. Created if missing.
    pub directory: String,

    /// URL prefix the directory is mounted under.
    pub mount_path: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            directory: "theHarvester/lib/api/static".to_string(),
            mount_path: "/static".to_string(),
        }
    }
}

/// User-agent filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Enable user-agent filtering.
    pub enabled: bool,

    /// Case-sensitive substrings that mark a scanning tool.
    pub deny_list: Vec<String>,

    /// Path denied clients are redirected to.
    pub redirect_to: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            deny_list: vec![
                "gobuster".to_string(),
                "sqlmap".to_string(),
                "rustbuster".to_string(),
            ],
            redirect_to: "/nicebot".to_string(),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Length of the fixed window in seconds.
    pub window_secs: u64,

    /// Requests per window per client on `/sources`.
    pub sources_per_window: u32,

    /// Requests per window per client on `/dnsbrute`.
    pub dnsbrute_per_window: u32,

    /// Requests per window per client on `/query`.
    pub query_per_window: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_secs: 60,
            sources_per_window: 5,
            dnsbrute_per_window: 5,
            query_per_window: 2,
        }
    }
}

/// Harvesting engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Harvester executable (looked up in PATH when not absolute).
    pub binary: String,

    /// Scratch directory for intermediate result files.
    /// Empty means the system temp directory.
    pub work_dir: String,

    /// Upper bound on a single harvest, in seconds.
    pub timeout_secs: u64,

    /// Data-source identifiers the engine accepts.
    pub sources: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            binary: "theHarvester".to_string(),
            work_dir: String::new(),
            timeout_secs: 600,
            sources: SUPPORTED_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Timeout configuration for the HTTP layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 900 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log file path. Empty disables file logging.
    pub log_file: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: "api.log".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
