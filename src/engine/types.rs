//! Types shared between the HTTP layer and harvesting engines.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Result limit used when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 500;

/// Aggregated findings keyed by category (hosts, emails, ips, ...).
///
/// Passed through to the caller untouched; key order is preserved.
pub type HarvestResult = serde_json::Map<String, serde_json::Value>;

/// Options for a single harvest run.
///
/// Built fresh for every request and handed to the engine by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryConfig {
    pub domain: String,
    pub sources: Vec<String>,
    pub limit: u32,
    pub start: u32,
    pub dns_brute: bool,
    pub dns_lookup: bool,
    pub dns_tld: bool,
    pub google_dork: bool,
    pub proxies: bool,
    pub shodan: bool,
    pub take_over: bool,
    pub virtual_host: bool,
    pub dns_server: Option<String>,
    pub filename: Option<String>,
}

impl QueryConfig {
    /// A configuration for `domain` with every feature off and no sources.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            sources: Vec::new(),
            limit: DEFAULT_LIMIT,
            start: 0,
            dns_brute: false,
            dns_lookup: false,
            dns_tld: false,
            google_dork: false,
            proxies: false,
            shodan: false,
            take_over: false,
            virtual_host: false,
            dns_server: None,
            filename: None,
        }
    }

    /// DNS brute forcing only.
    pub fn dns_brute(domain: impl Into<String>) -> Self {
        Self {
            dns_brute: true,
            ..Self::new(domain)
        }
    }

    /// Structural checks that do not depend on the engine.
    pub fn validate(&self) -> Result<(), InvalidQuery> {
        validate_domain(&self.domain)?;

        for source in &self.sources {
            if source.is_empty() || source.contains(',') || source.starts_with('-') {
                return Err(InvalidQuery::Source(source.clone()));
            }
        }

        if let Some(server) = &self.dns_server {
            if server.is_empty()
                || server.starts_with('-')
                || server.contains(char::is_whitespace)
            {
                return Err(InvalidQuery::DnsServer(server.clone()));
            }
        }

        if let Some(filename) = &self.filename {
            validate_filename(filename)?;
        }

        Ok(())
    }
}

fn validate_domain(domain: &str) -> Result<(), InvalidQuery> {
    if domain.is_empty() {
        return Err(InvalidQuery::EmptyDomain);
    }
    let well_formed = domain.len() <= 253
        && !domain.starts_with(['-', '.'])
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
    if well_formed {
        Ok(())
    } else {
        Err(InvalidQuery::Domain(domain.to_string()))
    }
}

fn validate_filename(filename: &str) -> Result<(), InvalidQuery> {
    let invalid = filename.is_empty()
        || filename.starts_with(['-', '.'])
        || filename.contains(['/', '\\', '\0'])
        || filename.contains("..");
    if invalid {
        Err(InvalidQuery::Filename(filename.to_string()))
    } else {
        Ok(())
    }
}

/// A query configuration that fails structural validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidQuery {
    #[error("domain must not be empty")]
    EmptyDomain,

    #[error("'{0}' is not a valid domain")]
    Domain(String),

    #[error("'{0}' is not a valid source identifier")]
    Source(String),

    #[error("'{0}' is not a valid DNS server")]
    DnsServer(String),

    #[error("'{0}' is not a valid report filename")]
    Filename(String),
}

/// Failures raised by a harvesting engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("failed to start harvester: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("harvester exited with status {code:?}: {stderr}")]
    Exited { code: Option<i32>, stderr: String },

    #[error("harvest timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed harvester output: {0}")]
    MalformedOutput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::InvalidConfig(_) => "invalid_config",
            EngineError::UnsupportedSource(_) => "unsupported_source",
            EngineError::Spawn(_) => "spawn",
            EngineError::Exited { .. } => "exited",
            EngineError::Timeout(_) => "timeout",
            EngineError::MalformedOutput(_) => "malformed_output",
            EngineError::Io(_) => "io",
            EngineError::Unavailable(_) => "unavailable",
        }
    }
}

impl From<InvalidQuery> for EngineError {
    fn from(err: InvalidQuery) -> Self {
        EngineError::InvalidConfig(err.to_string())
    }
}
