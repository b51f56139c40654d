//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and shapes.
//! All errors are collected rather than stopping at the first one.

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ApiConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &ApiConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.static_files.directory.trim().is_empty() {
        errors.push(ValidationError::new("static_files.directory", "must not be empty"));
    }
    let mount = &config.static_files.mount_path;
    if !mount.starts_with('/') || mount == "/" || mount.ends_with('/') {
        errors.push(ValidationError::new(
            "static_files.mount_path",
            "must start with '/', not end with '/', and not be the root",
        ));
    }

    if config.filter.enabled {
        if config.filter.deny_list.iter().any(|s| s.is_empty()) {
            errors.push(ValidationError::new("filter.deny_list", "entries must not be empty"));
        }
        if !config.filter.redirect_to.starts_with('/') {
            errors.push(ValidationError::new("filter.redirect_to", "must be an absolute path"));
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::new("rate_limit.window_secs", "must be greater than 0"));
        }
        for (field, value) in [
            ("rate_limit.sources_per_window", config.rate_limit.sources_per_window),
            ("rate_limit.dnsbrute_per_window", config.rate_limit.dnsbrute_per_window),
            ("rate_limit.query_per_window", config.rate_limit.query_per_window),
        ] {
            if value == 0 {
                errors.push(ValidationError::new(field, "must be greater than 0"));
            }
        }
    }

    if config.engine.binary.trim().is_empty() {
        errors.push(ValidationError::new("engine.binary", "must not be empty"));
    }
    if config.engine.timeout_secs == 0 {
        errors.push(ValidationError::new("engine.timeout_secs", "must be greater than 0"));
    }
    if config.engine.sources.is_empty() {
        errors.push(ValidationError::new("engine.sources", "must list at least one source"));
    }
    let mut seen = HashSet::new();
    for source in &config.engine.sources {
        if source.is_empty() || source.contains(',') || source.contains(char::is_whitespace) {
            errors.push(ValidationError::new(
                "engine.sources",
                format!("'{}' is not a valid source identifier", source),
            ));
        } else if !seen.insert(source.as_str()) {
            errors.push(ValidationError::new(
                "engine.sources",
                format!("'{}' is listed more than once", source),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    } else if config.timeouts.request_secs <= config.engine.timeout_secs {
        // Otherwise the HTTP layer cuts the request off with an empty 408
        // before the engine deadline can produce the generic body.
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            format!(
                "must be greater than engine.timeout_secs ({})",
                config.engine.timeout_secs
            ),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
