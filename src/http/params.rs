//! Query-string parsing for the harvesting endpoints.
//!
//! `source` may be repeated and each occurrence may itself be a
//! comma-separated list. Booleans accept the usual spellings
//! (`true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`).

use thiserror::Error;

use crate::engine::{InvalidQuery, QueryConfig, DEFAULT_LIMIT};

/// Rejection raised before the engine is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("missing required query parameter: {0}")]
    Missing(&'static str),

    #[error("query parameter '{name}' must be a boolean, got '{value}'")]
    InvalidBool { name: &'static str, value: String },

    #[error("query parameter '{name}' must be a non-negative integer, got '{value}'")]
    InvalidInteger { name: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] InvalidQuery),
}

fn pairs(raw: Option<&str>) -> Vec<(String, String)> {
    raw.map(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .into_owned()
            .collect()
    })
    .unwrap_or_default()
}

/// Last occurrence wins for scalar parameters.
fn last<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn parse_bool(pairs: &[(String, String)], name: &'static str) -> Result<bool, ParamError> {
    let Some(value) = last(pairs, name) else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(ParamError::InvalidBool {
            name,
            value: value.to_string(),
        }),
    }
}

fn parse_u32(
    pairs: &[(String, String)],
    name: &'static str,
    default: u32,
) -> Result<u32, ParamError> {
    match last(pairs, name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ParamError::InvalidInteger {
            name,
            value: value.to_string(),
        }),
    }
}

/// Optional string parameter; empty means unset.
fn parse_optional(pairs: &[(String, String)], name: &str) -> Option<String> {
    last(pairs, name)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_domain(pairs: &[(String, String)]) -> Result<String, ParamError> {
    parse_optional(pairs, "domain").ok_or(ParamError::Missing("domain"))
}

/// Parse `/dnsbrute` parameters into its fixed configuration.
pub fn parse_dnsbrute(raw: Option<&str>) -> Result<QueryConfig, ParamError> {
    let pairs = pairs(raw);
    let config = QueryConfig::dns_brute(parse_domain(&pairs)?);
    config.validate()?;
    Ok(config)
}

/// Parse `/query` parameters into a validated configuration.
pub fn parse_query(raw: Option<&str>) -> Result<QueryConfig, ParamError> {
    let pairs = pairs(raw);

    let sources: Vec<String> = pairs
        .iter()
        .filter(|(k, _)| k == "source")
        .flat_map(|(_, v)| v.split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if sources.is_empty() {
        return Err(ParamError::Missing("source"));
    }

    let config = QueryConfig {
        sources,
        limit: parse_u32(&pairs, "limit", DEFAULT_LIMIT)?,
        start: parse_u32(&pairs, "start", 0)?,
        dns_brute: parse_bool(&pairs, "dns_brute")?,
        dns_lookup: parse_bool(&pairs, "dns_lookup")?,
        dns_tld: parse_bool(&pairs, "dns_tld")?,
        google_dork: parse_bool(&pairs, "google_dork")?,
        proxies: parse_bool(&pairs, "proxies")?,
        shodan: parse_bool(&pairs, "shodan")?,
        take_over: parse_bool(&pairs, "take_over")?,
        virtual_host: parse_bool(&pairs, "virtual_host")?,
        dns_server: parse_optional(&pairs, "dns_server"),
        filename: parse_optional(&pairs, "filename"),
        ..QueryConfig::new(parse_domain(&pairs)?)
    };
    config.validate()?;
    Ok(config)
}
