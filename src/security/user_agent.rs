//! User-agent deflection for known scanning tools.
//!
//! Requests whose `User-Agent` contains a deny-listed signature are
//! redirected to the decoy endpoint before any handler logic runs.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::config::FilterConfig;
use crate::observability::metrics;

/// Case-sensitive substring matcher over the `User-Agent` header.
#[derive(Debug, Clone)]
pub struct UserAgentFilter {
    enabled: bool,
    deny_list: Vec<String>,
    redirect_to: String,
}

impl UserAgentFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            deny_list: config.deny_list.clone(),
            redirect_to: config.redirect_to.clone(),
        }
    }

    /// Returns the matched signature, if any.
    pub fn matches<'a>(&'a self, user_agent: Option<&str>) -> Option<&'a str> {
        if !self.enabled {
            return None;
        }
        let user_agent = user_agent?;
        self.deny_list
            .iter()
            .find(|sig| user_agent.contains(sig.as_str()))
            .map(String::as_str)
    }

    pub fn redirect_to(&self) -> &str {
        &self.redirect_to
    }
}

/// Middleware redirecting denied user agents to the decoy endpoint.
pub async fn user_agent_middleware(
    State(filter): State<Arc<UserAgentFilter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Header bytes outside visible ASCII are legal (obs-text); decode lossily
    // so a signature next to them still matches.
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()));

    if let Some(signature) = filter.matches(user_agent.as_deref()) {
        let path = request.uri().path().to_string();
        tracing::info!(path = %path, signature = %signature, "Redirecting scanner to decoy");
        metrics::record_redirect(&path);
        return Redirect::temporary(filter.redirect_to()).into_response();
    }

    next.run(request).await
}
