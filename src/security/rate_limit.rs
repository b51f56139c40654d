//! Fixed-window rate limiting per client address.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use serde_json::json;

use crate::config::RateLimitConfig;
use crate::observability::metrics;

/// Request counter for one (endpoint, client) pair.
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Process-wide fixed-window limiter.
pub struct RateLimiter {
    enabled: bool,
    window: Duration,
    counters: DashMap<(&'static str, IpAddr), Window>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            window: Duration::from_secs(config.window_secs),
            counters: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn check(&self, endpoint: &'static str, client: IpAddr, max_requests: u32) -> RateDecision {
        self.check_at(endpoint, client, max_requests, Instant::now())
    }

    /// Count one request at `now`. The entry lock makes this atomic per key.
    pub fn check_at(
        &self,
        endpoint: &'static str,
        client: IpAddr,
        max_requests: u32,
        now: Instant,
    ) -> RateDecision {
        if !self.enabled {
            return RateDecision::Allowed {
                remaining: max_requests,
            };
        }

        let mut window = self.counters.entry((endpoint, client)).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(window.started) >= self.window {
            window.started = now;
            window.count = 0;
        }

        if window.count < max_requests {
            window.count += 1;
            RateDecision::Allowed {
                remaining: max_requests - window.count,
            }
        } else {
            let elapsed = now.saturating_duration_since(window.started);
            RateDecision::Limited {
                retry_after: self.window.saturating_sub(elapsed),
            }
        }
    }

    /// Drop windows that have fully elapsed.
    pub fn purge_expired(&self, now: Instant) -> usize {
        let before = self.counters.len();
        self.counters
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
        before - self.counters.len()
    }

    pub fn tracked_clients(&self) -> usize {
        self.counters.len()
    }
}

/// Limit attached to a single route.
#[derive(Clone)]
pub struct RouteLimit {
    limiter: Arc<RateLimiter>,
    endpoint: &'static str,
    max_requests: u32,
}

impl RouteLimit {
    pub fn new(limiter: Arc<RateLimiter>, endpoint: &'static str, max_requests: u32) -> Self {
        Self {
            limiter,
            endpoint,
            max_requests,
        }
    }

    /// Human form used in the 429 body, e.g. "2 per 1 minute".
    fn describe(&self) -> String {
        let secs = self.limiter.window().as_secs();
        let window = match secs {
            60 => "1 minute".to_string(),
            s if s % 3600 == 0 => plural(s / 3600, "hour"),
            s if s % 60 == 0 => plural(s / 60, "minute"),
            s => plural(s, "second"),
        };
        format!("{} per {}", self.max_requests, window)
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Best-effort client address; connections without one share a bucket.
fn client_ip(request: &Request<Body>) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Middleware enforcing a [`RouteLimit`].
pub async fn rate_limit_middleware(
    State(limit): State<RouteLimit>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let client = client_ip(&request);

    match limit.limiter.check(limit.endpoint, client, limit.max_requests) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            tracing::warn!(
                client = %client,
                endpoint = limit.endpoint,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );
            metrics::record_rate_limited(limit.endpoint);

            let body = json!({ "error": format!("Rate limit exceeded: {}", limit.describe()) });
            let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
            let secs = retry_after.as_secs().max(1);
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
            response
        }
    }
}
