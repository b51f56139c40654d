//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Attach per-route filters (user-agent deflection, rate limits)
//! - Wire up middleware (tracing, request ID, timeout)
//! - Mount the static report directory
//! - Bind server to listener and shut down gracefully

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::context::ServerContext;
use crate::http::handlers;
use crate::observability::metrics;
use crate::security::{rate_limit_middleware, user_agent_middleware, RouteLimit};

/// HTTP server for the harvest API.
pub struct HttpServer {
    router: Router,
    context: Arc<ServerContext>,
}

impl HttpServer {
    /// Create a new HTTP server around a prepared context.
    pub fn new(context: Arc<ServerContext>) -> Self {
        let router = build_router(context.clone());
        Self { router, context }
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        if self.context.config().rate_limit.enabled {
            let limiter = self.context.limiter().clone();
            let mut stop = shutdown.resubscribe();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
                loop {
                    tokio::select! {
                        _ = ticker.tick() => {
                            let purged = limiter.purge_expired(Instant::now());
                            if purged > 0 {
                                tracing::debug!(
                                    purged,
                                    tracked = limiter.tracked_clients(),
                                    "Purged expired rate limit windows"
                                );
                            }
                        }
                        _ = stop.recv() => break,
                    }
                }
            });
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all routes and middleware layers.
#[allow(deprecated)]
pub fn build_router(context: Arc<ServerContext>) -> Router {
    let config = context.config();
    let limits = &config.rate_limit;

    let filter = middleware::from_fn_with_state(context.user_agents().clone(), user_agent_middleware);
    let limit = |endpoint: &'static str, max_requests: u32| {
        middleware::from_fn_with_state(
            RouteLimit::new(context.limiter().clone(), endpoint, max_requests),
            rate_limit_middleware,
        )
    };

    // Layers on a route run outermost-last: the filter sees requests before the limiter.
    Router::new()
        .route("/", get(handlers::root).layer(filter.clone()))
        .route("/nicebot", get(handlers::nicebot))
        .route("/health", get(handlers::health))
        .route(
            "/sources",
            get(handlers::sources).layer(limit("/sources", limits.sources_per_window)),
        )
        .route(
            "/dnsbrute",
            get(handlers::dnsbrute)
                .layer(limit("/dnsbrute", limits.dnsbrute_per_window))
                .layer(filter.clone()),
        )
        .route(
            "/query",
            get(handlers::query)
                .layer(limit("/query", limits.query_per_window))
                .layer(filter),
        )
        .route_layer(middleware::from_fn(metrics::track_requests))
        .with_state(context.clone())
        .nest_service(
            &config.static_files.mount_path,
            ServeDir::new(&config.static_files.directory),
        )
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
