//! Route handlers.

use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::context::ServerContext;
use crate::http::params::{parse_dnsbrute, parse_query};
use crate::http::response::{
    engine_failure, BotBody, DnsBruteBody, SourcesBody, BOT_MESSAGE,
};

const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en-US">
    <head>
        <title>theHarvester REST API</title>
    </head>
    <body>
        <br/>
        <a href="https://github.com/laramies/theHarvester" target="_blank">
            <span>
                The Harvester
            </span>
        </a>
    </body>
</html>
"#;

pub async fn root() -> Html<&'static str> {
    Html(ROOT_PAGE)
}

pub async fn nicebot() -> Json<BotBody> {
    Json(BotBody { bot: BOT_MESSAGE })
}

pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn sources(State(ctx): State<Arc<ServerContext>>) -> Response {
    tracing::info!("Starting sources request");
    match ctx.supported_sources() {
        Ok(sources) => Json(SourcesBody { sources }).into_response(),
        Err(e) => {
            tracing::error!(error = %e, error_debug = ?e, "Error in sources");
            engine_failure(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

pub async fn dnsbrute(State(ctx): State<Arc<ServerContext>>, RawQuery(raw): RawQuery) -> Response {
    let query = match parse_dnsbrute(raw.as_deref()) {
        Ok(q) => q,
        Err(e) => return e.into_response(),
    };

    tracing::info!(domain = %query.domain, "Starting DNS brute force");
    match ctx.harvest(query).await {
        Ok(result) => Json(DnsBruteBody {
            dns_bruteforce: result,
        })
        .into_response(),
        Err(_) => engine_failure(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

/// Engine failures keep a 200 status with the generic payload.
pub async fn query(State(ctx): State<Arc<ServerContext>>, RawQuery(raw): RawQuery) -> Response {
    let query = match parse_query(raw.as_deref()) {
        Ok(q) => q,
        Err(e) => return e.into_response(),
    };

    tracing::info!(
        domain = %query.domain,
        sources = %query.sources.join(","),
        "Starting query"
    );
    match ctx.harvest(query).await {
        Ok(result) => Json(result).into_response(),
        Err(_) => engine_failure(StatusCode::OK),
    }
}
