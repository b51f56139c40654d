//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Request, Response},
    Router,
};
use futures_util::future::BoxFuture;
use harvest_api::config::ApiConfig;
use harvest_api::engine::{EngineError, HarvestEngine, HarvestResult, QueryConfig};
use harvest_api::http::build_router;
use harvest_api::ServerContext;
use serde_json::json;
use tower::ServiceExt;

/// What a [`ScriptedEngine`] does when asked to harvest.
#[derive(Clone)]
pub enum Outcome {
    Findings(HarvestResult),
    Fail,
    Hang,
}

/// Engine double that records every configuration it receives.
pub struct ScriptedEngine {
    sources: Option<Vec<String>>,
    outcome: Outcome,
    calls: Mutex<Vec<QueryConfig>>,
}

impl ScriptedEngine {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            sources: Some(vec!["bing".into(), "crtsh".into(), "otx".into()]),
            outcome,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// An engine whose capability listing fails.
    pub fn broken_sources() -> Self {
        Self {
            sources: None,
            ..Self::new(Outcome::Fail)
        }
    }

    pub fn calls(&self) -> Vec<QueryConfig> {
        self.calls.lock().unwrap().clone()
    }
}

impl HarvestEngine for ScriptedEngine {
    fn supported_sources(&self) -> Result<Vec<String>, EngineError> {
        self.sources
            .clone()
            .ok_or_else(|| EngineError::Unavailable("sources module failed to import".into()))
    }

    fn harvest(&self, config: QueryConfig) -> BoxFuture<'_, Result<HarvestResult, EngineError>> {
        self.calls.lock().unwrap().push(config);
        let outcome = self.outcome.clone();
        Box::pin(async move {
            match outcome {
                Outcome::Findings(result) => Ok(result),
                Outcome::Fail => Err(EngineError::Exited {
                    code: Some(1),
                    stderr: "Traceback: KeyError 'shodan_api_key'".into(),
                }),
                Outcome::Hang => std::future::pending().await,
            }
        })
    }
}

/// Deterministic findings used across tests.
pub fn sample_findings() -> HarvestResult {
    let value = json!({
        "hosts": ["www.example.com:93.184.216.34", "mail.example.com"],
        "emails": ["admin@example.com"],
        "ips": ["93.184.216.34"],
        "asns": [],
        "interesting_urls": []
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Defaults with no log file and a private static directory.
pub fn test_config() -> ApiConfig {
    let mut config = ApiConfig::default();
    config.observability.log_file = String::new();
    config.static_files.directory = temp_dir("static").to_string_lossy().into_owned();
    config
}

pub fn temp_dir(label: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("harvest-api-{}-{}", label, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn router_with(config: ApiConfig, engine: Arc<ScriptedEngine>) -> Router {
    build_router(Arc::new(ServerContext::new(config, engine)))
}

pub fn client(last_octet: u8) -> SocketAddr {
    SocketAddr::from(([10, 0, 0, last_octet], 40000))
}

/// Build a GET request from a given client address.
pub fn get(uri: &str, user_agent: Option<&str>, from: SocketAddr) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(ua) = user_agent {
        builder = builder.header(header::USER_AGENT, ua);
    }
    let mut request = builder.body(Body::empty()).unwrap();
    request.extensions_mut().insert(ConnectInfo(from));
    request
}

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
