//! Route-level tests driven in-process through the router.

use std::sync::Arc;

use axum::http::{header, StatusCode};
use serde_json::json;

mod common;

use common::{
    body_bytes, body_json, client, get, router_with, sample_findings, send, test_config, Outcome,
    ScriptedEngine,
};

const GENERIC: &str = "Please contact the server administrator to check the issue";

fn findings_engine() -> Arc<ScriptedEngine> {
    Arc::new(ScriptedEngine::new(Outcome::Findings(sample_findings())))
}

#[tokio::test]
async fn test_root_serves_html() {
    let router = router_with(test_config(), findings_engine());

    for ua in [None, Some("Mozilla/5.0")] {
        let response = send(&router, get("/", ua, client(1))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let body = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(body.contains("The Harvester"));
    }
}

#[tokio::test]
async fn test_scanners_are_redirected_without_harvesting() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    let paths = [
        "/",
        "/dnsbrute?domain=example.com",
        "/query?domain=example.com&source=bing",
    ];
    for ua in ["gobuster/3.6", "sqlmap/1.7", "Mozilla rustbuster"] {
        for path in paths {
            let response = send(&router, get(path, Some(ua), client(1))).await;
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{ua} on {path}");
            assert_eq!(response.headers()[header::LOCATION], "/nicebot");
        }
    }
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_scanner_with_non_ascii_user_agent_is_redirected() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    for path in ["/", "/query?domain=example.com&source=bing"] {
        let mut request = get(path, None, client(1));
        request.headers_mut().insert(
            header::USER_AGENT,
            header::HeaderValue::from_bytes(b"sqlmap/1.7 (\xe9)").unwrap(),
        );
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(response.headers()[header::LOCATION], "/nicebot");
    }
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_scanners_do_not_consume_quota() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    for _ in 0..5 {
        let response = send(
            &router,
            get("/query?domain=example.com&source=bing", Some("sqlmap"), client(1)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    let response = send(
        &router,
        get("/query?domain=example.com&source=bing", Some("curl/8.5"), client(1)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_nicebot_payload() {
    let router = router_with(test_config(), findings_engine());
    let response = send(&router, get("/nicebot", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"bot": "These are not the droids you are looking for"})
    );
}

#[tokio::test]
async fn test_sources_lists_engine_capabilities() {
    let router = router_with(test_config(), findings_engine());
    let response = send(&router, get("/sources", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"sources": ["bing", "crtsh", "otx"]})
    );
}

#[tokio::test]
async fn test_sources_failure_has_explicit_response() {
    let router = router_with(test_config(), Arc::new(ScriptedEngine::broken_sources()));
    let response = send(&router, get("/sources", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"exception": GENERIC}));
}

#[tokio::test]
async fn test_dnsbrute_runs_brute_force_only() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    let response = send(&router, get("/dnsbrute?domain=example.com", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"dns_bruteforce": serde_json::Value::Object(sample_findings())})
    );

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.domain, "example.com");
    assert!(call.dns_brute);
    assert!(!call.dns_lookup && !call.dns_tld && !call.google_dork);
    assert!(!call.proxies && !call.shodan && !call.take_over && !call.virtual_host);
    assert!(call.sources.is_empty());
    assert_eq!(call.limit, 500);
    assert_eq!(call.start, 0);
}

#[tokio::test]
async fn test_dnsbrute_requires_domain() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    let response = send(&router, get("/dnsbrute", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"detail": "missing required query parameter: domain"})
    );
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_dnsbrute_engine_failure_is_masked() {
    let router = router_with(test_config(), Arc::new(ScriptedEngine::new(Outcome::Fail)));
    let response = send(&router, get("/dnsbrute?domain=example.com", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await, json!({"exception": GENERIC}));
}

#[tokio::test]
async fn test_dnsbrute_is_rate_limited() {
    let router = router_with(test_config(), findings_engine());

    for _ in 0..5 {
        let response = send(&router, get("/dnsbrute?domain=example.com", None, client(1))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = send(&router, get("/dnsbrute?domain=example.com", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_query_without_source_is_rejected_before_engine() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    let response = send(&router, get("/query?domain=example.com", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({"detail": "missing required query parameter: source"})
    );
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_query_forwards_every_option() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    let uri = "/query?domain=example.com&source=bing,crtsh&source=otx&limit=100&start=10\
               &dns_brute=true&dns_lookup=true&dns_tld=false&google_dork=true&proxies=false\
               &shodan=true&take_over=true&virtual_host=true&dns_server=1.1.1.1\
               &filename=report.xml";
    let response = send(&router, get(uri, Some("curl/8.5"), client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::Value::Object(sample_findings())
    );

    let calls = engine.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.domain, "example.com");
    assert_eq!(call.sources, vec!["bing", "crtsh", "otx"]);
    assert_eq!(call.limit, 100);
    assert_eq!(call.start, 10);
    assert!(call.dns_brute && call.dns_lookup && !call.dns_tld);
    assert!(call.google_dork && !call.proxies && call.shodan);
    assert!(call.take_over && call.virtual_host);
    assert_eq!(call.dns_server.as_deref(), Some("1.1.1.1"));
    assert_eq!(call.filename.as_deref(), Some("report.xml"));
}

#[tokio::test]
async fn test_query_engine_failure_returns_generic_error() {
    let router = router_with(test_config(), Arc::new(ScriptedEngine::new(Outcome::Fail)));

    let response = send(&router, get("/query?domain=example.com&source=bing", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_bytes(response).await;
    let text = String::from_utf8(body.clone()).unwrap();
    assert!(!text.contains("Traceback"));
    assert!(!text.contains("shodan_api_key"));
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
        json!({"exception": GENERIC})
    );
}

#[tokio::test]
async fn test_query_timeout_returns_generic_error() {
    let mut config = test_config();
    config.engine.timeout_secs = 1;
    let engine = Arc::new(ScriptedEngine::new(Outcome::Hang));
    let router = router_with(config, engine.clone());

    let response = send(&router, get("/query?domain=example.com&source=bing", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"exception": GENERIC}));
    assert_eq!(engine.calls().len(), 1);
}

#[tokio::test]
async fn test_query_responses_are_byte_identical() {
    let mut config = test_config();
    config.rate_limit.enabled = false;
    let router = router_with(config, findings_engine());

    let uri = "/query?domain=example.com&source=bing&limit=50";
    let first = body_bytes(send(&router, get(uri, None, client(1))).await).await;
    for _ in 0..3 {
        let again = body_bytes(send(&router, get(uri, None, client(1))).await).await;
        assert_eq!(first, again);
    }
    assert!(first.starts_with(br#"{"hosts":"#));
}

#[tokio::test]
async fn test_query_rate_limit_is_per_client() {
    let router = router_with(test_config(), findings_engine());
    let uri = "/query?domain=example.com&source=bing";

    for _ in 0..2 {
        assert_eq!(send(&router, get(uri, None, client(1))).await.status(), StatusCode::OK);
    }

    let limited = send(&router, get(uri, None, client(1))).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(limited.headers().contains_key(header::RETRY_AFTER));
    assert_eq!(
        body_json(limited).await,
        json!({"error": "Rate limit exceeded: 2 per 1 minute"})
    );

    assert_eq!(send(&router, get(uri, None, client(2))).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_sources_is_rate_limited() {
    let router = router_with(test_config(), findings_engine());

    for _ in 0..5 {
        assert_eq!(
            send(&router, get("/sources", None, client(3))).await.status(),
            StatusCode::OK
        );
    }
    assert_eq!(
        send(&router, get("/sources", None, client(3))).await.status(),
        StatusCode::TOO_MANY_REQUESTS
    );
}

#[tokio::test]
async fn test_invalid_parameters_are_client_errors() {
    let engine = findings_engine();
    let router = router_with(test_config(), engine.clone());

    for uri in [
        "/query?domain=example.com&source=bing&limit=lots",
        "/query?domain=example.com&source=bing&shodan=perhaps",
    ] {
        let response = send(&router, get(uri, None, client(4))).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
    let response = send(&router, get("/dnsbrute?domain=-x%20evil", None, client(4))).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn test_static_reports_are_served() {
    let config = test_config();
    let dir = std::path::PathBuf::from(&config.static_files.directory);
    std::fs::write(dir.join("report.json"), r#"{"hosts":[]}"#).unwrap();
    let router = router_with(config, findings_engine());

    let response = send(&router, get("/static/report.json", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, br#"{"hosts":[]}"#.to_vec());

    let missing = send(&router, get("/static/absent.json", None, client(1))).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let router = router_with(test_config(), findings_engine());
    let response = send(&router, get("/health", None, client(1))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let id = response.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());
    assert_eq!(body_json(response).await["status"], "ok");
}
