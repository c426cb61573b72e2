//! Router tests driven in-process through `tower::ServiceExt::oneshot`.
//!
//! A stub probe stands in for the operating system where a test needs a
//! known host name or a failing telemetry read.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use hello_eks::config::AppConfig;
use hello_eks::routes::health::HealthResponse;
use hello_eks::routes::root::RootResponse;
use hello_eks::telemetry::{
    ProcessMemory, SysinfoProbe, SystemProbe, SystemStats, TelemetryError,
};
use hello_eks::{create_router, AppInfo, AppState, ErrorResponse};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Clone, Copy)]
enum StubMode {
    Ok,
    Fail,
    Panic,
}

struct StubProbe {
    mode: StubMode,
}

impl StubProbe {
    fn check(&self) -> Result<(), TelemetryError> {
        match self.mode {
            StubMode::Ok => Ok(()),
            StubMode::Fail => Err(TelemetryError::Query("meminfo unreadable".to_string())),
            StubMode::Panic => panic!("probe exploded"),
        }
    }
}

impl SystemProbe for StubProbe {
    fn process_memory(&self) -> Result<ProcessMemory, TelemetryError> {
        self.check()?;
        Ok(ProcessMemory {
            rss: 10 * 1024 * 1024,
            virtual_memory: 200 * 1024 * 1024,
        })
    }

    fn system_stats(&self) -> Result<SystemStats, TelemetryError> {
        self.check()?;
        Ok(SystemStats {
            loadavg: [0.42, 0.3, 0.1],
            freemem: 512,
            totalmem: 2048,
        })
    }

    fn hostname(&self) -> Result<String, TelemetryError> {
        self.check()?;
        Ok("stub-node-1".to_string())
    }
}

fn info(version: &str, environment: &str) -> AppInfo {
    AppInfo {
        version: version.to_string(),
        environment: environment.to_string(),
    }
}

fn app_with(mode: StubMode) -> Router {
    create_router(AppState::with_probe(
        info("1.2.3", "test"),
        Arc::new(StubProbe { mode }),
    ))
}

async fn send(app: Router, method: Method, uri: &str) -> Response {
    app.oneshot(
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri).await
}

async fn body_json(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_configured_identity() {
    let response = get(app_with(StubMode::Ok), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert!(response.headers().contains_key("x-request-id"));
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.2.3");
    assert_eq!(body["environment"], "test");
    let ts = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
}

#[tokio::test]
async fn health_is_stable_apart_from_timestamp() {
    let app = app_with(StubMode::Ok);
    let first: HealthResponse =
        serde_json::from_value(body_json(get(app.clone(), "/health").await).await).unwrap();
    let second: HealthResponse =
        serde_json::from_value(body_json(get(app, "/health").await).await).unwrap();

    assert_eq!(
        HealthResponse {
            timestamp: String::new(),
            ..first
        },
        HealthResponse {
            timestamp: String::new(),
            ..second
        }
    );
}

#[tokio::test]
async fn health_does_not_touch_the_probe() {
    let response = get(app_with(StubMode::Fail), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reflects_environment_configuration() {
    let env = |key: &str| match key {
        "PORT" => Some("4000".to_string()),
        "APP_VERSION" => Some("2.3.1".to_string()),
        "ENVIRONMENT" => Some("staging".to_string()),
        _ => None,
    };
    let config = AppConfig::default().with_env(env).unwrap();
    assert_eq!(config.http.port, 4000);

    let app = create_router(AppState::new(config.app));
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "2.3.1");
    assert_eq!(body["environment"], "staging");
}

#[tokio::test]
async fn head_is_served_for_health() {
    let response = send(app_with(StubMode::Ok), Method::HEAD, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_from_host_are_consistent() {
    let app = create_router(AppState::new(info("1.0.0", "development")));
    let response = get(app, "/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");

    let body = body_json(response).await;
    let system = &body["system"];
    let loadavg = system["loadavg"].as_array().unwrap();
    assert_eq!(loadavg.len(), 3);
    assert!(loadavg.iter().all(Value::is_f64));

    let free = system["freemem"].as_u64().unwrap();
    let total = system["totalmem"].as_u64().unwrap();
    assert!(total >= free);

    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
    assert!(body["process_memory_usage"]["rss"].as_u64().unwrap() > 0);
    assert!(body["process_memory_usage"]["virtual_memory"].is_u64());
}

#[tokio::test]
async fn metrics_shape_matches_probe() {
    let body = body_json(get(app_with(StubMode::Ok), "/metrics").await).await;

    assert_eq!(
        body["process_memory_usage"],
        serde_json::json!({ "rss": 10485760, "virtual_memory": 209715200 })
    );
    assert_eq!(
        body["system"],
        serde_json::json!({ "loadavg": [0.42, 0.3, 0.1], "freemem": 512, "totalmem": 2048 })
    );
}

#[tokio::test]
async fn metrics_uptime_counts_from_state_creation() {
    let state = AppState::with_probe(info("1.2.3", "test"), Arc::new(StubProbe { mode: StubMode::Ok }));
    let app = create_router(state.clone());

    let first = body_json(get(app.clone(), "/metrics").await).await["uptime"]
        .as_f64()
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let second = body_json(get(app, "/metrics").await).await["uptime"]
        .as_f64()
        .unwrap();

    assert!(first >= 0.0);
    assert!(second >= first + 0.02, "{first} -> {second}");
    assert!(second <= state.uptime().as_secs_f64());
}

#[tokio::test]
async fn metrics_probe_failure_is_a_500() {
    let response = get(app_with(StubMode::Fail), "/metrics").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: ErrorResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.error, "Internal Server Error");
    assert_eq!(
        body.message.as_deref(),
        Some("System query failed: meminfo unreadable")
    );
    assert_eq!(body.path, None);
}

#[tokio::test]
async fn handler_panic_is_a_500() {
    let response = get(app_with(StubMode::Panic), "/metrics").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "probe exploded");
}

#[tokio::test]
async fn root_echoes_request_headers() {
    let request = Request::builder()
        .uri("/")
        .header("x-forwarded-for", "10.0.0.7")
        .header("user-agent", "kube-probe/1.29")
        .header("authorization", "Bearer not-redacted")
        .body(Body::empty())
        .unwrap();
    let response = app_with(StubMode::Ok).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: RootResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.message, "Hello World from EKS!");
    assert_eq!(body.version, "1.2.3");
    assert_eq!(body.environment, "test");
    assert_eq!(body.hostname, "stub-node-1");
    assert_eq!(body.headers.len(), 3);
    assert_eq!(body.headers["x-forwarded-for"], "10.0.0.7");
    assert_eq!(body.headers["user-agent"], "kube-probe/1.29");
    assert_eq!(body.headers["authorization"], "Bearer not-redacted");
}

#[tokio::test]
async fn root_joins_repeated_cookies_with_semicolons() {
    let request = Request::builder()
        .uri("/")
        .header("cookie", "session=abc")
        .header("cookie", "theme=dark")
        .body(Body::empty())
        .unwrap();
    let response = app_with(StubMode::Ok).oneshot(request).await.unwrap();

    let body = body_json(response).await;
    assert_eq!(body["headers"]["cookie"], "session=abc; theme=dark");
}

#[tokio::test]
async fn root_reports_machine_hostname() {
    let expected = SysinfoProbe::new().hostname().unwrap();
    let app = create_router(AppState::new(info("1.0.0", "development")));

    let body = body_json(get(app, "/").await).await;
    assert_eq!(body["hostname"], expected.as_str());
    assert!(body["headers"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn root_hostname_failure_is_a_500() {
    let response = get(app_with(StubMode::Fail), "/").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["error"], "Internal Server Error");
}

#[tokio::test]
async fn unknown_path_is_a_404_with_path() {
    let response = get(app_with(StubMode::Ok), "/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!({ "error": "Not Found", "path": "/does-not-exist" })
    );
}

#[tokio::test]
async fn not_found_path_excludes_query_string() {
    let response = get(app_with(StubMode::Ok), "/nested/route?debug=1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["path"], "/nested/route");
}

#[tokio::test]
async fn unsupported_method_is_a_404() {
    for (method, path) in [
        (Method::POST, "/health"),
        (Method::DELETE, "/"),
        (Method::PUT, "/metrics"),
    ] {
        let response = send(app_with(StubMode::Ok), method.clone(), path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {path}");

        let body = body_json(response).await;
        assert_eq!(body["error"], "Not Found");
        assert_eq!(body["path"], path);
    }
}
