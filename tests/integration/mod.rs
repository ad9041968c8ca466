//! Integration tests for the API server.
//!
//! Each test boots the real server on an ephemeral port and talks to it over
//! HTTP.

use std::net::SocketAddr;

use api_template::api::AppState;
use api_template::config::Config;
use api_template::server::serve_with_shutdown;
use api_template::{ResponseBody, Status, Timestamp};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<api_template::Result<()>>,
}

impl TestServer {
    async fn start(config: Config) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve_with_shutdown(listener, AppState::new(config), async {
            rx.await.ok();
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_health_end_to_end() {
    let server = TestServer::start(Config::default()).await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );

    let body: ResponseBody<Value> = response.json().await.unwrap();
    assert_eq!(body.status, Status::Healthy);
    assert_eq!(body.status_code, 200);
    assert_eq!(body.message, "API Template");
    assert_eq!(
        body.payload,
        Some(json!({"version": "1.0.0", "endpoints": {"health": "/health", "api": "/api"}}))
    );

    let age = Timestamp::now().as_datetime() - body.timestamp.as_datetime();
    assert!(age.num_seconds() < 5, "stale timestamp: {}", body.timestamp);

    server.stop().await;
}

#[tokio::test]
async fn test_api_tree_end_to_end() {
    let server = TestServer::start(Config::default()).await;
    let client = reqwest::Client::new();

    for (path, status) in [
        ("/", Status::Ok),
        ("/api", Status::Ok),
        ("/api/v1", Status::Ok),
        ("/api/v1/health", Status::Healthy),
        ("/api/v1/info", Status::Ok),
    ] {
        let response = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK, "{path}");
        let body: ResponseBody<Value> = response.json().await.unwrap();
        assert_eq!(body.status, status, "{path}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_not_found_end_to_end() {
    let server = TestServer::start(Config::default()).await;

    let response = reqwest::get(server.url("/nope?trace=1")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], json!("error"));
    assert_eq!(body["statusCode"], json!(404));
    assert_eq!(body["message"], json!("The requested resource was not found"));
    assert_eq!(body["payload"], json!({"path": "/nope?trace=1"}));
    assert!(Timestamp::parse(body["timestamp"].as_str().unwrap()).is_some());

    server.stop().await;
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let server = TestServer::start(Config::default()).await;

    let response = reqwest::Client::new()
        .request(reqwest::Method::OPTIONS, server.url("/api"))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "GET")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("access-control-allow-origin"));

    server.stop().await;
}
