//! Shared utilities for integration tests.
//!
//! Backends and gateways bind `127.0.0.1:0`, so tests can run in parallel
//! without port bookkeeping.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use easy_gateway::config::{self, GatewayConfig};
use easy_gateway::{HttpServer, Shutdown};

/// Env var no test sets, so config values decide the backend URL.
pub const UNSET_BACKEND_ENV: &str = "EASY_GATEWAY_IT_BACKEND_URL_UNSET";

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub content_type: Option<String>,
    pub request_id: Option<String>,
    pub body: Bytes,
}

impl Captured {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// What the mock backend answers.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub content_type: Option<&'static str>,
    pub set_cookie: Vec<&'static str>,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: Some("application/json"),
            set_cookie: Vec::new(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            content_type: Some("text/html"),
            set_cookie: Vec::new(),
        }
    }

    pub fn with_cookie(mut self, cookie: &'static str) -> Self {
        self.set_cookie.push(cookie);
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap();
        let mut response = (status, self.body).into_response();
        match self.content_type {
            Some(content_type) => {
                response
                    .headers_mut()
                    .insert(header::CONTENT_TYPE, content_type.parse().unwrap());
            }
            None => {
                response.headers_mut().remove(header::CONTENT_TYPE);
            }
        }
        for cookie in self.set_cookie {
            response
                .headers_mut()
                .append(header::SET_COOKIE, cookie.parse().unwrap());
        }
        response
    }
}

/// A running mock backend and everything it received.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Captured>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Captured {
        self.requests().pop().expect("backend saw no request")
    }
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Start a backend answering every request with `f(&captured)`.
pub async fn start_backend<F>(f: F) -> MockBackend
where
    F: Fn(&Captured) -> Reply + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let log = requests.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let log = log.clone();
            let f = f.clone();
            async move {
                let captured = Captured {
                    method,
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    cookie: header_text(&headers, header::COOKIE),
                    content_type: header_text(&headers, header::CONTENT_TYPE),
                    request_id: header_text(&headers, header::HeaderName::from_static("x-request-id")),
                    body,
                };
                let reply = f(&captured);
                log.lock().unwrap().push(captured);
                reply
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, requests }
}

/// Start a backend that always answers `reply`.
pub async fn start_fixed_backend(reply: Reply) -> MockBackend {
    start_backend(move |_| reply.clone()).await
}

/// A URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Config pointing every route at `backend_url`.
pub fn config_for(backend_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.backend.base_url_env = UNSET_BACKEND_ENV.into();
    config.backend.base_url = Some(backend_url.to_string());
    config
}

/// A gateway serving on an ephemeral port.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let server = HttpServer::new(config::shared(config)).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    TestGateway { addr, shutdown }
}

/// Gateway in front of `backend`.
pub async fn gateway_for(backend: &MockBackend) -> TestGateway {
    start_gateway(config_for(&backend.url())).await
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
