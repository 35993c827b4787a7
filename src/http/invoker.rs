//! Outbound calls to the backend.
//!
//! # Responsibilities
//! - Perform exactly one upstream request per call (no retries)
//! - Read the whole reply as text; never assume JSON
//! - Keep the headers the translator needs (`content-type`, `set-cookie`)
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by all handlers
//! - Status >= 400 is a result, only transport failures are errors
//! - No overall request timeout; the hosting layer bounds the request

use std::time::Duration;

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE, COOKIE, SET_COOKIE},
    HeaderValue, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::TimeoutConfig;
use crate::http::body::OutboundBody;
use crate::http::error::GatewayError;
use crate::http::request::X_REQUEST_ID;

/// Everything needed for one upstream request.
#[derive(Debug)]
pub struct UpstreamCall {
    pub method: Method,
    pub url: Url,
    /// Serialized cookie header; `None` or empty sends no `Cookie`.
    pub cookie: Option<String>,
    pub body: OutboundBody,
    pub request_id: Option<HeaderValue>,
}

/// The backend's reply, fully buffered.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
    pub content_type: Option<HeaderValue>,
    pub set_cookie: Vec<HeaderValue>,
}

impl UpstreamResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GatewayError> {
        serde_json::from_str(&self.body).map_err(|_| GatewayError::invalid_json(&self.body))
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Shared upstream HTTP client.
#[derive(Clone)]
pub struct ProxyInvoker {
    client: reqwest::Client,
}

impl ProxyInvoker {
    /// Build the pooled client.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if timeouts.connect_secs > 0 {
            builder = builder.connect_timeout(Duration::from_secs(timeouts.connect_secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Perform one upstream call.
    pub async fn invoke(&self, call: UpstreamCall) -> Result<UpstreamResponse, GatewayError> {
        let mut request = self
            .client
            .request(call.method, call.url)
            .header(ACCEPT, "application/json");

        if let Some(cookie) = call.cookie.filter(|c| !c.is_empty()) {
            request = request.header(COOKIE, cookie);
        }
        if let Some(request_id) = call.request_id {
            request = request.header(X_REQUEST_ID, request_id);
        }
        if let Some(content_type) = call.body.content_type() {
            request = request.header(CONTENT_TYPE, content_type);
        }
        if let Some(bytes) = call.body.into_bytes() {
            request = request.body(bytes);
        }

        let response = request.send().await?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .cloned()
            .collect();
        let body = response.text().await?;

        Ok(UpstreamResponse {
            status,
            body,
            content_type,
            set_cookie,
        })
    }
}
