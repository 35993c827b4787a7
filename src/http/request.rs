//! Request identification and inbound request capture.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) unless the caller sent one
//! - Echo it on the response and forward it to the backend
//! - Capture what the gateway forwards from an inbound request
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The inbound request is read-only; forwarding works on a copy

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer,
};

use crate::http::cookies::CookieSet;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Layer assigning `x-request-id` to requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying `x-request-id` onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// The parts of a browser request that may travel upstream.
#[derive(Debug, Clone, Default)]
pub struct Inbound {
    pub headers: HeaderMap,
    /// Values for `{param}` segments of the route's backend path.
    pub params: Vec<(&'static str, String)>,
    pub query: Option<String>,
    pub body: Bytes,
}

impl Inbound {
    /// A bodiless request carrying only `headers`.
    pub fn from_headers(headers: HeaderMap) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    pub fn with_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.params.push((name, value.into()));
        self
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    pub fn cookies(&self) -> CookieSet {
        CookieSet::from_headers(&self.headers)
    }

    pub fn request_id(&self) -> Option<&HeaderValue> {
        self.headers.get(X_REQUEST_ID)
    }

    /// Request ID as text for log fields.
    pub fn request_id_str(&self) -> &str {
        self.request_id()
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}
