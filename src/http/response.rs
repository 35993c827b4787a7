//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay the backend's status, body and content-type to the browser
//! - Forward `set-cookie` so rotated sessions reach the browser
//! - Map local failures to a JSON envelope the caller can always parse
//!
//! # Design Decisions
//! - Backend errors (status >= 400) are relayed, never rewritten
//! - Missing upstream content-type defaults to application/json
//! - Each route names its own failure envelope

use axum::{
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::http::error::GatewayError;
use crate::http::invoker::UpstreamResponse;

/// Body returned when a route fails locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// `{ "success": false, "error": <message> }`
    Error,
    /// `{ "user": null }`
    NullUser,
    /// `{ "success": false, "count": 0 }`
    Count,
}

impl Fallback {
    /// JSON body for `err` under this fallback.
    pub fn envelope(self, err: &GatewayError) -> Value {
        match self {
            Fallback::Error => {
                let mut body = json!({ "success": false, "error": err.to_string() });
                if let Some(snippet) = err.snippet() {
                    body["details"] = Value::String(snippet.to_string());
                }
                body
            }
            Fallback::NullUser => json!({ "user": null }),
            Fallback::Count => json!({ "success": false, "count": 0 }),
        }
    }
}

/// Relay an upstream reply unchanged.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = (upstream.status, upstream.body).into_response();
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    append_set_cookie(&mut response, upstream.set_cookie);
    response
}

/// Relay an upstream reply whose body was parsed as JSON.
pub fn relay_json(status: StatusCode, body: Value, set_cookie: Vec<HeaderValue>) -> Response {
    let mut response = (status, Json(body)).into_response();
    append_set_cookie(&mut response, set_cookie);
    response
}

/// Local failure of a route.
pub fn failure(fallback: Fallback, err: &GatewayError) -> Response {
    (err.status(), Json(fallback.envelope(err))).into_response()
}

fn append_set_cookie(response: &mut Response, set_cookie: Vec<HeaderValue>) {
    for cookie in set_cookie {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
}
