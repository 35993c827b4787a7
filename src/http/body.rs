//! Request body adaptation.
//!
//! # Responsibilities
//! - Decide how an inbound body reaches the backend
//! - Keep multipart uploads byte-identical (boundary header included)
//! - Forward JSON text verbatim so numbers and key order survive
//! - Re-serialize only where a route normalizes individual keys

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value};

use crate::http::error::GatewayError;

/// Route-specific rewrite of a JSON object body.
pub type Normalizer = fn(Map<String, Value>) -> Result<Map<String, Value>, GatewayError>;

/// How a route accepts its body.
#[derive(Debug, Clone, Copy)]
pub enum BodyMode {
    /// Nothing is forwarded.
    None,
    /// Text forwarded verbatim as JSON.
    Raw,
    /// Multipart form data only.
    Multipart,
    /// Multipart when declared, otherwise [`BodyMode::Raw`].
    MultipartOrRaw,
    /// Parsed as a JSON object, rewritten, re-serialized.
    Normalized(Normalizer),
}

/// Body as it will be sent upstream.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundBody {
    Empty,
    Json(Bytes),
    Multipart { content_type: HeaderValue, bytes: Bytes },
}

impl OutboundBody {
    /// Content-Type to declare upstream.
    pub fn content_type(&self) -> Option<HeaderValue> {
        match self {
            OutboundBody::Empty => None,
            OutboundBody::Json(_) => Some(HeaderValue::from_static("application/json")),
            OutboundBody::Multipart { content_type, .. } => Some(content_type.clone()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OutboundBody::Empty => 0,
            OutboundBody::Json(bytes) | OutboundBody::Multipart { bytes, .. } => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            OutboundBody::Empty => None,
            OutboundBody::Json(bytes) | OutboundBody::Multipart { bytes, .. } => Some(bytes),
        }
    }
}

/// Inbound `Content-Type` if it declares multipart form data.
pub fn multipart_content_type(headers: &HeaderMap) -> Option<&HeaderValue> {
    headers.get(CONTENT_TYPE).filter(|value| {
        value
            .to_str()
            .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false)
    })
}

/// Shape `body` for the backend according to `mode`.
pub fn adapt(mode: BodyMode, headers: &HeaderMap, body: Bytes) -> Result<OutboundBody, GatewayError> {
    match mode {
        BodyMode::None => Ok(OutboundBody::Empty),
        BodyMode::Raw => Ok(raw(body)),
        BodyMode::Multipart => match multipart_content_type(headers) {
            Some(content_type) => Ok(OutboundBody::Multipart {
                content_type: content_type.clone(),
                bytes: body,
            }),
            None => Err(GatewayError::InvalidBody(
                "Expected multipart/form-data upload".to_string(),
            )),
        },
        BodyMode::MultipartOrRaw => match multipart_content_type(headers) {
            Some(content_type) => Ok(OutboundBody::Multipart {
                content_type: content_type.clone(),
                bytes: body,
            }),
            None => Ok(raw(body)),
        },
        BodyMode::Normalized(normalize) => {
            let object = match serde_json::from_slice::<Value>(&body) {
                Ok(Value::Object(object)) => object,
                _ => return Err(GatewayError::InvalidBody("Invalid JSON body".to_string())),
            };
            let normalized = normalize(object)?;
            let bytes = serde_json::to_vec(&Value::Object(normalized))
                .map_err(|e| GatewayError::InvalidBody(format!("Invalid JSON body: {}", e)))?;
            Ok(OutboundBody::Json(Bytes::from(bytes)))
        }
    }
}

fn raw(body: Bytes) -> OutboundBody {
    if body.is_empty() {
        OutboundBody::Empty
    } else {
        OutboundBody::Json(body)
    }
}
