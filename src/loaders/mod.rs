//! Page data loaders.
//!
//! # Data Flow
//! ```text
//! page request (cookies)
//!     → loader (workers.rs / admin.rs)
//!     → Gateway::call with the endpoint's RouteSpec
//!     → JSON → shaping.rs → models.rs view model
//!     → renderer
//! ```
//!
//! # Design Decisions
//! - A loader never fails: every failure collapses to an empty value
//! - Every collapse is logged and counted, so empty pages stay diagnosable
//! - Shaping is idempotent and tolerant of missing fields

pub mod admin;
pub mod models;
pub mod shaping;
pub mod workers;

use serde_json::Value;

use crate::http::gateway::Gateway;
use crate::http::request::Inbound;
use crate::observability::metrics;
use crate::routing::RouteSpec;

pub use models::{CurrentUser, PendingPayment, SupportMessage, WorkerView};

/// Fetch `spec` and parse its JSON body, or `None` after recording why.
pub(crate) async fn fetch_json(
    gateway: &Gateway,
    loader: &'static str,
    spec: &RouteSpec,
    inbound: &Inbound,
) -> Option<Value> {
    match gateway.call(spec, inbound).await {
        Ok(upstream) if upstream.is_success() => match upstream.json::<Value>() {
            Ok(value) => Some(value),
            Err(e) => {
                fallback(loader, inbound, e.kind(), &e);
                None
            }
        },
        Ok(upstream) => {
            fallback(loader, inbound, "status", &upstream.status);
            None
        }
        Err(e) => {
            fallback(loader, inbound, e.kind(), &e);
            None
        }
    }
}

/// Record that `loader` is returning its empty value.
pub(crate) fn fallback(loader: &'static str, inbound: &Inbound, reason: &'static str, detail: &dyn std::fmt::Display) {
    tracing::warn!(
        request_id = %inbound.request_id_str(),
        loader,
        reason,
        detail = %detail,
        "Loader returning empty result"
    );
    metrics::record_loader_fallback(loader, reason);
}

/// The record array of a list reply: either the reply itself or the first
/// of `keys` holding an array.
pub fn extract_list(value: Value, keys: &[&str]) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(mut object) => keys.iter().find_map(|key| match object.remove(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        }),
        _ => None,
    }
}
