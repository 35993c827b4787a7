//! Loaders for worker-facing and public pages.

use serde_json::Value;

use crate::http::error::GatewayError;
use crate::http::gateway::Gateway;
use crate::http::invoker::UpstreamResponse;
use crate::http::request::Inbound;
use crate::loaders::models::{CurrentUser, WorkerView};
use crate::loaders::shaping::{shape, shape_all};
use crate::loaders::{extract_list, fallback, fetch_json};
use crate::routing::table;

/// Outcome of deriving the signed-in worker's profile ID.
#[derive(Debug)]
pub enum ProfileLookup {
    Found(String),
    /// Signed out, or signed in without a worker profile.
    Missing,
    /// The current-user call answered with a non-success status.
    Rejected(UpstreamResponse),
}

/// First hop of the worker-profile chain.
pub async fn lookup_profile_id(gateway: &Gateway, inbound: &Inbound) -> Result<ProfileLookup, GatewayError> {
    let upstream = gateway.call(&table::CURRENT_USER, inbound).await?;
    if !upstream.is_success() {
        return Ok(ProfileLookup::Rejected(upstream));
    }
    let reply: Value = upstream.json()?;
    Ok(match current_user_from(reply).and_then(|user| user.worker_profile_id()) {
        Some(id) => ProfileLookup::Found(id),
        None => ProfileLookup::Missing,
    })
}

/// Pull the user out of a current-user reply (`{ "user": ... }` or bare).
pub fn current_user_from(reply: Value) -> Option<CurrentUser> {
    match reply {
        Value::Object(mut object) if object.contains_key("user") => {
            object.remove("user").and_then(shape)
        }
        Value::Object(object) if object.contains_key("id") || object.contains_key("_id") => {
            shape(Value::Object(object))
        }
        _ => None,
    }
}

/// The signed-in account, or `None` when signed out or on any failure.
pub async fn current_user(gateway: &Gateway, inbound: &Inbound) -> Option<CurrentUser> {
    let reply = fetch_json(gateway, "current_user", &table::CURRENT_USER, inbound).await?;
    current_user_from(reply)
}

/// Workers for the home page carousel. `limit` defaults to the backend
/// route's default of 6.
pub async fn featured_workers(gateway: &Gateway, inbound: &Inbound, limit: Option<u32>) -> Vec<WorkerView> {
    const LOADER: &str = "featured_workers";

    let inbound = inbound.clone().with_query(limit.map(|l| format!("limit={}", l)));
    let Some(reply) = fetch_json(gateway, LOADER, &table::WORKERS_FEATURED, &inbound).await else {
        return Vec::new();
    };
    match extract_list(reply, &["workers", "data"]) {
        Some(items) => shape_all(items),
        None => {
            fallback(LOADER, &inbound, "unexpected_shape", &"reply holds no worker list");
            Vec::new()
        }
    }
}

/// The signed-in worker's own profile.
pub async fn worker_profile(gateway: &Gateway, inbound: &Inbound) -> Option<WorkerView> {
    const LOADER: &str = "worker_profile";

    let profile_id = match lookup_profile_id(gateway, inbound).await {
        Ok(ProfileLookup::Found(id)) => id,
        Ok(ProfileLookup::Missing) => {
            fallback(LOADER, inbound, "no_profile", &"current user has no worker profile");
            return None;
        }
        Ok(ProfileLookup::Rejected(upstream)) => {
            fallback(LOADER, inbound, "status", &upstream.status);
            return None;
        }
        Err(e) => {
            fallback(LOADER, inbound, e.kind(), &e);
            return None;
        }
    };

    let inbound = Inbound::from_headers(inbound.headers.clone()).with_param("profileId", profile_id);
    let reply = fetch_json(gateway, LOADER, &table::WORKER_PROFILE, &inbound).await?;
    let record = match reply {
        Value::Object(mut object) if object.contains_key("worker") => object.remove("worker")?,
        other => other,
    };
    let worker = shape(record);
    if worker.is_none() {
        fallback(LOADER, &inbound, "unexpected_shape", &"reply holds no worker record");
    }
    worker
}
