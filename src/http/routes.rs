//! Proxy route handlers.
//!
//! Every handler only captures the inbound request and hands it to the
//! gateway with its [`RouteSpec`]. The one exception is worker-profile,
//! which chains two backend calls.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::HeaderMap,
    response::Response,
    routing::{get, on, MethodFilter, MethodRouter},
    Router,
};

use crate::http::error::GatewayError;
use crate::http::gateway::Gateway;
use crate::http::request::Inbound;
use crate::http::response;
use crate::loaders::workers::{lookup_profile_id, ProfileLookup};
use crate::routing::{table, RouteSpec, Verb};

/// Router with every proxy route under `/api`.
pub fn router() -> Router<Gateway> {
    Router::new()
        .route("/api/current-user", headers_only(&table::CURRENT_USER))
        .route("/api/admin/payments-pending", headers_only(&table::PAYMENTS_PENDING))
        .route("/api/admin/support-messages", headers_only(&table::SUPPORT_MESSAGES))
        .route("/api/admin/verify-payment", with_body(&table::VERIFY_PAYMENT))
        .route("/api/admin/cancel-package", with_body(&table::CANCEL_PACKAGE))
        .route("/api/admin/client-count", headers_only(&table::CLIENT_COUNT))
        .route("/api/admin/workers/{id}/expire", on(MethodFilter::POST, expire_worker))
        .route("/api/admin/workers/{id}", on(MethodFilter::DELETE, delete_worker))
        .route("/api/process-payment", with_body(&table::PROCESS_PAYMENT))
        .route("/api/purchase-package", with_body(&table::PURCHASE_PACKAGE))
        .route("/api/support", with_body(&table::SUPPORT))
        .route("/api/update-worker-profile", with_body(&table::UPDATE_WORKER_PROFILE))
        .route("/api/upload-verification", with_body(&table::UPLOAD_VERIFICATION))
        .route("/api/verify-otp", with_body(&table::VERIFY_OTP))
        .route("/api/forgot-password", with_body(&table::FORGOT_PASSWORD))
        .route("/api/worker-profile", get(worker_profile))
        .route("/api/workers-featured", get(workers_featured))
}

fn method_filter(verb: Verb) -> MethodFilter {
    match verb {
        Verb::Get => MethodFilter::GET,
        Verb::Post => MethodFilter::POST,
        Verb::Delete => MethodFilter::DELETE,
    }
}

/// Route whose inbound request carries nothing but headers.
fn headers_only(spec: &'static RouteSpec) -> MethodRouter<Gateway> {
    on(
        method_filter(spec.method),
        move |State(gateway): State<Gateway>, headers: HeaderMap| async move {
            gateway.forward(spec, Inbound::from_headers(headers)).await
        },
    )
}

/// Route forwarding the inbound body.
fn with_body(spec: &'static RouteSpec) -> MethodRouter<Gateway> {
    on(
        method_filter(spec.method),
        move |State(gateway): State<Gateway>, headers: HeaderMap, body: Bytes| async move {
            gateway
                .forward(spec, Inbound::from_headers(headers).with_body(body))
                .await
        },
    )
}

async fn expire_worker(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let inbound = Inbound::from_headers(headers).with_param("id", id).with_body(body);
    gateway.forward(&table::EXPIRE_WORKER, inbound).await
}

async fn delete_worker(
    State(gateway): State<Gateway>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(headers).with_param("id", id);
    gateway.forward(&table::DELETE_WORKER, inbound).await
}

async fn workers_featured(
    State(gateway): State<Gateway>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    let inbound = Inbound::from_headers(headers).with_query(query);
    gateway.forward(&table::WORKERS_FEATURED, inbound).await
}

/// Current user first, then that user's worker profile.
async fn worker_profile(State(gateway): State<Gateway>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let inbound = Inbound::from_headers(headers);

    let result = async {
        let profile_id = match lookup_profile_id(&gateway, &inbound).await? {
            ProfileLookup::Found(id) => id,
            ProfileLookup::Rejected(upstream) => return Ok(response::relay(upstream)),
            ProfileLookup::Missing => {
                return Err(GatewayError::NotFound(
                    "No worker profile found for the current user".to_string(),
                ))
            }
        };
        tracing::debug!(
            request_id = %inbound.request_id_str(),
            profile_id = %profile_id,
            "Resolved worker profile"
        );

        let second = inbound.clone().with_param("profileId", profile_id);
        let upstream = gateway.call(&table::WORKER_PROFILE, &second).await?;
        Ok::<_, GatewayError>(response::relay(upstream))
    }
    .await;

    gateway.finish(&table::WORKER_PROFILE, &inbound, start, result)
}
