//! Page data endpoints.
//!
//! Each endpoint runs the loaders one page needs and answers with their
//! results. They always answer 200: loaders collapse failures to empty
//! values, so a renderer can always draw something.

use axum::{
    extract::{RawQuery, State},
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use url::form_urlencoded;

use crate::http::gateway::Gateway;
use crate::http::request::Inbound;
use crate::loaders::{admin, workers, CurrentUser, PendingPayment, SupportMessage, WorkerView};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    pub featured_workers: Vec<WorkerView>,
}

#[derive(Debug, Serialize)]
pub struct WorkerProfilePage {
    pub worker: Option<WorkerView>,
}

#[derive(Debug, Serialize)]
pub struct ProfilePage {
    pub user: Option<CurrentUser>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminPage {
    pub pending_payments: Vec<PendingPayment>,
    pub support_messages: Vec<SupportMessage>,
    pub client_count: u64,
}

pub fn router() -> Router<Gateway> {
    Router::new()
        .route("/pages/home", get(home))
        .route("/pages/worker-profile", get(worker_profile))
        .route("/pages/profile", get(profile))
        .route("/pages/admin", get(admin_dashboard))
}

/// `limit` from the page query; anything unparseable is ignored.
fn limit_param(query: Option<&str>) -> Option<u32> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "limit")
        .and_then(|(_, value)| value.parse().ok())
}

async fn home(
    State(gateway): State<Gateway>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<HomePage> {
    let inbound = Inbound::from_headers(headers);
    let limit = limit_param(query.as_deref());
    Json(HomePage {
        featured_workers: workers::featured_workers(&gateway, &inbound, limit).await,
    })
}

async fn worker_profile(State(gateway): State<Gateway>, headers: HeaderMap) -> Json<WorkerProfilePage> {
    let inbound = Inbound::from_headers(headers);
    Json(WorkerProfilePage {
        worker: workers::worker_profile(&gateway, &inbound).await,
    })
}

async fn profile(State(gateway): State<Gateway>, headers: HeaderMap) -> Json<ProfilePage> {
    let inbound = Inbound::from_headers(headers);
    Json(ProfilePage {
        user: workers::current_user(&gateway, &inbound).await,
    })
}

async fn admin_dashboard(State(gateway): State<Gateway>, headers: HeaderMap) -> Json<AdminPage> {
    let inbound = Inbound::from_headers(headers);
    let pending_payments = admin::pending_payments(&gateway, &inbound).await;
    let support_messages = admin::support_messages(&gateway, &inbound).await;
    let client_count = admin::client_count(&gateway, &inbound).await;
    Json(AdminPage {
        pending_payments,
        support_messages,
        client_count,
    })
}
