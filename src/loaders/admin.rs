//! Loaders for the admin dashboard.

use crate::http::gateway::Gateway;
use crate::http::request::Inbound;
use crate::loaders::models::{PendingPayment, SupportMessage};
use crate::loaders::shaping::shape_all;
use crate::loaders::{extract_list, fallback, fetch_json};
use crate::routing::table;

/// Package payments awaiting verification.
pub async fn pending_payments(gateway: &Gateway, inbound: &Inbound) -> Vec<PendingPayment> {
    const LOADER: &str = "pending_payments";

    let Some(reply) = fetch_json(gateway, LOADER, &table::PAYMENTS_PENDING, inbound).await else {
        return Vec::new();
    };
    match extract_list(reply, &["payments", "data"]) {
        Some(items) => shape_all(items),
        None => {
            fallback(LOADER, inbound, "unexpected_shape", &"reply holds no payment list");
            Vec::new()
        }
    }
}

/// Support form submissions.
pub async fn support_messages(gateway: &Gateway, inbound: &Inbound) -> Vec<SupportMessage> {
    const LOADER: &str = "support_messages";

    let Some(reply) = fetch_json(gateway, LOADER, &table::SUPPORT_MESSAGES, inbound).await else {
        return Vec::new();
    };
    match extract_list(reply, &["messages", "data"]) {
        Some(items) => shape_all(items),
        None => {
            fallback(LOADER, inbound, "unexpected_shape", &"reply holds no message list");
            Vec::new()
        }
    }
}

/// Registered clients; 0 when unknown.
pub async fn client_count(gateway: &Gateway, inbound: &Inbound) -> u64 {
    const LOADER: &str = "client_count";

    let Some(reply) = fetch_json(gateway, LOADER, &table::CLIENT_COUNT, inbound).await else {
        return 0;
    };
    match reply.get("count").and_then(|count| count.as_u64()) {
        Some(count) => count,
        None => {
            fallback(LOADER, inbound, "unexpected_shape", &"reply holds no count");
            0
        }
    }
}
