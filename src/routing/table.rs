//! The gateway's route table.
//!
//! Each entry is the complete forwarding contract of one proxy route. The
//! generic forwarder in `http::gateway` reads nothing else.

use axum::http::Method;
use serde_json::{Map, Value};

use crate::http::body::BodyMode;
use crate::http::error::GatewayError;
use crate::http::response::Fallback;

// Literal fallback bases, used only when neither the environment nor the
// config names a backend. They differ per route in the deployed frontend;
// see DESIGN.md before consolidating them.
pub const LOCALHOST_5000: &str = "http://localhost:5000";
pub const LOOPBACK_5000: &str = "http://127.0.0.1:5000";
pub const LOCALHOST_8000: &str = "http://localhost:8000";

/// Upstream HTTP method. Kept `Copy` so specs stay plain static data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Delete,
}

impl Verb {
    pub fn as_method(self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Delete => Method::DELETE,
        }
    }
}

/// How the upstream reply is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyMode {
    /// Raw text body, original status and content-type.
    Relay,
    /// Body must parse as JSON; it is re-serialized before relaying.
    RequireJson,
}

/// What part of the inbound query reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    None,
    /// Forward every inbound pair, adding `key=value` when `key` is absent.
    WithDefault {
        key: &'static str,
        value: &'static str,
    },
}

/// Forwarding contract of one route.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    /// Identifier for logs, metrics and `backend.route_fallbacks`.
    pub name: &'static str,
    pub method: Verb,
    /// Backend path below `/api/`; `{param}` segments are substituted.
    pub upstream: &'static str,
    /// Relay the browser's cookies.
    pub cookies: bool,
    pub body: BodyMode,
    pub reply: ReplyMode,
    pub query: QueryMode,
    /// Envelope returned on local failure.
    pub fallback: Fallback,
    pub fallback_base: &'static str,
    /// Log request/response diagnostics at info level.
    pub verbose: bool,
}

const fn get(name: &'static str, upstream: &'static str, fallback_base: &'static str) -> RouteSpec {
    RouteSpec {
        name,
        method: Verb::Get,
        upstream,
        cookies: true,
        body: BodyMode::None,
        reply: ReplyMode::Relay,
        query: QueryMode::None,
        fallback: Fallback::Error,
        fallback_base,
        verbose: false,
    }
}

const fn post(name: &'static str, upstream: &'static str, fallback_base: &'static str) -> RouteSpec {
    RouteSpec {
        name,
        method: Verb::Post,
        upstream,
        cookies: true,
        body: BodyMode::Raw,
        reply: ReplyMode::Relay,
        query: QueryMode::None,
        fallback: Fallback::Error,
        fallback_base,
        verbose: false,
    }
}

pub static CURRENT_USER: RouteSpec = RouteSpec {
    fallback: Fallback::NullUser,
    ..get("current-user", "current-user", LOCALHOST_5000)
};

pub static PAYMENTS_PENDING: RouteSpec =
    get("admin/payments-pending", "admin/payments-pending", LOCALHOST_5000);

pub static SUPPORT_MESSAGES: RouteSpec =
    get("admin/support-messages", "admin/support-messages", LOCALHOST_5000);

pub static VERIFY_PAYMENT: RouteSpec =
    post("admin/verify-payment", "admin/verify-payment", LOCALHOST_5000);

pub static CANCEL_PACKAGE: RouteSpec = RouteSpec {
    verbose: true,
    ..post("admin/cancel-package", "admin/cancel-package", LOCALHOST_5000)
};

pub static CLIENT_COUNT: RouteSpec = RouteSpec {
    fallback: Fallback::Count,
    ..get("admin/client-count", "admin/client-count", LOCALHOST_5000)
};

pub static EXPIRE_WORKER: RouteSpec =
    post("admin/workers/expire", "admin/workers/{id}/expire", LOCALHOST_5000);

pub static DELETE_WORKER: RouteSpec = RouteSpec {
    method: Verb::Delete,
    ..get("admin/workers/delete", "admin/workers/{id}", LOCALHOST_5000)
};

pub static PROCESS_PAYMENT: RouteSpec = RouteSpec {
    reply: ReplyMode::RequireJson,
    ..post("process-payment", "process-payment", LOCALHOST_5000)
};

pub static PURCHASE_PACKAGE: RouteSpec =
    post("purchase-package", "purchase-package", LOCALHOST_5000);

pub static SUPPORT: RouteSpec = RouteSpec {
    cookies: false,
    ..post("support", "support", LOOPBACK_5000)
};

pub static UPDATE_WORKER_PROFILE: RouteSpec = RouteSpec {
    body: BodyMode::MultipartOrRaw,
    ..post("update-worker-profile", "update-worker-profile", LOCALHOST_8000)
};

pub static UPLOAD_VERIFICATION: RouteSpec = RouteSpec {
    body: BodyMode::Multipart,
    reply: ReplyMode::RequireJson,
    ..post("upload-verification", "upload-verification", LOCALHOST_8000)
};

pub static VERIFY_OTP: RouteSpec = RouteSpec {
    cookies: false,
    ..post("verify-otp", "verify-otp", LOOPBACK_5000)
};

pub static FORGOT_PASSWORD: RouteSpec = RouteSpec {
    cookies: false,
    body: BodyMode::Normalized(normalize_forgot_password),
    reply: ReplyMode::RequireJson,
    verbose: true,
    ..post("forgot-password", "forgot-password", LOOPBACK_5000)
};

/// Second hop of the worker-profile chain; the first is [`CURRENT_USER`].
pub static WORKER_PROFILE: RouteSpec =
    get("worker-profile", "workers/{profileId}", LOCALHOST_5000);

pub static WORKERS_FEATURED: RouteSpec = RouteSpec {
    query: QueryMode::WithDefault {
        key: "limit",
        value: "6",
    },
    ..get("workers-featured", "workers-featured", LOCALHOST_8000)
};

/// Every route, for lookups by name.
pub static ALL: &[&RouteSpec] = &[
    &CURRENT_USER,
    &PAYMENTS_PENDING,
    &SUPPORT_MESSAGES,
    &VERIFY_PAYMENT,
    &CANCEL_PACKAGE,
    &CLIENT_COUNT,
    &EXPIRE_WORKER,
    &DELETE_WORKER,
    &PROCESS_PAYMENT,
    &PURCHASE_PACKAGE,
    &SUPPORT,
    &UPDATE_WORKER_PROFILE,
    &UPLOAD_VERIFICATION,
    &VERIFY_OTP,
    &FORGOT_PASSWORD,
    &WORKER_PROFILE,
    &WORKERS_FEATURED,
];

/// Look a route up by its name.
pub fn by_name(name: &str) -> Option<&'static RouteSpec> {
    ALL.iter().copied().find(|spec| spec.name == name)
}

/// The password-reset request must carry a non-blank email; it is trimmed
/// before it reaches the backend.
fn normalize_forgot_password(mut body: Map<String, Value>) -> Result<Map<String, Value>, GatewayError> {
    let email = body
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .ok_or_else(|| GatewayError::InvalidBody("Email is required".to_string()))?;

    body.insert("email".to_string(), Value::String(email));
    Ok(body)
}
