//! A stand-in EASY backend for running the gateway locally.
//!
//! ```text
//! cargo run --example mock_backend
//! BACKEND_URL=http://127.0.0.1:5000 cargo run
//! ```

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};

fn signed_in(headers: &HeaderMap) -> bool {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.contains("session="))
}

async fn current_user(headers: HeaderMap) -> Json<Value> {
    if !signed_in(&headers) {
        return Json(json!({ "user": null }));
    }
    Json(json!({
        "user": { "_id": "u1", "name": "Omar", "role": "admin", "profileId": "w1" }
    }))
}

async fn featured() -> Json<Value> {
    Json(json!({
        "success": true,
        "workers": [
            { "_id": "w1", "name": "Omar", "profession": "Electrician", "city": "Cairo", "rating": 4.8 },
            { "_id": "w2", "name": "Laila", "profession": "Plumber", "city": "Giza", "rating": "4.6" }
        ]
    }))
}

async fn worker(Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "success": true, "worker": { "_id": id, "name": "Omar", "isVerified": true } }))
}

async fn ok(body: Bytes) -> Json<Value> {
    let received = serde_json::from_slice::<Value>(&body).ok();
    Json(json!({ "success": true, "received": received }))
}

async fn verify_otp() -> impl IntoResponse {
    (
        [(SET_COOKIE, "session=demo; Path=/; HttpOnly")],
        Json(json!({ "success": true })),
    )
}

#[tokio::main]
async fn main() {
    let app = Router::new()
        .route("/api/current-user", get(current_user))
        .route("/api/workers-featured", get(featured))
        .route("/api/workers/{id}", get(worker))
        .route("/api/admin/payments-pending", get(|| async {
            Json(json!({ "payments": [{ "_id": "p1", "workerName": "Omar", "amount": 250, "status": "pending" }] }))
        }))
        .route("/api/admin/support-messages", get(|| async {
            Json(json!({ "messages": [{ "_id": "m1", "email": "amina@easy.test", "message": "Hello" }] }))
        }))
        .route("/api/admin/client-count", get(|| async { Json(json!({ "success": true, "count": 42 })) }))
        .route("/api/admin/workers/{id}/expire", post(ok))
        .route("/api/admin/workers/{id}", delete(|| async { Json(json!({ "success": true })) }))
        .route("/api/admin/verify-payment", post(ok))
        .route("/api/admin/cancel-package", post(ok))
        .route("/api/process-payment", post(ok))
        .route("/api/purchase-package", post(|body: Bytes| async move {
            (StatusCode::CREATED, ok(body).await)
        }))
        .route("/api/support", post(ok))
        .route("/api/update-worker-profile", post(|| async { Json(json!({ "success": true })) }))
        .route("/api/upload-verification", post(|| async { Json(json!({ "success": true, "status": "pending" })) }))
        .route("/api/verify-otp", post(verify_otp))
        .route("/api/forgot-password", post(ok));

    let addr = SocketAddr::from(([127, 0, 0, 1], 5000));
    println!("Mock EASY backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
