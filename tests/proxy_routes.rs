//! End-to-end tests for the proxy routes: browser → gateway → mock backend.

use axum::http::Method;
use reqwest::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use serde_json::{json, Value};

use easy_gateway::config;

mod common;
use common::{Reply, TestGateway};

async fn gateway_to_unreachable() -> TestGateway {
    common::start_gateway(common::config_for(&common::unreachable_url().await)).await
}

#[tokio::test]
async fn test_cookies_are_joined_in_order() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "user": { "_id": "u1" } }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/current-user"))
        .header(COOKIE, "session=abc; theme=dark")
        .header(COOKIE, "lang=ar")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let seen = backend.last();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/api/current-user");
    assert_eq!(seen.cookie.as_deref(), Some("session=abc; theme=dark; lang=ar"));
}

#[tokio::test]
async fn test_no_cookie_header_without_cookies() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "payments": [] }))).await;
    let gateway = common::gateway_for(&backend).await;

    common::client()
        .get(gateway.url("/api/admin/payments-pending"))
        .send()
        .await
        .unwrap();

    assert_eq!(backend.last().cookie, None);
}

#[tokio::test]
async fn test_public_routes_drop_cookies() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    for path in ["/api/support", "/api/verify-otp"] {
        let res = common::client()
            .post(gateway.url(path))
            .header(COOKIE, "session=abc")
            .header(CONTENT_TYPE, "application/json")
            .body(r#"{"x":1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(backend.last().cookie, None, "{} leaked cookies", path);
    }
}

#[tokio::test]
async fn test_backend_errors_pass_through() {
    let backend = common::start_fixed_backend(Reply::json(
        403,
        json!({ "success": false, "error": "Admins only" }),
    ))
    .await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/admin/support-messages"))
        .header(COOKIE, "session=worker")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Admins only" }));
}

#[tokio::test]
async fn test_non_json_error_page_is_relayed_verbatim() {
    let backend = common::start_fixed_backend(Reply::text(502, "<html>bad gateway</html>")).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/purchase-package"))
        .body(r#"{"package":"gold"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/html");
    assert_eq!(res.text().await.unwrap(), "<html>bad gateway</html>");
}

#[tokio::test]
async fn test_unreachable_backend_yields_error_envelope() {
    let gateway = gateway_to_unreachable().await;

    let res = common::client()
        .post(gateway.url("/api/purchase-package"))
        .body(r#"{"package":"gold"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Proxy error"));
}

#[tokio::test]
async fn test_current_user_failure_reads_as_signed_out() {
    let gateway = gateway_to_unreachable().await;

    let res = common::client()
        .get(gateway.url("/api/current-user"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn test_signed_out_current_user_is_relayed() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "user": null }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/current-user"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "user": null }));
    assert_eq!(backend.last().cookie, None);
}

#[tokio::test]
async fn test_client_count_failure_reads_as_zero() {
    let gateway = gateway_to_unreachable().await;

    let res = common::client()
        .get(gateway.url("/api/admin/client-count"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "count": 0 }));
}

#[tokio::test]
async fn test_purchase_package_relays_created() {
    let backend = common::start_fixed_backend(Reply::json(
        201,
        json!({ "success": true, "paymentId": "p1" }),
    ))
    .await;
    let gateway = common::gateway_for(&backend).await;

    let payload = r#"{"package":"gold","receipt":"r-17"}"#;
    let res = common::client()
        .post(gateway.url("/api/purchase-package"))
        .header(COOKIE, "session=abc")
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": true, "paymentId": "p1" }));

    let seen = backend.last();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/api/purchase-package");
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(&seen.body[..], payload.as_bytes());
}

#[tokio::test]
async fn test_admin_actions_on_workers() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/admin/workers/w%207/expire"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let seen = backend.last();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/api/admin/workers/w%207/expire");

    let res = common::client()
        .delete(gateway.url("/api/admin/workers/w8"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let seen = backend.last();
    assert_eq!(seen.method, Method::DELETE);
    assert_eq!(seen.path, "/api/admin/workers/w8");
}

#[tokio::test]
async fn test_workers_featured_default_limit() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "workers": [] }))).await;
    let gateway = common::gateway_for(&backend).await;

    common::client()
        .get(gateway.url("/api/workers-featured"))
        .send()
        .await
        .unwrap();
    let seen = backend.last();
    assert_eq!(seen.path, "/api/workers-featured");
    assert_eq!(seen.query.as_deref(), Some("limit=6"));

    common::client()
        .get(gateway.url("/api/workers-featured?limit=3&city=Giza"))
        .send()
        .await
        .unwrap();
    assert_eq!(backend.last().query.as_deref(), Some("limit=3&city=Giza"));
}

#[tokio::test]
async fn test_multipart_upload_is_forwarded_byte_for_byte() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true, "status": "pending" }))).await;
    let gateway = common::gateway_for(&backend).await;

    let content_type = "multipart/form-data; boundary=----easyboundary";
    let mut body = b"------easyboundary\r\nContent-Disposition: form-data; name=\"idFront\"; filename=\"id.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
    body.extend_from_slice(&[0xff, 0xd8, 0xff, 0x00, 0x10, 0x80, 0xfe]);
    body.extend_from_slice(b"\r\n------easyboundary--\r\n");

    let res = common::client()
        .post(gateway.url("/api/upload-verification"))
        .header(COOKIE, "session=abc")
        .header(CONTENT_TYPE, content_type)
        .body(body.clone())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let reply: Value = res.json().await.unwrap();
    assert_eq!(reply["status"], "pending");

    let seen = backend.last();
    assert_eq!(seen.content_type.as_deref(), Some(content_type));
    assert_eq!(&seen.body[..], &body[..]);
    assert_eq!(seen.cookie.as_deref(), Some("session=abc"));
}

#[tokio::test]
async fn test_upload_verification_requires_multipart() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/upload-verification"))
        .header(CONTENT_TYPE, "application/json")
        .body("{}")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_update_worker_profile_accepts_json_too() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/update-worker-profile"))
        .header(CONTENT_TYPE, "application/json")
        .body(r#"{"city":"Alexandria"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let seen = backend.last();
    assert_eq!(seen.content_type.as_deref(), Some("application/json"));
    assert_eq!(seen.json(), json!({ "city": "Alexandria" }));
}

#[tokio::test]
async fn test_set_cookie_is_relayed() {
    let backend = common::start_fixed_backend(
        Reply::json(200, json!({ "success": true }))
            .with_cookie("session=fresh; Path=/; HttpOnly")
            .with_cookie("otp=done; Path=/"),
    )
    .await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/verify-otp"))
        .body(r#"{"code":"123456"}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let cookies: Vec<_> = res
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(cookies, vec!["session=fresh; Path=/; HttpOnly", "otp=done; Path=/"]);
}

#[tokio::test]
async fn test_process_payment_rejects_non_json_reply() {
    let backend = common::start_fixed_backend(Reply::text(200, "<html>maintenance</html>")).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/process-payment"))
        .body(r#"{"amount":100}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid JSON response from backend");
    assert_eq!(body["details"], "<html>maintenance</html>");
}

#[tokio::test]
async fn test_forgot_password_normalizes_email() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/forgot-password"))
        .header(COOKIE, "session=abc")
        .body(r#"{"email":"  amina@easy.test  "}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let seen = backend.last();
    assert_eq!(seen.json(), json!({ "email": "amina@easy.test" }));
    assert_eq!(seen.cookie, None);
}

#[tokio::test]
async fn test_forgot_password_requires_email() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .post(gateway.url("/api/forgot-password"))
        .body(r#"{"email":"   "}"#)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Email is required" }));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_worker_profile_chains_two_calls() {
    let backend = common::start_backend(|req| match req.path.as_str() {
        "/api/current-user" => Reply::json(200, json!({ "user": { "_id": "u1", "profileId": "w42" } })),
        "/api/workers/w42" => Reply::json(200, json!({ "worker": { "_id": "w42", "name": "Omar" } })),
        _ => Reply::json(404, json!({ "success": false })),
    })
    .await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/worker-profile"))
        .header(COOKIE, "session=abc")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["worker"]["name"], "Omar");

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].path, "/api/current-user");
    assert_eq!(requests[1].path, "/api/workers/w42");
    assert_eq!(requests[1].cookie.as_deref(), Some("session=abc"));
}

#[tokio::test]
async fn test_worker_profile_without_profile_is_not_found() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "user": { "_id": "u1", "role": "client" } }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/worker-profile"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_worker_profile_relays_signed_out() {
    let backend = common::start_fixed_backend(Reply::json(401, json!({ "success": false, "error": "Not signed in" }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/worker-profile"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 401);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Not signed in");
}

#[tokio::test]
async fn test_request_id_reaches_backend() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "count": 3 }))).await;
    let gateway = common::gateway_for(&backend).await;

    let res = common::client()
        .get(gateway.url("/api/admin/client-count"))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "trace-me");
    assert_eq!(backend.last().request_id.as_deref(), Some("trace-me"));
}

#[tokio::test]
async fn test_config_swap_applies_to_next_call() {
    let first = common::start_fixed_backend(Reply::json(200, json!({ "count": 1 }))).await;
    let second = common::start_fixed_backend(Reply::json(200, json!({ "count": 2 }))).await;

    let shared = config::shared(common::config_for(&first.url()));
    let server = easy_gateway::HttpServer::new(shared.clone()).unwrap();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = easy_gateway::Shutdown::new();
    let signal = shutdown.signal();
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    let url = format!("http://{}/api/admin/client-count", addr);
    let body: Value = common::client().get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["count"], 1);

    shared.store(std::sync::Arc::new(common::config_for(&second.url())));
    let body: Value = common::client().get(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["count"], 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let backend = common::start_fixed_backend(Reply::json(200, json!({ "success": true }))).await;
    let mut config = common::config_for(&backend.url());
    config.security.max_body_size = 16;
    let gateway = common::start_gateway(config).await;

    let res = common::client()
        .post(gateway.url("/api/support"))
        .body(vec![b'a'; 64])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 413);
    assert!(backend.requests().is_empty());
}
