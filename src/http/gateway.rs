//! The generic forwarder behind every proxy route.
//!
//! # Data Flow
//! ```text
//! Inbound (headers, params, query, body) + RouteSpec
//!     → target.rs   resolve upstream URL from the live config
//!     → cookies.rs  serialize the session cookies (if the route relays them)
//!     → body.rs     shape the payload
//!     → invoker.rs  one upstream call
//!     → response.rs relay, or the route's fallback envelope
//! ```

use std::time::Instant;

use axum::response::Response;
use serde_json::Value;

use crate::config::SharedConfig;
use crate::http::body;
use crate::http::error::{snippet, GatewayError};
use crate::http::invoker::{ProxyInvoker, UpstreamCall, UpstreamResponse};
use crate::http::request::Inbound;
use crate::http::response;
use crate::http::target;
use crate::observability::metrics;
use crate::routing::{ReplyMode, RouteSpec};

/// Shared forwarding machinery, cloned into every handler.
#[derive(Clone)]
pub struct Gateway {
    config: SharedConfig,
    invoker: ProxyInvoker,
}

impl Gateway {
    pub fn new(config: SharedConfig, invoker: ProxyInvoker) -> Self {
        Self { config, invoker }
    }

    /// Perform the upstream call described by `spec` for `inbound`.
    ///
    /// Any status the backend answers with is `Ok`.
    pub async fn call(&self, spec: &RouteSpec, inbound: &Inbound) -> Result<UpstreamResponse, GatewayError> {
        let url = {
            let config = self.config.load();
            let params: Vec<(&str, &str)> = inbound
                .params
                .iter()
                .map(|(name, value)| (*name, value.as_str()))
                .collect();
            target::resolve(&config, spec, &params, inbound.query.as_deref())?
        };
        let body = body::adapt(spec.body, &inbound.headers, inbound.body.clone())?;
        let cookie = spec.cookies.then(|| inbound.cookies().header_value());

        if spec.verbose {
            tracing::info!(
                request_id = %inbound.request_id_str(),
                route = spec.name,
                url = %url,
                body_bytes = body.len(),
                has_cookie = cookie.as_deref().is_some_and(|c| !c.is_empty()),
                "Forwarding request"
            );
        } else {
            tracing::debug!(
                request_id = %inbound.request_id_str(),
                route = spec.name,
                url = %url,
                "Forwarding request"
            );
        }

        let upstream = self
            .invoker
            .invoke(UpstreamCall {
                method: spec.method.as_method(),
                url,
                cookie,
                body,
                request_id: inbound.request_id().cloned(),
            })
            .await?;

        if spec.verbose {
            tracing::info!(
                request_id = %inbound.request_id_str(),
                route = spec.name,
                status = upstream.status.as_u16(),
                content_type = ?upstream.content_type,
                body = %snippet(&upstream.body),
                "Backend replied"
            );
        }

        Ok(upstream)
    }

    /// Forward `inbound` according to `spec` and translate the outcome.
    pub async fn forward(&self, spec: &RouteSpec, inbound: Inbound) -> Response {
        let start = Instant::now();
        let result = match self.call(spec, &inbound).await {
            Ok(upstream) => translate(spec, upstream),
            Err(e) => Err(e),
        };
        self.finish(spec, &inbound, start, result)
    }

    /// Turn a route outcome into the browser response, recording it.
    pub fn finish(
        &self,
        spec: &RouteSpec,
        inbound: &Inbound,
        start: Instant,
        result: Result<Response, GatewayError>,
    ) -> Response {
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                if e.status().is_server_error() {
                    tracing::error!(
                        request_id = %inbound.request_id_str(),
                        route = spec.name,
                        kind = e.kind(),
                        error = %e,
                        "Route failed"
                    );
                } else {
                    tracing::warn!(
                        request_id = %inbound.request_id_str(),
                        route = spec.name,
                        kind = e.kind(),
                        error = %e,
                        "Route rejected request"
                    );
                }
                metrics::record_upstream_failure(spec.name, e.kind());
                response::failure(spec.fallback, &e)
            }
        };

        metrics::record_request(spec.name, spec.method.as_method().as_str(), response.status().as_u16(), start);
        response
    }
}

/// Map a successful upstream call to the browser response.
pub fn translate(spec: &RouteSpec, upstream: UpstreamResponse) -> Result<Response, GatewayError> {
    match spec.reply {
        ReplyMode::Relay => Ok(response::relay(upstream)),
        ReplyMode::RequireJson => {
            let body: Value = upstream.json()?;
            Ok(response::relay_json(upstream.status, body, upstream.set_cookie))
        }
    }
}
