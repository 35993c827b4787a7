//! Backend target resolution.
//!
//! # Responsibilities
//! - Pick the backend base URL for a route on every call
//! - Append `/api/<path>` with path parameters percent-encoded
//! - Attach the forwarded query string
//!
//! # Design Decisions
//! - The environment is read per call, never cached, so a redeploy with a
//!   new `BACKEND_URL` needs no code change
//! - A base that is not absolute http(s) is a local error, not a guess

use url::{form_urlencoded, Url};

use crate::config::GatewayConfig;
use crate::config::validation::check_base_url;
use crate::http::error::GatewayError;
use crate::routing::{QueryMode, RouteSpec};

/// Where a base URL came from, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource {
    Environment,
    Config,
    RouteOverride,
    Literal,
}

/// Choose the base URL for `spec` according to the precedence documented on
/// [`crate::config::BackendConfig`].
pub fn base_url(config: &GatewayConfig, spec: &RouteSpec) -> Result<(Url, BaseSource), GatewayError> {
    let from_env = std::env::var(&config.backend.base_url_env)
        .ok()
        .filter(|v| !v.trim().is_empty());

    let (raw, source) = if let Some(v) = from_env {
        (v, BaseSource::Environment)
    } else if let Some(v) = &config.backend.base_url {
        (v.clone(), BaseSource::Config)
    } else if let Some(v) = config.backend.route_fallbacks.get(spec.name) {
        (v.clone(), BaseSource::RouteOverride)
    } else {
        (spec.fallback_base.to_string(), BaseSource::Literal)
    };

    let url = check_base_url(&raw).map_err(GatewayError::Misconfigured)?;
    Ok((url, source))
}

/// Full upstream URL for one call of `spec`.
pub fn resolve(
    config: &GatewayConfig,
    spec: &RouteSpec,
    params: &[(&str, &str)],
    query: Option<&str>,
) -> Result<Url, GatewayError> {
    let (mut url, source) = base_url(config, spec)?;
    if source == BaseSource::Literal {
        tracing::debug!(route = spec.name, base = %url, "Using built-in backend fallback");
    }

    url.set_fragment(None);
    append_path(&mut url, spec, params)?;

    if let QueryMode::WithDefault { key, value } = spec.query {
        let mut pairs: Vec<(String, String)> = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        if !pairs.iter().any(|(k, _)| k == key) {
            pairs.push((key.to_string(), value.to_string()));
        }
        url.query_pairs_mut().extend_pairs(pairs);
    }

    Ok(url)
}

/// Append `api` and the route's template segments to `url`.
fn append_path(url: &mut Url, spec: &RouteSpec, params: &[(&str, &str)]) -> Result<(), GatewayError> {
    let base = url.to_string();
    let mut segments = url
        .path_segments_mut()
        .map_err(|_| GatewayError::Misconfigured(format!("'{}' cannot be a base", base)))?;
    segments.pop_if_empty().push("api");
    for segment in spec.upstream.split('/') {
        match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                let value = params
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| *value)
                    .ok_or_else(|| {
                        GatewayError::Misconfigured(format!(
                            "route {} is missing path parameter {}",
                            spec.name, name
                        ))
                    })?;
                segments.push(value);
            }
            None => {
                segments.push(segment);
            }
        }
    }
    Ok(())
}
