//! Session cookie relay.
//!
//! Cookies are copied from the inbound request onto the upstream request
//! untouched. Validation is the backend's job.

use axum::http::{header::COOKIE, HeaderMap};

/// Ordered cookies of one inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieSet {
    pairs: Vec<(String, String)>,
}

impl CookieSet {
    /// Collect every cookie from every `Cookie` header, in order.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let pairs = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((name, value)) => (name.to_string(), value.to_string()),
                None => (String::new(), segment.to_string()),
            })
            .collect();

        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// `"name=value; name2=value2"`, or an empty string when there are none.
    pub fn header_value(&self) -> String {
        self.pairs
            .iter()
            .map(|(name, value)| {
                if name.is_empty() {
                    value.clone()
                } else {
                    format!("{}={}", name, value)
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}
