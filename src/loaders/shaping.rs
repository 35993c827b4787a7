//! Compatibility shaping of backend records.
//!
//! The backend is not consistent about identifiers (`id` vs `_id` vs
//! entity-specific keys, text vs numbers) or timestamps (RFC 3339, naive
//! strings, bare dates, epoch millis). Shaping folds all of that into the
//! view models in `models.rs`.
//!
//! Shaping is idempotent: a shaped record, serialized and shaped again, is
//! unchanged. It never fails on missing or null fields; a record that is
//! not an object at all is dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A view model that can be shaped from a raw backend record.
pub trait Shape: DeserializeOwned {
    /// Keys that may carry the identifier when `id` is absent, in priority order.
    const ID_ALIASES: &'static [&'static str] = &["_id"];
}

/// Shape one raw record into `T`.
pub fn shape<T: Shape>(raw: Value) -> Option<T> {
    let Value::Object(mut object) = raw else {
        tracing::debug!("Dropping non-object record");
        return None;
    };
    unify_id(&mut object, T::ID_ALIASES);

    match serde_json::from_value(Value::Object(object)) {
        Ok(shaped) => Some(shaped),
        Err(e) => {
            tracing::debug!(error = %e, "Dropping malformed record");
            None
        }
    }
}

/// Shape every record of a list, skipping the ones that do not fit.
pub fn shape_all<T: Shape>(raw: Vec<Value>) -> Vec<T> {
    raw.into_iter().filter_map(shape).collect()
}

/// Copy the first usable alias into `id` when `id` is missing, null, or
/// something [`lenient_id`] would drop.
pub fn unify_id(object: &mut Map<String, Value>, aliases: &[&str]) {
    if object.get("id").is_some_and(is_usable_id) {
        return;
    }
    let alias = aliases
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_usable_id(value))
        .cloned();
    if let Some(value) = alias {
        object.insert("id".to_string(), value);
    }
}

fn is_usable_id(value: &Value) -> bool {
    match value {
        Value::String(text) => !text.is_empty(),
        Value::Number(_) => true,
        _ => false,
    }
}

/// Parse the timestamp spellings the backend is known to emit.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Deserialize a timestamp from text or epoch milliseconds; anything else,
/// including unparseable text, is `None`.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => parse_timestamp(&text),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

/// Deserialize an identifier given as text or as a number.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) if !text.is_empty() => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Deserialize a number that may arrive as text (`"3000"`).
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize a flag that may arrive as text or 0/1.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(text) => match text.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}
