//! Response envelope handling.
//!
//! Every platform response looks like
//! `{"ErrorStatus": "Success", "Response": ..., "Message": "Ok", ...}`.
//! The payload shape is inconsistent: single objects come back wrapped in a
//! one-entry map (`{"data": {...}}`) or a one-element list, while collections
//! come back bare. [`unwrap_envelope`] collapses the single-value cases.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Status string of a successful call
pub const SUCCESS_STATUS: &str = "Success";

/// Strip a leading `/` and ensure exactly one trailing `/`
pub fn normalize_path(path: &str) -> String {
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/", path.trim_end_matches('/'))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Check the status of a decoded body and extract its payload.
///
/// Returns `Ok(None)` for an empty payload.
pub fn unwrap_envelope(path: &str, body: Value) -> Result<Option<Value>> {
    let status = body
        .get("ErrorStatus")
        .and_then(Value::as_str)
        .map(str::to_string);
    if status.as_deref() != Some(SUCCESS_STATUS) {
        let message = body
            .get("Message")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(Error::Api {
            path: path.to_string(),
            status: status.unwrap_or_else(|| "UnknownError".to_string()),
            message,
            raw: Some(body),
        });
    }

    let response = match body {
        Value::Object(mut map) => map.remove("Response").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    if is_empty(&response) {
        return Ok(None);
    }

    Ok(Some(collapse_single(response)))
}

/// Collapse one-entry containers to the value they hold
fn collapse_single(response: Value) -> Value {
    match response {
        Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
            Some((key, value)) if key == "data" => value,
            // `{"<kind>": {"data": ...}}`
            Some((_, Value::Object(mut inner))) if inner.contains_key("data") => {
                inner.remove("data").unwrap_or_default()
            }
            Some((key, value)) => Value::Object(Map::from_iter([(key, value)])),
            None => Value::Object(Map::new()),
        },
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    }
}
