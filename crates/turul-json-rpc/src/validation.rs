//! Structural checks over decoded payloads.
//!
//! Both predicates look at member presence only: an explicit `null` counts as
//! present, a missing key does not.

use serde_json::Value;

use crate::JSONRPC_VERSION;

fn has_version(payload: &Value) -> bool {
    payload.get("jsonrpc").and_then(Value::as_str) == Some(JSONRPC_VERSION)
}

/// True when `payload` carries the exact protocol version, a `method`, and
/// neither `result` nor `error`.
pub fn is_valid_request(payload: &Value) -> bool {
    has_version(payload)
        && payload.get("method").is_some()
        && payload.get("result").is_none()
        && payload.get("error").is_none()
}

/// True when `payload` carries the exact protocol version, an `id`, and at
/// least one of `result` / `error`.
///
/// Exclusivity of `result` and `error` is not checked here; the client
/// rejects responses carrying both.
pub fn is_valid_response(payload: &Value) -> bool {
    has_version(payload)
        && payload.get("id").is_some()
        && (payload.get("result").is_some() || payload.get("error").is_some())
}
