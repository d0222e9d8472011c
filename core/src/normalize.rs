//! Turns a raw `HttpResponse` into a typed outcome.
//!
//! # Design
//! Bodies are partially trusted: every field is read through `serde_json::Value`
//! and checked before use. The rules, shared by every read-style endpoint:
//!
//! 1. Body is not JSON: failure, reason `response parse failed: <detail>`.
//! 2. Status is not 2xx, or `success` is not truthy: failure. The reason is the
//!    body's string `error` when non-empty, else `HTTP <status>`. All other
//!    body fields are kept in the outcome's `extra` map.
//! 3. Otherwise the payload field is deserialized into the typed shape and the
//!    remaining fields go to `extra` untouched. A missing or malformed
//!    payload is reported as a failure rather than a success without data.
//!
//! Posting uses a stricter rule (`success` must be literally `true`) and has
//! its own function, [`normalize_post`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::http::HttpResponse;
use crate::types::PostOutcome;

/// An outcome shape that `normalize` can produce.
pub trait Envelope: Sized {
    /// Body field carrying the success payload.
    const PAYLOAD_KEY: &'static str;

    type Payload: DeserializeOwned;

    fn succeeded(payload: Self::Payload, extra: Map<String, Value>) -> Self;

    /// `reason` is never empty.
    fn failed(reason: String, extra: Map<String, Value>) -> Self;
}

/// Normalize a read-style response into `E`.
pub fn normalize<E: Envelope>(response: &HttpResponse) -> E {
    let data: Value = match serde_json::from_str(&response.body) {
        Ok(data) => data,
        Err(e) => {
            warn!(status = response.status, "response parse failed: {e}");
            return E::failed(parse_failure(&e), Map::new());
        }
    };

    let ok = response.is_success() && data.get("success").is_some_and(is_truthy);
    let mut fields = match data {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    let reason = failure_reason(&fields, response.status);
    fields.remove("success");
    fields.remove("error");

    if !ok {
        fields.remove(E::PAYLOAD_KEY);
        debug!(status = response.status, %reason, "service reported failure");
        return E::failed(reason, fields);
    }

    let Some(raw) = fields.remove(E::PAYLOAD_KEY) else {
        warn!(key = E::PAYLOAD_KEY, "success response without payload");
        return E::failed(format!("response missing `{}` field", E::PAYLOAD_KEY), fields);
    };

    match serde_json::from_value(raw) {
        Ok(payload) => E::succeeded(payload, fields),
        Err(e) => {
            warn!(key = E::PAYLOAD_KEY, "malformed payload: {e}");
            E::failed(
                format!("response `{}` field malformed: {e}", E::PAYLOAD_KEY),
                fields,
            )
        }
    }
}

/// Normalize the response to `POST /api/actions/tweet`.
pub fn normalize_post(response: &HttpResponse) -> PostOutcome {
    let data: Value = match serde_json::from_str(&response.body) {
        Ok(data) => data,
        Err(e) => {
            warn!(status = response.status, "post response parse failed: {e}");
            return PostOutcome::failed(parse_failure(&e));
        }
    };

    let success = data.get("success").and_then(Value::as_bool).unwrap_or(false);
    if !response.is_success() || !success {
        let reason = match &data {
            Value::Object(fields) => failure_reason(fields, response.status),
            _ => status_reason(response.status),
        };
        debug!(status = response.status, %reason, "post rejected");
        return PostOutcome::failed(reason);
    }

    let tweet_id = data
        .get("tweetId")
        .and_then(Value::as_str)
        .map(str::to_string);
    PostOutcome::succeeded(tweet_id)
}

/// Loose truthiness used for the `success` flag of read-style bodies.
///
/// `null`, `false`, `0` and `""` are false; everything else, including empty
/// arrays and objects, is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn failure_reason(fields: &Map<String, Value>, status: u16) -> String {
    fields
        .get("error")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map_or_else(|| status_reason(status), str::to_string)
}

fn status_reason(status: u16) -> String {
    format!("HTTP {status}")
}

/// Reason for a body that could not be read or parsed as JSON.
pub(crate) fn parse_failure(error: &impl std::fmt::Display) -> String {
    format!("response parse failed: {error}")
}
