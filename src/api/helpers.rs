//! Response builders shared by the admin handlers.

use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::AdminError;

/// Returns a 200 OK response with an empty JSON body.
#[must_use]
pub fn ok_empty() -> Value {
    json!({ "statusCode": 200, "body": "{}" })
}

/// Returns a 200 OK response with `payload` serialized as the body.
#[must_use]
pub fn ok_json<T: Serialize>(payload: &T) -> Value {
    match serde_json::to_string(payload) {
        Ok(body) => json!({
            "statusCode": 200,
            "headers": { "Content-Type": "application/json" },
            "body": body
        }),
        Err(e) => err_response(500, &format!("Failed to serialize response: {e}")),
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}

/// Maps a store-level error to the generic error response.
#[must_use]
pub fn store_error(error: &AdminError) -> Value {
    let status = match error {
        AdminError::NotFound(_) => 404,
        AdminError::Parse(_) => 400,
        _ => 500,
    };
    err_response(status, &error.to_string())
}

/// Attaches a `Set-Cookie` header to an existing response.
#[must_use]
pub fn with_cookie(mut response: Value, cookie: &str) -> Value {
    if let Some(obj) = response.as_object_mut() {
        let headers = obj
            .entry("headers")
            .or_insert_with(|| json!({}));
        if let Some(headers) = headers.as_object_mut() {
            headers.insert("Set-Cookie".to_string(), Value::String(cookie.to_string()));
        }
    }
    response
}
