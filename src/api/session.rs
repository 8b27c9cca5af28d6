//! Signed session cookie carrying the impersonation context.
//!
//! The cookie value is `base64url(json).hex(hmac_sha256(secret, base64url(json)))`.
//! A missing, malformed or tampered cookie yields an empty session.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::Sha256;
use tracing::warn;

use super::parsing::cookie_value;
use crate::core::models::Account;
use crate::errors::AdminError;

pub const SESSION_COOKIE: &str = "admin_console_session";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Account the administrator is currently viewing the console as.
    pub viewed_user: Option<Account>,
}

fn mac_for(secret: &str) -> Result<Hmac<Sha256>, AdminError> {
    Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| AdminError::Session(format!("Failed to create HMAC: {e}")))
}

pub fn sign(payload: &str, secret: &str) -> Result<String, AdminError> {
    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// # Errors
///
/// Returns an error if the session cannot be serialized or signed.
pub fn encode_session(session: &Session, secret: &str) -> Result<String, AdminError> {
    let json = serde_json::to_vec(session)?;
    let payload = URL_SAFE_NO_PAD.encode(json);
    let signature = sign(&payload, secret)?;
    Ok(format!("{payload}.{signature}"))
}

/// # Errors
///
/// Returns an error if the value is malformed or its signature does not
/// match.
pub fn decode_session(value: &str, secret: &str) -> Result<Session, AdminError> {
    let (payload, signature) = value
        .split_once('.')
        .ok_or_else(|| AdminError::Session("missing signature".to_string()))?;

    let expected = hex::decode(signature)
        .map_err(|e| AdminError::Session(format!("signature is not hex: {e}")))?;
    let mut mac = mac_for(secret)?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| AdminError::Session("signature mismatch".to_string()))?;

    let json = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| AdminError::Session(format!("payload is not base64: {e}")))?;
    Ok(serde_json::from_slice(&json)?)
}

/// Session attached to the request, or an empty one.
pub fn read_session(payload: &Value, secret: &str) -> Session {
    let Some(raw) = cookie_value(payload, SESSION_COOKIE) else {
        return Session::default();
    };

    decode_session(&raw, secret).unwrap_or_else(|e| {
        warn!("Ignoring session cookie: {}", e);
        Session::default()
    })
}

#[must_use]
pub fn session_cookie(value: &str) -> String {
    format!("{SESSION_COOKIE}={value}; Path=/; HttpOnly; Secure; SameSite=Lax")
}
