use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AdminError;

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn get_header_value<'a>(headers: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

/// HTTP method of an API Gateway event (payload format 2.0 or 1.0).
pub fn request_method(payload: &Value) -> &str {
    v_str(payload, &["requestContext", "http", "method"])
        .or_else(|| v_str(payload, &["httpMethod"]))
        .unwrap_or("GET")
}

pub fn request_path(payload: &Value) -> Option<&str> {
    v_str(payload, &["rawPath"]).or_else(|| v_str(payload, &["path"]))
}

/// The part of `path` after the `/admin` mount point, without trailing slash.
pub fn admin_route(path: &str) -> Option<&str> {
    let idx = path.find("/admin/")?;
    let route = &path[idx + "/admin".len()..];
    Some(route.trim_end_matches('/'))
}

pub fn request_host(payload: &Value) -> &str {
    payload
        .get("headers")
        .and_then(|h| get_header_value(h, "host"))
        .or_else(|| v_str(payload, &["requestContext", "domainName"]))
        .unwrap_or("localhost")
}

/// Looks up a query parameter, percent-decoding the raw query string when
/// present and falling back to the pre-parsed parameter map.
pub fn query_param(payload: &Value, name: &str) -> Option<String> {
    let from_raw = v_str(payload, &["rawQueryString"]).and_then(|q| {
        q.split('&').find_map(|kv| {
            let (key, value) = kv.split_once('=').unwrap_or((kv, ""));
            if key == name {
                let value = value.replace('+', " ");
                Some(percent_decode_str(&value).decode_utf8_lossy().into_owned())
            } else {
                None
            }
        })
    });

    from_raw.or_else(|| {
        v_str(payload, &["queryStringParameters", name]).map(std::string::ToString::to_string)
    })
}

/// Request body as text, decoding base64 when API Gateway flagged it.
pub fn request_body(payload: &Value) -> Result<String, AdminError> {
    let Some(body) = payload.get("body").and_then(|b| b.as_str()) else {
        return Ok(String::new());
    };

    let encoded = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if !encoded {
        return Ok(body.to_string());
    }

    let bytes = STANDARD
        .decode(body)
        .map_err(|e| AdminError::Parse(format!("Invalid base64 body: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AdminError::Parse(format!("Body is not UTF-8: {e}")))
}

pub fn parse_json_body<T: DeserializeOwned>(payload: &Value) -> Result<T, AdminError> {
    let body = request_body(payload)?;
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    serde_json::from_str(body).map_err(|e| AdminError::Parse(format!("Invalid JSON body: {e}")))
}

/// Value of the named cookie, from the v2 `cookies` array or a `Cookie`
/// header.
pub fn cookie_value(payload: &Value, name: &str) -> Option<String> {
    let from_array = payload
        .get("cookies")
        .and_then(|c| c.as_array())
        .into_iter()
        .flatten()
        .filter_map(|c| c.as_str());
    let from_header = payload
        .get("headers")
        .and_then(|h| get_header_value(h, "cookie"))
        .into_iter()
        .flat_map(|h| h.split(';'));

    from_array.chain(from_header).find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}
