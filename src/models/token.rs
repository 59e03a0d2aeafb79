use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use serde_json::Value;

/// The client's view of its session credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenRecord {
    pub access_token: Option<String>,
    pub refresh_enabled: bool,
}

/// Body of the refresh request. The refresh token itself travels as a cookie.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub access_token: Option<String>,
}

/// Pull the access token out of a refresh response.
///
/// The canonical shape is `{"data": {"accessToken": "..."}}`. The flat
/// `{"accessToken": "..."}` shape is deprecated but still accepted. Empty
/// strings count as absent.
pub fn extract_access_token(body: &Value) -> Option<String> {
    body.pointer("/data/accessToken")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .or_else(|| {
            body.get("accessToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
        })
        .map(str::to_string)
}

/// Decode the claims segment of a `header.claims.signature` token.
/// The signature is not verified.
pub fn decode_claims(token: &str) -> Option<Value> {
    let mut segments = token.split('.');
    let (Some(_header), Some(claims), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return None;
    };

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(claims.trim_end_matches('='))
        .ok()?;
    let value: Value = serde_json::from_slice(&bytes).ok()?;
    value.is_object().then_some(value)
}

/// Expiry of `token` in milliseconds since the epoch, or `None` if the token
/// cannot be read or carries no numeric `exp` claim.
pub fn decode_expiry_millis(token: &str) -> Option<i64> {
    let claims = decode_claims(token)?;
    let exp = claims.get("exp")?;
    if let Some(seconds) = exp.as_i64() {
        return seconds.checked_mul(1000);
    }

    // fractional seconds are scaled before truncating
    let millis = exp.as_f64()? * 1000.0;
    (millis.is_finite() && millis >= i64::MIN as f64 && millis < i64::MAX as f64)
        .then(|| millis as i64)
}
