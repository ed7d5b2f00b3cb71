//! Basic-auth gate for static and administrative pages.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use minipaste_core::config::{Config, Credential};
use minipaste_core::constants::AUTH_REALM;

/// Decides whether a request may see a gated page.
///
/// Returns `None` to let the request through, or the complete denial
/// response, which callers return unchanged.
pub trait AuthVerifier: Send + Sync {
    fn verify(&self, headers: &HeaderMap, config: &Config) -> Option<Response>;
}

/// HTTP basic auth against `Config::basic_auth`.
///
/// An empty credential list disables the gate.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicAuth;

fn parse_basic_credentials(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Byte comparison that does not stop at the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn credentials_match(accepted: &[Credential], user: &str, password: &str) -> bool {
    accepted.iter().any(|credential| {
        credential.user == user
            && constant_time_eq(credential.password.as_bytes(), password.as_bytes())
    })
}

fn unauthorized(message: &'static str) -> Response {
    let challenge = format!("Basic realm=\"{}\"", AUTH_REALM);
    let mut response = (StatusCode::UNAUTHORIZED, message).into_response();
    if let Ok(value) = HeaderValue::from_str(&challenge) {
        response
            .headers_mut()
            .insert(header::WWW_AUTHENTICATE, value);
    }
    response
}

impl AuthVerifier for BasicAuth {
    fn verify(&self, headers: &HeaderMap, config: &Config) -> Option<Response> {
        if !config.auth_enabled() {
            return None;
        }

        let Some(authorization) = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
        else {
            tracing::debug!("auth required but no authorization header");
            return Some(unauthorized("HTTP basic auth is required"));
        };

        let Some((user, password)) = parse_basic_credentials(authorization) else {
            tracing::debug!("malformed authorization header");
            return Some(unauthorized("Malformed basic auth header"));
        };

        if credentials_match(&config.basic_auth, &user, &password) {
            None
        } else {
            tracing::debug!(user = %user, "basic auth rejected");
            Some(unauthorized("Invalid username or password"))
        }
    }
}
