use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use base64::Engine;

use crate::AppState;

/// Authenticated admin. Extract this in handlers that require auth. A
/// missing or wrong Authorization header rejects with 401 and a Basic
/// challenge.
pub struct AdminAuth;

impl FromRequestParts<Arc<AppState>> for AdminAuth {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let authorization = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if credentials_match(
            authorization,
            &state.config.admin_username,
            &state.config.admin_password,
        ) {
            return Ok(AdminAuth);
        }

        Err((
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, r#"Basic realm="admin""#)],
            Json(serde_json::json!({ "success": false, "error": "Unauthorized" })),
        )
            .into_response())
    }
}

/// Check a `Basic` Authorization header against the configured credentials.
fn credentials_match(authorization: &str, username: &str, password: &str) -> bool {
    let Some(encoded) = authorization.strip_prefix("Basic ") else {
        return false;
    };
    let Ok(decoded) = base64::engine::general_purpose::STANDARD.decode(encoded.trim()) else {
        return false;
    };
    let Ok(decoded) = String::from_utf8(decoded) else {
        return false;
    };

    let expected = format!("{username}:{password}");
    constant_time_eq(decoded.as_bytes(), expected.as_bytes())
}

/// Byte comparison that does not short-circuit on the first mismatch.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn basic_header(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    #[test]
    fn accepts_the_configured_credentials() {
        let header = basic_header("admin", "secret");
        assert!(credentials_match(&header, "admin", "secret"));
    }

    #[test]
    fn rejects_wrong_password_and_wrong_user() {
        assert!(!credentials_match(&basic_header("admin", "nope"), "admin", "secret"));
        assert!(!credentials_match(&basic_header("root", "secret"), "admin", "secret"));
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(!credentials_match("", "admin", "secret"));
        assert!(!credentials_match("Bearer abc123", "admin", "secret"));
        assert!(!credentials_match("Basic not-base64!!!", "admin", "secret"));
    }

    #[test]
    fn constant_time_eq_matches_exact_bytes_only() {
        assert!(constant_time_eq(b"admin:secret", b"admin:secret"));
        assert!(!constant_time_eq(b"admin:secret", b"admin:secres"));
        assert!(!constant_time_eq(b"short", b"longer input"));
    }
}
