//! Opaque session tokens: 256 random bits, hex-encoded, stored server-side
//! with an expiry. One live session per user; expiry is checked lazily at
//! verification time, never swept proactively.

use std::fmt::Write as _;

use axum::http::{header, HeaderMap};
use rand::{rngs::OsRng, RngCore};
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

use super::repo;

pub const TOKEN_BYTES: usize = 32;

/// Identity resolved from a live session token.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    let mut out = String::with_capacity(TOKEN_BYTES * 2);
    for b in bytes {
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Pull the credential out of `Authorization: Bearer <token>`. Header-name
/// casing is already normalized by the HTTP layer; the scheme itself is
/// accepted in either case.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    raw.strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the bearer token to a user, or fail with the exact 401 messages
/// the client renders.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<SessionUser, ApiError> {
    let token = bearer_token(headers).ok_or_else(|| {
        ApiError::Unauthorized("Token tidak ditemukan. Silakan login terlebih dahulu.".into())
    })?;

    lookup_session(state, token).await?.ok_or_else(|| {
        ApiError::Unauthorized("Token tidak valid atau sudah kadaluarsa. Silakan login kembali.".into())
    })
}

/// Single-tenant: the live token set is at most a handful of rows, so fetch
/// it whole and compare in constant time instead of matching the secret in
/// SQL, which would leak through index timing.
async fn lookup_session(state: &AppState, token: &str) -> Result<Option<SessionUser>, ApiError> {
    let sessions = repo::live_sessions(&state.db).await?;
    Ok(sessions
        .into_iter()
        .find(|s| bool::from(s.token.as_bytes().ct_eq(token.as_bytes())))
        .map(|s| SessionUser {
            id: s.user_id,
            email: s.email,
            full_name: s.full_name,
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn bearer_is_extracted_case_tolerantly() {
        assert_eq!(bearer_token(&headers_with("Bearer abc123")), Some("abc123"));
        assert_eq!(bearer_token(&headers_with("bearer abc123")), Some("abc123"));
    }

    #[test]
    fn missing_or_malformed_bearer_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers_with("Basic abc123")), None);
        assert_eq!(bearer_token(&headers_with("Bearer ")), None);
    }
}
