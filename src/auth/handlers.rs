use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::{AuthQuery, AuthSession, LoginRequest, RegisterRequest, VerifiedUser};
use super::password::{hash_password, verify_password};
use super::repo::{self, User};
use super::token;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// The registration gate: a single configured account, compared
/// case-insensitively.
fn is_allowed_email(allowed: &str, email: &str) -> bool {
    email.eq_ignore_ascii_case(allowed)
}

#[instrument(skip(state, headers, body))]
pub async fn dispatch(
    State(state): State<AppState>,
    Query(q): Query<AuthQuery>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Response, ApiError> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    match q.action.as_deref() {
        Some("login") => login(&state, body).await.map(IntoResponse::into_response),
        Some("register") => register(&state, body).await.map(IntoResponse::into_response),
        Some("logout") => logout(&state, &headers).await.map(IntoResponse::into_response),
        Some("verify") => verify(&state, &headers).await.map(IntoResponse::into_response),
        _ => Err(ApiError::Validation(
            "Invalid action. Use ?action=login, ?action=register, ?action=logout, or ?action=verify"
                .into(),
        )),
    }
}

async fn register(state: &AppState, body: Value) -> Result<ApiResponse<AuthSession>, ApiError> {
    let req: RegisterRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::Validation("Missing required fields: email, password, full_name".into())
    })?;
    let email = req.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if req.password.len() < 8 {
        return Err(ApiError::Validation("Password too short".into()));
    }
    if !is_allowed_email(&state.config.allowed_email, &email) {
        warn!(email = %email, "registration attempt from non-allowed email");
        return Err(ApiError::Forbidden(
            "Email tidak diizinkan untuk mendaftar".into(),
        ));
    }
    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("Email sudah terdaftar".into()));
    }

    let hash = hash_password(&req.password)?;
    let user = User::create(&state.db, Uuid::new_v4(), &email, &hash, req.full_name.trim()).await?;
    let token = issue_session(state, user.id).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(ApiResponse::with_message(
        AuthSession {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            token,
        },
        "Registration successful",
    ))
}

async fn login(state: &AppState, body: Value) -> Result<ApiResponse<AuthSession>, ApiError> {
    let req: LoginRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing email or password".into()))?;
    let email = req.email.trim().to_lowercase();

    // Unknown email and wrong password are indistinguishable to the caller.
    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Email atau password salah".into()))?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login with invalid password");
        return Err(ApiError::Unauthorized("Email atau password salah".into()));
    }

    let token = issue_session(state, user.id).await?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(ApiResponse::with_message(
        AuthSession {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            token,
        },
        "Login successful",
    ))
}

/// Idempotent: logging out with an absent or already-deleted token is still
/// a success.
async fn logout(state: &AppState, headers: &HeaderMap) -> Result<ApiResponse<()>, ApiError> {
    if let Some(token) = token::bearer_token(headers) {
        repo::delete_token(&state.db, token).await?;
    }
    Ok(ApiResponse::message("Logout successful"))
}

async fn verify(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<ApiResponse<VerifiedUser>, ApiError> {
    let user = token::authenticate(state, headers).await?;
    Ok(ApiResponse::data(VerifiedUser {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
    }))
}

/// Mint a fresh token and rotate out every prior session for the user.
async fn issue_session(state: &AppState, user_id: Uuid) -> Result<String, ApiError> {
    let token = token::generate_token();
    repo::issue_token(&state.db, user_id, &token, state.config.token_ttl_days).await?;
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_validation() {
        assert!(is_valid_email("owner@example.com"));
        assert!(!is_valid_email("owner@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn allowed_email_gate_is_case_insensitive() {
        assert!(is_allowed_email("owner@example.com", "owner@example.com"));
        assert!(is_allowed_email("owner@example.com", "Owner@Example.COM"));
        assert!(!is_allowed_email("owner@example.com", "intruder@example.com"));
    }

    #[test]
    fn register_body_requires_all_fields() {
        let ok: Result<RegisterRequest, _> = serde_json::from_value(serde_json::json!({
            "email": "owner@example.com",
            "password": "s3cret-enough",
            "full_name": "Owner"
        }));
        assert!(ok.is_ok());

        let missing: Result<RegisterRequest, _> = serde_json::from_value(serde_json::json!({
            "email": "owner@example.com",
            "password": "s3cret-enough"
        }));
        assert!(missing.is_err());
    }
}
