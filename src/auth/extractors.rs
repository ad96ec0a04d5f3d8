use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::state::AppState;

use super::token::{self, SessionUser};

/// Gate for protected endpoints: resolves the bearer token to a live
/// session and hands the handler the user, or rejects with 401 before any
/// work happens.
pub struct AuthUser(pub SessionUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = token::authenticate(state, &parts.headers).await?;
        Ok(AuthUser(user))
    }
}
