use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::SettingsPatch;
use super::repo;

#[instrument(skip(state, _user))]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Response, ApiError> {
    let settings = repo::get_or_init(&state.db).await?;
    Ok(ApiResponse::data(settings).into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let patch: SettingsPatch = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("No fields to update".into()))?;

    if patch.is_empty() {
        return Err(ApiError::Validation("No fields to update".into()));
    }

    repo::update(&state.db, &patch).await?;
    Ok(ApiResponse::<()>::message("Settings updated successfully").into_response())
}
