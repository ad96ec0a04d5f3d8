use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::{CreateExpenseRequest, DeleteExpenseRequest, UpdateExpenseRequest};
use super::repo;

#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Response, ApiError> {
    let expenses = repo::list_all(&state.db).await?;
    Ok(ApiResponse::data(expenses).into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: CreateExpenseRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::Validation("Missing required fields: category, cost, date".into())
    })?;

    // Optional text fields store as empty strings, never NULL.
    let expense = repo::insert(
        &state.db,
        Uuid::new_v4(),
        req.category.trim(),
        req.description.as_deref().unwrap_or("").trim(),
        req.cost,
        req.date,
        req.notes.as_deref().unwrap_or("").trim(),
    )
    .await?;

    Ok(ApiResponse::with_message(expense, "Expense created successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: UpdateExpenseRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing expense id".into()))?;

    if req.patch.is_empty() {
        return Err(ApiError::Validation("No fields to update".into()));
    }

    repo::update(&state.db, req.id, &req.patch).await?;
    Ok(ApiResponse::<()>::message("Expense updated successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: DeleteExpenseRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing expense id".into()))?;

    if repo::delete(&state.db, req.id).await? == 0 {
        return Err(ApiError::NotFound("Expense not found".into()));
    }
    Ok(ApiResponse::<()>::message("Expense deleted successfully").into_response())
}
