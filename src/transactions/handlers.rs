use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::normalize;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::{
    CreateTransactionRequest, DeleteTransactionRequest, UpdateTransactionRequest,
};
use super::{repo, services};

#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Response, ApiError> {
    let mut records = repo::list_all(&state.db).await?;
    // Older rows may carry a zero total; repair it on the way out.
    for rec in &mut records {
        rec.total = normalize::coerce_total(rec.total, rec.quantity as i64, rec.unit_price);
    }
    Ok(ApiResponse::data(records).into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: CreateTransactionRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::Validation("Missing required fields: product_name, quantity, unit_price".into())
    })?;

    let record = services::create_transaction(&state, req).await?;
    Ok(ApiResponse::with_message(record, "Transaction created successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: UpdateTransactionRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing transaction id".into()))?;

    services::update_transaction(&state, req.id, req.patch).await?;
    Ok(ApiResponse::<()>::message("Transaction updated successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: DeleteTransactionRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing transaction id".into()))?;

    if repo::delete(&state.db, req.id).await? == 0 {
        return Err(ApiError::NotFound("Transaction not found".into()));
    }
    Ok(ApiResponse::<()>::message("Transaction deleted successfully").into_response())
}
