use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::normalize;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::{
    CreateProductRequest, DeleteProductRequest, GetProductParams, UpdateProductRequest,
};
use super::repo;

#[instrument(skip(state, _user))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<GetProductParams>,
) -> Result<Response, ApiError> {
    match params.id {
        Some(id) => {
            let product = repo::find(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
            Ok(ApiResponse::data(product).into_response())
        }
        None => {
            let products = repo::list_all(&state.db).await?;
            Ok(ApiResponse::data(products).into_response())
        }
    }
}

#[instrument(skip(state, _user, body))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: CreateProductRequest = serde_json::from_value(body).map_err(|_| {
        ApiError::Validation("Missing required fields: name, selling_price".into())
    })?;

    let image = req.image.as_deref().and_then(normalize::normalize_image);
    let product = repo::insert(
        &state.db,
        Uuid::new_v4(),
        req.code.as_deref().map(str::trim),
        req.name.trim(),
        image.as_deref(),
        req.purchase_price.unwrap_or(0.0),
        req.selling_price,
        req.stock.unwrap_or(0),
    )
    .await?;

    Ok(ApiResponse::with_message(product, "Product created successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let mut req: UpdateProductRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing product id".into()))?;

    if req.patch.is_empty() {
        return Err(ApiError::Validation("No fields to update".into()));
    }
    if let Some(image) = req.patch.image.take() {
        req.patch.image = normalize::normalize_image(&image);
    }

    repo::update(&state.db, req.id, &req.patch).await?;
    Ok(ApiResponse::<()>::message("Product updated successfully").into_response())
}

#[instrument(skip(state, _user, body))]
pub async fn remove(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Json(body): Json<Value>,
) -> Result<Response, ApiError> {
    let req: DeleteProductRequest = serde_json::from_value(body)
        .map_err(|_| ApiError::Validation("Missing product id".into()))?;

    if repo::delete(&state.db, req.id).await? == 0 {
        return Err(ApiError::NotFound("Product not found".into()));
    }
    Ok(ApiResponse::<()>::message("Product deleted successfully").into_response())
}
