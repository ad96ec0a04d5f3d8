use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::products;
use crate::response::ApiResponse;
use crate::state::AppState;

use super::dto::RoasParams;
use super::services;

#[instrument(skip(state, _user))]
pub async fn roas(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Query(params): Query<RoasParams>,
) -> Result<Response, ApiError> {
    // Prices resolve from the product when referenced; explicit query
    // values override.
    let product = match params.product_id {
        Some(id) => Some(
            products::repo::find(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::NotFound("Product not found".into()))?,
        ),
        None => None,
    };

    let selling_price = params
        .selling_price
        .or_else(|| product.as_ref().map(|p| p.selling_price))
        .ok_or_else(|| ApiError::Validation("Missing selling_price".into()))?;
    let purchase_price = params
        .purchase_price
        .or_else(|| product.as_ref().map(|p| p.purchase_price))
        .unwrap_or(0.0);

    if selling_price <= 0.0 {
        return Err(ApiError::Validation("selling_price must be positive".into()));
    }

    let breakdown = services::roas_breakdown(
        selling_price,
        purchase_price,
        params.admin_fee_pct.unwrap_or(0.0),
        params.target_profit_pct.unwrap_or(0.0),
    );
    Ok(ApiResponse::data(breakdown).into_response())
}
