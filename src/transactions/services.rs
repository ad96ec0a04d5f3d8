//! Write-path rules for sales: totals are derived on the server, and the
//! sale plus its stock decrement commit as one unit of work.

use tracing::warn;
use uuid::Uuid;

use crate::error::ApiError;
use crate::products;
use crate::state::AppState;

use super::dto::{
    CreateTransactionRequest, PaymentMethod, TransactionPatch, TransactionRecord,
};
use super::repo;

/// `total == quantity × unit_price` is an invariant of every write.
/// Quantity is the column's own width, so the total can never be computed
/// from a wider value than the one stored.
pub fn compute_total(quantity: i32, unit_price: f64) -> f64 {
    quantity as f64 * unit_price
}

/// Normalized field mask handed to the repo.
#[derive(Debug, Default)]
pub struct TransactionChanges {
    pub product_name: Option<String>,
    pub quantity: Option<i32>,
    pub unit_price: Option<f64>,
    pub payment_method: Option<PaymentMethod>,
    pub total: Option<f64>,
}

pub async fn create_transaction(
    state: &AppState,
    req: CreateTransactionRequest,
) -> Result<TransactionRecord, ApiError> {
    if req.quantity < 1 {
        return Err(ApiError::Validation("Quantity must be at least 1".into()));
    }
    if req.unit_price < 0.0 {
        return Err(ApiError::Validation("Price must not be negative".into()));
    }

    let total = compute_total(req.quantity, req.unit_price);
    let method = PaymentMethod::from_loose(req.payment_method.as_deref().unwrap_or("Cash"));

    let mut tx = state.db.begin().await.map_err(ApiError::Database)?;
    let record = repo::insert(
        &mut tx,
        Uuid::new_v4(),
        req.product_name.trim(),
        req.quantity,
        req.unit_price,
        total,
        method.as_str(),
        req.product_id,
    )
    .await?;

    if let Some(product_id) = req.product_id {
        let n = products::repo::decrement_stock(&mut tx, product_id, req.quantity).await?;
        if n == 0 {
            // Policy: insufficient stock (or an unknown product) does not
            // block the sale; stock is left untouched rather than going
            // negative.
            warn!(%product_id, qty = req.quantity, "stock not decremented");
        }
    }
    tx.commit().await.map_err(ApiError::Database)?;

    Ok(record)
}

pub async fn update_transaction(
    state: &AppState,
    id: Uuid,
    patch: TransactionPatch,
) -> Result<(), ApiError> {
    if patch.is_empty() {
        return Err(ApiError::Validation("No fields to update".into()));
    }

    let mut changes = TransactionChanges {
        product_name: patch.product_name,
        quantity: patch.quantity,
        unit_price: patch.unit_price,
        payment_method: patch.payment_method.as_deref().map(PaymentMethod::from_loose),
        total: None,
    };

    // Recompute the total whenever either input changes. A partial update
    // pulls the stored counterpart first so the total never goes stale.
    if changes.quantity.is_some() || changes.unit_price.is_some() {
        let (quantity, unit_price) = match (changes.quantity, changes.unit_price) {
            (Some(q), Some(p)) => (q, p),
            _ => {
                let current = repo::find(&state.db, id)
                    .await?
                    .ok_or_else(|| ApiError::NotFound("Transaction not found".into()))?;
                (
                    changes.quantity.unwrap_or(current.quantity),
                    changes.unit_price.unwrap_or(current.unit_price),
                )
            }
        };
        changes.total = Some(compute_total(quantity, unit_price));
    }

    repo::update(&state.db, id, &changes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_quantity_times_price() {
        assert_eq!(compute_total(3, 50000.0), 150000.0);
        assert_eq!(compute_total(1, 0.0), 0.0);
        assert_eq!(compute_total(5, 19999.5), 99997.5);
    }

    #[test]
    fn changes_default_to_no_writes() {
        let c = TransactionChanges::default();
        assert!(c.product_name.is_none());
        assert!(c.total.is_none());
    }
}
