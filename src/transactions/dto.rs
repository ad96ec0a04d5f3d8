use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalize::{flexible_f64, flexible_i32, flexible_opt_f64, flexible_opt_i32};

/// Payment channels accepted at the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Shopee,
    Tokopedia,
}

impl PaymentMethod {
    /// Case-insensitive with a safe default. "Tunai" is what older clients
    /// still send for cash.
    pub fn from_loose(raw: &str) -> PaymentMethod {
        match raw.trim().to_ascii_lowercase().as_str() {
            "shopee" => PaymentMethod::Shopee,
            "tokopedia" => PaymentMethod::Tokopedia,
            _ => PaymentMethod::Cash,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Shopee => "Shopee",
            PaymentMethod::Tokopedia => "Tokopedia",
        }
    }
}

/// A recorded sale. `product_name` is a snapshot taken at sale time, and
/// `product_id` is only a loose reference for stock tracking.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total: f64,
    pub payment_method: String,
    pub product_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

/// Note the absence of `total`: whatever the client sends is ignored and
/// the value recomputed on the server.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    pub product_name: String,
    #[serde(deserialize_with = "flexible_i32")]
    pub quantity: i32,
    #[serde(deserialize_with = "flexible_f64")]
    pub unit_price: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TransactionPatch {
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_i32")]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub unit_price: Option<f64>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
            && self.payment_method.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: TransactionPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTransactionRequest {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_methods_normalize_case_insensitively() {
        assert_eq!(PaymentMethod::from_loose("Shopee"), PaymentMethod::Shopee);
        assert_eq!(PaymentMethod::from_loose("SHOPEE"), PaymentMethod::Shopee);
        assert_eq!(
            PaymentMethod::from_loose(" tokopedia "),
            PaymentMethod::Tokopedia
        );
        assert_eq!(PaymentMethod::from_loose("cash"), PaymentMethod::Cash);
        // legacy value and garbage both land on the safe default
        assert_eq!(PaymentMethod::from_loose("Tunai"), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::from_loose("qris???"), PaymentMethod::Cash);
    }

    #[test]
    fn client_sent_total_is_ignored() {
        let req: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "product_name": "Kertas A4",
            "quantity": 3,
            "unit_price": 50000,
            "total": 999999
        }))
        .unwrap();
        assert_eq!(req.quantity, 3);
        assert_eq!(req.unit_price, 50000.0);
    }

    #[test]
    fn quantity_accepts_strings() {
        let req: CreateTransactionRequest = serde_json::from_value(serde_json::json!({
            "product_name": "Kertas A4",
            "quantity": "3",
            "unit_price": "50000,00"
        }))
        .unwrap();
        assert_eq!(req.quantity, 3);
        assert_eq!(req.unit_price, 50000.0);
    }

    #[test]
    fn oversized_quantity_is_rejected_not_wrapped() {
        // Above i32::MAX the quantity must never reach storage: a wrapped
        // value would break total == quantity * unit_price for the row.
        let res: Result<CreateTransactionRequest, _> =
            serde_json::from_value(serde_json::json!({
                "product_name": "Kertas A4",
                "quantity": i64::from(i32::MAX) + 2,
                "unit_price": 1000
            }));
        assert!(res.is_err());

        let res: Result<UpdateTransactionRequest, _> =
            serde_json::from_value(serde_json::json!({
                "id": "7f1a1d6e-3a5e-4d0e-9e39-9c9b8a3c1f00",
                "quantity": i64::from(i32::MAX) + 2
            }));
        assert!(res.is_err());
    }

    #[test]
    fn partial_update_body_flattens() {
        let req: UpdateTransactionRequest = serde_json::from_value(serde_json::json!({
            "id": "7f1a1d6e-3a5e-4d0e-9e39-9c9b8a3c1f00",
            "quantity": 5
        }))
        .unwrap();
        assert_eq!(req.patch.quantity, Some(5));
        assert!(req.patch.unit_price.is_none());
        assert!(TransactionPatch::default().is_empty());
    }
}
