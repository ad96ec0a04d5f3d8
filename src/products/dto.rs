use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalize::{flexible_f64, flexible_opt_f64, flexible_opt_i32};

/// Product row. Profit is derived from the two prices and never stored.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub code: Option<String>,
    pub name: String,
    pub image: Option<String>,
    pub purchase_price: f64,
    pub selling_price: f64,
    pub stock: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Product {
    pub fn profit(&self) -> f64 {
        self.selling_price - self.purchase_price
    }
}

#[derive(Debug, Deserialize)]
pub struct GetProductParams {
    pub id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub purchase_price: Option<f64>,
    #[serde(deserialize_with = "flexible_f64")]
    pub selling_price: f64,
    #[serde(default, deserialize_with = "flexible_opt_i32")]
    pub stock: Option<i32>,
}

/// Field mask for partial updates: only present fields are written.
#[derive(Debug, Default, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub selling_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_i32")]
    pub stock: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
            && self.name.is_none()
            && self.image.is_none()
            && self.purchase_price.is_none()
            && self.selling_price.is_none()
            && self.stock.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: ProductPatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProductRequest {
    pub id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profit_is_derived() {
        let p = Product {
            id: Uuid::new_v4(),
            code: None,
            name: "Kertas A4".into(),
            image: None,
            purchase_price: 35000.0,
            selling_price: 50000.0,
            stock: 10,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        assert_eq!(p.profit(), 15000.0);
    }

    #[test]
    fn create_accepts_string_prices() {
        let req: CreateProductRequest = serde_json::from_value(serde_json::json!({
            "name": "Kertas A4",
            "selling_price": "50.000,00",
            "stock": "10"
        }))
        .unwrap();
        assert_eq!(req.selling_price, 50000.0);
        assert_eq!(req.stock, Some(10));
        assert_eq!(req.purchase_price, None);
    }

    #[test]
    fn patch_flattens_beside_the_id() {
        let req: UpdateProductRequest = serde_json::from_value(serde_json::json!({
            "id": "7f1a1d6e-3a5e-4d0e-9e39-9c9b8a3c1f00",
            "stock": 4
        }))
        .unwrap();
        assert_eq!(req.patch.stock, Some(4));
        assert!(req.patch.name.is_none());
        assert!(!req.patch.is_empty());
        assert!(ProductPatch::default().is_empty());
    }

    #[test]
    fn oversized_stock_is_rejected_not_wrapped() {
        let res: Result<UpdateProductRequest, _> = serde_json::from_value(serde_json::json!({
            "id": "7f1a1d6e-3a5e-4d0e-9e39-9c9b8a3c1f00",
            "stock": i64::from(i32::MAX) + 1
        }));
        assert!(res.is_err());

        let res: Result<CreateProductRequest, _> = serde_json::from_value(serde_json::json!({
            "name": "Kertas A4",
            "selling_price": 50000,
            "stock": 4_000_000_000_i64
        }));
        assert!(res.is_err());
    }
}
