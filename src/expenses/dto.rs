use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::normalize::{flexible_f64, flexible_opt_f64};

/// A miscellaneous expense; unrelated to products or sales.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub cost: f64,
    pub date: Date,
    pub notes: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(deserialize_with = "flexible_f64")]
    pub cost: f64,
    pub date: Date,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpensePatch {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub cost: Option<f64>,
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.description.is_none()
            && self.cost.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateExpenseRequest {
    pub id: Uuid,
    #[serde(flatten)]
    pub patch: ExpensePatch,
}

#[derive(Debug, Deserialize)]
pub struct DeleteExpenseRequest {
    pub id: Uuid,
}
