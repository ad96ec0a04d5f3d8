use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::normalize::flexible_opt_f64;

/// Inputs for the break-even ROAS calculation. Percentages are 0-100 and
/// taken of the selling price. Prices may come from an existing product
/// (`product_id`) or be given directly; explicit values win.
#[derive(Debug, Deserialize)]
pub struct RoasParams {
    #[serde(default)]
    pub product_id: Option<Uuid>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub selling_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub purchase_price: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub admin_fee_pct: Option<f64>,
    #[serde(default, deserialize_with = "flexible_opt_f64")]
    pub target_profit_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoasBreakdown {
    /// Revenue-to-ad-spend ratio at which the product breaks even.
    pub break_even_roas: f64,
    /// The ratio that still leaves the target profit per unit.
    pub ideal_roas: f64,
    pub max_ad_budget: f64,
    pub ideal_ad_budget: f64,
    pub profit_per_unit: f64,
}
