//! Break-even ROAS arithmetic. ROAS is revenue divided by ad spend; the
//! break-even point is where the per-unit margin exactly pays for the ads.

use super::dto::RoasBreakdown;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn roas_breakdown(
    selling_price: f64,
    purchase_price: f64,
    admin_fee_pct: f64,
    target_profit_pct: f64,
) -> RoasBreakdown {
    let admin_fee = (admin_fee_pct / 100.0) * selling_price;
    let target_profit = (target_profit_pct / 100.0) * selling_price;

    let margin_bep = selling_price - purchase_price - admin_fee;
    let margin_ideal = margin_bep - target_profit;

    // A non-positive margin means no ad budget can break even; report 0
    // rather than a division blow-up.
    let break_even_roas = if margin_bep > 0.0 {
        round2(selling_price / margin_bep)
    } else {
        0.0
    };
    let ideal_roas = if margin_ideal > 0.0 {
        round2(selling_price / margin_ideal)
    } else {
        0.0
    };

    RoasBreakdown {
        break_even_roas,
        ideal_roas,
        max_ad_budget: margin_bep.max(0.0),
        ideal_ad_budget: margin_ideal.max(0.0),
        profit_per_unit: target_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_even_on_a_typical_margin() {
        // sell 100k, cost 60k, 10% admin fee -> 30k margin
        let r = roas_breakdown(100_000.0, 60_000.0, 10.0, 0.0);
        assert_eq!(r.break_even_roas, 3.33);
        assert_eq!(r.max_ad_budget, 30_000.0);
        assert_eq!(r.profit_per_unit, 0.0);
        // without a profit target the two ratios coincide
        assert_eq!(r.ideal_roas, r.break_even_roas);
    }

    #[test]
    fn target_profit_tightens_the_budget() {
        let r = roas_breakdown(100_000.0, 60_000.0, 10.0, 15.0);
        assert_eq!(r.profit_per_unit, 15_000.0);
        assert_eq!(r.ideal_ad_budget, 15_000.0);
        assert_eq!(r.ideal_roas, 6.67);
        assert!(r.ideal_roas > r.break_even_roas);
    }

    #[test]
    fn unprofitable_products_report_zero_not_infinity() {
        let r = roas_breakdown(100_000.0, 110_000.0, 0.0, 0.0);
        assert_eq!(r.break_even_roas, 0.0);
        assert_eq!(r.ideal_roas, 0.0);
        assert_eq!(r.max_ad_budget, 0.0);
        assert_eq!(r.ideal_ad_budget, 0.0);
    }
}
