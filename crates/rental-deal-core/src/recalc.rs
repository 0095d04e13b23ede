use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::criteria::InvestmentCriteria;
use crate::metrics;
use crate::mortgage;
use crate::types::{AnalysisResult, CorrectedMetrics};

/// Assumed when a stored record predates per-analysis mortgage payments.
/// Explicit policy: corrected views of such records always price the loan
/// at 7% over 30 years, regardless of the rate the original analysis used.
const RECALC_FALLBACK_RATE_PCT: Decimal = dec!(7.0);
const RECALC_FALLBACK_TERM_YEARS: u32 = 30;

/// Recompute cash flow, COC return and cap rate from a stored analysis's
/// embedded property snapshot, for display consistency after formula fixes.
///
/// Pure projection: never touches persisted state, never fails. Stored
/// records may predate fields or carry degenerate values; every such case
/// degrades to zero-valued metrics instead of an error.
pub fn recalculate(stored: &AnalysisResult, criteria: &InvestmentCriteria) -> CorrectedMetrics {
    let property = &stored.property;
    let purchase_price = property.purchase_price.max(Decimal::ZERO);
    let monthly_rent = property.monthly_rent.max(Decimal::ZERO);

    let monthly_payment = stored
        .monthly_mortgage_payment
        .unwrap_or_else(|| fallback_payment(stored, criteria));

    let expenses = metrics::operating_expenses(
        purchase_price,
        monthly_rent,
        criteria.maintenance_reserve_pct,
        &property.monthly_expenses,
    );

    let total_cash_needed = if stored.total_cash_needed > Decimal::ZERO {
        stored.total_cash_needed
    } else {
        purchase_price
            * (criteria.downpayment_midpoint()
                + criteria.closing_cost_pct
                + criteria.initial_fixed_cost_pct)
    };

    let deal = metrics::derive_metrics(
        purchase_price,
        monthly_rent,
        monthly_payment,
        &expenses,
        total_cash_needed,
    );

    CorrectedMetrics {
        cash_flow: deal.cash_flow,
        coc_return: deal.coc_return,
        cap_rate: deal.cap_rate,
    }
}

/// 7%/30-year payment on the stored loan, re-deriving the loan from the
/// snapshot at the criteria midpoint when the record predates that field.
fn fallback_payment(stored: &AnalysisResult, criteria: &InvestmentCriteria) -> Decimal {
    let loan_amount = if stored.loan_amount > Decimal::ZERO {
        stored.loan_amount
    } else {
        let price = stored.property.purchase_price.max(Decimal::ZERO);
        price - price * criteria.downpayment_midpoint()
    };

    if loan_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    mortgage::manual_monthly_payment(loan_amount, RECALC_FALLBACK_RATE_PCT, RECALC_FALLBACK_TERM_YEARS)
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{analyze, FinancingAssumptions};
    use crate::types::PropertyRecord;
    use rust_decimal_macros::dec;

    /// Minimal stored record as an older release would have persisted it:
    /// property snapshot plus timestamp, no derived metric fields at all.
    fn legacy_record(purchase_price: &str, monthly_rent: &str) -> AnalysisResult {
        let json = format!(
            r#"{{
                "property": {{
                    "address": "8 Cedar Ct",
                    "purchase_price": "{purchase_price}",
                    "monthly_rent": "{monthly_rent}"
                }},
                "analysis_date": "2023-11-02T09:14:00Z"
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_legacy_record_deserializes_with_defaults() {
        let stored = legacy_record("250000", "2400");
        assert_eq!(stored.cash_flow, Decimal::ZERO);
        assert_eq!(stored.monthly_mortgage_payment, None);
        assert!(!stored.meets_criteria);
    }

    #[test]
    fn test_zero_purchase_price_degrades_to_zero_ratios() {
        let stored = legacy_record("0", "1500");
        let corrected = recalculate(&stored, &InvestmentCriteria::default());

        assert_eq!(corrected.coc_return, Decimal::ZERO);
        assert_eq!(corrected.cap_rate, Decimal::ZERO);
    }

    #[test]
    fn test_missing_payment_uses_fixed_assumption() {
        let stored = legacy_record("300000", "3200");
        let corrected = recalculate(&stored, &InvestmentCriteria::default());

        // Loan re-derived at the 22.5% midpoint, priced at 7%/30y
        let payment = mortgage::manual_monthly_payment(dec!(232500.0), dec!(7.0), 30).unwrap();
        let expenses = metrics::operating_expenses(
            dec!(300000),
            dec!(3200),
            InvestmentCriteria::default().maintenance_reserve_pct,
            &Default::default(),
        );
        assert_eq!(
            corrected.cash_flow,
            dec!(3200) - payment - expenses.operating_monthly()
        );
    }

    #[test]
    fn test_agrees_with_live_analysis() {
        // The live path and the corrected view share one metric kernel, so
        // recalculating a fresh analysis must reproduce it exactly.
        let property = PropertyRecord {
            address: "77 Lakeview Dr".into(),
            city: "Madison".into(),
            state: "AL".into(),
            zip_code: "35758".into(),
            property_type: Default::default(),
            purchase_price: dec!(280000),
            monthly_rent: dec!(2950),
            bedrooms: Some(4),
            bathrooms: Some(dec!(2.5)),
            square_footage: Some(2100),
            year_built: Some(2004),
            monthly_expenses: Default::default(),
            adr: None,
            occupancy_rate: None,
            funding_source: None,
            description: String::new(),
            listing_url: String::new(),
        };
        let criteria = InvestmentCriteria::default();
        let out = analyze(&property, &criteria, &FinancingAssumptions::default(), None).unwrap();

        let corrected = recalculate(&out.result, &criteria);
        assert_eq!(corrected.cash_flow, out.result.cash_flow);
        assert_eq!(corrected.coc_return, out.result.coc_return);
        assert_eq!(corrected.cap_rate, out.result.cap_rate);
    }

    #[test]
    fn test_stored_payment_is_preferred_over_assumption() {
        let mut stored = legacy_record("300000", "3200");
        stored.monthly_mortgage_payment = Some(dec!(1100));
        let with_stored = recalculate(&stored, &InvestmentCriteria::default());

        stored.monthly_mortgage_payment = None;
        let with_fallback = recalculate(&stored, &InvestmentCriteria::default());

        // 7%/30y on 232500 prices well above 1100/mo
        assert!(with_stored.cash_flow > with_fallback.cash_flow);
    }

    #[test]
    fn test_never_panics_on_degenerate_snapshot() {
        let stored = legacy_record("-50000", "-200");
        let corrected = recalculate(&stored, &InvestmentCriteria::default());
        // Clamped snapshot leaves only the flat insurance estimate
        assert_eq!(corrected.cash_flow, dec!(-100));
        assert_eq!(corrected.cap_rate, Decimal::ZERO);
        assert_eq!(corrected.coc_return, Decimal::ZERO);
    }
}
