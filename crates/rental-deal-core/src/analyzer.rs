use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::criteria::{self, InvestmentCriteria, RuleChecks};
use crate::error::DealEngineError;
use crate::metrics;
use crate::mortgage::{self, MortgageInputs, MortgageQuoteSource};
use crate::str_rental;
use crate::types::{with_metadata, AnalysisResult, ComputationOutput, PropertyRecord, Rate};
use crate::DealResult;

/// Market financing assumptions for the mortgage leg of an analysis.
/// Configuration inputs, never derived from the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancingAssumptions {
    /// Annual interest rate in percentage points (7.0 = 7%)
    pub annual_interest_rate_pct: Decimal,
    pub term_years: u32,
    /// Overrides the criteria downpayment-range midpoint when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downpayment_pct_override: Option<Rate>,
}

impl Default for FinancingAssumptions {
    fn default() -> Self {
        Self {
            annual_interest_rate_pct: dec!(7.0),
            term_years: 30,
            downpayment_pct_override: None,
        }
    }
}

#[derive(Serialize)]
struct Assumptions<'a> {
    property: &'a PropertyRecord,
    criteria: &'a InvestmentCriteria,
    financing: &'a FinancingAssumptions,
}

fn validate_property(property: &PropertyRecord) -> DealResult<()> {
    if property.purchase_price <= Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if property.monthly_rent < Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "monthly_rent".into(),
            reason: "Monthly rent must not be negative".into(),
        });
    }
    Ok(())
}

/// Analyse a property listing against an investment criteria set.
///
/// Never mutates its inputs, and is deterministic given the same property,
/// criteria, and mortgage quote. The external pricing service (when a source
/// is supplied) is the only nondeterminism, and it surfaces solely through
/// `mortgage_used_fallback`.
pub fn analyze(
    property: &PropertyRecord,
    criteria: &InvestmentCriteria,
    financing: &FinancingAssumptions,
    external: Option<&dyn MortgageQuoteSource>,
) -> DealResult<ComputationOutput<AnalysisResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_property(property)?;

    // --- Acquisition costs ---
    let downpayment_pct = financing
        .downpayment_pct_override
        .unwrap_or_else(|| criteria.downpayment_midpoint());
    let calculated_downpayment = property.purchase_price * downpayment_pct;
    let calculated_closing_costs = property.purchase_price * criteria.closing_cost_pct;
    let calculated_initial_fixed_costs = property.purchase_price * criteria.initial_fixed_cost_pct;
    let total_cash_needed =
        calculated_downpayment + calculated_closing_costs + calculated_initial_fixed_costs;

    // --- Debt service ---
    let loan_amount = property.purchase_price - calculated_downpayment;
    let quote = mortgage::compute_mortgage(
        &MortgageInputs {
            loan_amount,
            interest_rate: financing.annual_interest_rate_pct,
            duration_years: financing.term_years,
        },
        external,
    )?;
    if external.is_some() && quote.used_fallback() {
        warnings.push("Pricing service unavailable; payment from manual amortisation".into());
    }

    // --- Operating expenses and derived metrics ---
    let expenses = metrics::operating_expenses(
        property.purchase_price,
        property.monthly_rent,
        criteria.maintenance_reserve_pct,
        &property.monthly_expenses,
    );
    let deal = metrics::derive_metrics(
        property.purchase_price,
        property.monthly_rent,
        quote.monthly_payment,
        &expenses,
        total_cash_needed,
    );

    // --- Rule evaluation ---
    let str_metrics = str_rental::evaluate_str(property, &criteria.str_rules);
    let checks = RuleChecks {
        passes_one_percent_rule: criteria::passes_one_percent_rule(
            property.monthly_rent,
            property.purchase_price,
        ),
        cash_flow_positive: criteria::cash_flow_positive(deal.cash_flow),
        coc_meets_minimum: criteria::meets_coc_minimum(deal.coc_return, criteria),
        cap_meets_minimum: criteria::meets_cap_minimum(deal.cap_rate, criteria),
        str_meets_criteria: str_metrics.as_ref().map(|m| m.meets_criteria),
    };
    let within_max_purchase_price =
        criteria::within_max_purchase_price(property.purchase_price, criteria);

    if !within_max_purchase_price {
        warnings.push(format!(
            "Purchase price {} exceeds criteria ceiling {}",
            property.purchase_price, criteria.max_purchase_price
        ));
    }
    if !checks.cash_flow_positive {
        warnings.push(format!("Negative monthly cash flow: {}", deal.cash_flow));
    }

    let result = AnalysisResult {
        property: property.clone(),
        calculated_downpayment,
        calculated_closing_costs,
        calculated_initial_fixed_costs,
        estimated_maintenance_reserve: expenses.maintenance_reserve,
        total_cash_needed,
        loan_amount,
        monthly_mortgage_payment: Some(quote.monthly_payment),
        mortgage_used_fallback: quote.used_fallback(),
        total_monthly_expenses: deal.total_monthly_expenses,
        cash_flow: deal.cash_flow,
        annual_cash_flow: deal.annual_cash_flow,
        coc_return: deal.coc_return,
        cap_rate: deal.cap_rate,
        net_operating_income: deal.net_operating_income,
        passes_one_percent_rule: checks.passes_one_percent_rule,
        cash_flow_positive: checks.cash_flow_positive,
        coc_meets_minimum: checks.coc_meets_minimum,
        cap_meets_minimum: checks.cap_meets_minimum,
        within_max_purchase_price,
        str_metrics,
        meets_criteria: criteria::aggregate_verdict(&checks),
        analysis_date: Utc::now(),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Deal Analysis (Cash Flow / COC / Cap Rate)",
        &Assumptions {
            property,
            criteria,
            financing,
        },
        warnings,
        elapsed,
        result,
    ))
}
