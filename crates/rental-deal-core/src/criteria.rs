use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Monthly rent must be at least this fraction of purchase price (1% rule).
const ONE_PERCENT: Decimal = dec!(0.01);

/// Thresholds applied only to short-term-rental listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrRules {
    /// Minimum average daily rate
    pub min_adr: Money,
    /// Minimum occupancy as a decimal (0.60 = 60%)
    pub min_occupancy: Rate,
    /// Minimum projected annual revenue / purchase price
    pub min_gross_yield: Rate,
    pub min_annual_revenue: Money,
}

impl Default for StrRules {
    fn default() -> Self {
        Self {
            min_adr: dec!(100),
            min_occupancy: dec!(0.60),
            min_gross_yield: dec!(0.10),
            min_annual_revenue: dec!(30000),
        }
    }
}

/// Process-wide investment criteria. Loaded once from configuration and
/// passed explicitly to every entry point; the engine never reads it from
/// ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentCriteria {
    pub max_purchase_price: Money,
    /// Anticipated downpayment range; the analyzer uses the midpoint unless
    /// the caller overrides it.
    pub downpayment_pct_min: Rate,
    pub downpayment_pct_max: Rate,
    /// Closing costs as a fraction of purchase price
    pub closing_cost_pct: Rate,
    /// Initial fixed costs (inspections, initial repairs) as a fraction of price
    pub initial_fixed_cost_pct: Rate,
    /// Maintenance reserve as a fraction of gross monthly rent
    pub maintenance_reserve_pct: Rate,
    /// Cash-on-cash return floor
    pub min_coc_return: Rate,
    /// Cap rate floor
    pub min_cap_rate: Rate,
    pub str_rules: StrRules,
}

impl Default for InvestmentCriteria {
    fn default() -> Self {
        Self {
            max_purchase_price: dec!(350000),
            downpayment_pct_min: dec!(0.20),
            downpayment_pct_max: dec!(0.25),
            closing_cost_pct: dec!(0.04),
            initial_fixed_cost_pct: dec!(0.01),
            maintenance_reserve_pct: dec!(0.10),
            min_coc_return: dec!(0.08),
            min_cap_rate: dec!(0.05),
            str_rules: StrRules::default(),
        }
    }
}

impl InvestmentCriteria {
    /// Midpoint of the anticipated downpayment range.
    pub fn downpayment_midpoint(&self) -> Rate {
        (self.downpayment_pct_min + self.downpayment_pct_max) / dec!(2)
    }
}

/// Monthly rent at or above 1% of purchase price.
pub fn passes_one_percent_rule(monthly_rent: Money, purchase_price: Money) -> bool {
    monthly_rent >= purchase_price * ONE_PERCENT
}

pub fn cash_flow_positive(cash_flow: Money) -> bool {
    cash_flow > Decimal::ZERO
}

pub fn meets_coc_minimum(coc_return: Rate, criteria: &InvestmentCriteria) -> bool {
    coc_return >= criteria.min_coc_return
}

pub fn meets_cap_minimum(cap_rate: Rate, criteria: &InvestmentCriteria) -> bool {
    cap_rate >= criteria.min_cap_rate
}

/// Diagnostic only; does not feed the aggregate verdict.
pub fn within_max_purchase_price(purchase_price: Money, criteria: &InvestmentCriteria) -> bool {
    purchase_price <= criteria.max_purchase_price
}

/// Individual rule outcomes feeding the aggregate verdict. Each flag stays
/// independently inspectable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleChecks {
    pub passes_one_percent_rule: bool,
    pub cash_flow_positive: bool,
    pub coc_meets_minimum: bool,
    pub cap_meets_minimum: bool,
    /// Present only for STR listings.
    pub str_meets_criteria: Option<bool>,
}

/// Logical AND of the applicable rule subset. STR thresholds participate
/// only when the listing was evaluated as an STR.
pub fn aggregate_verdict(checks: &RuleChecks) -> bool {
    checks.passes_one_percent_rule
        && checks.cash_flow_positive
        && checks.coc_meets_minimum
        && checks.cap_meets_minimum
        && checks.str_meets_criteria.unwrap_or(true)
}
