use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::criteria::StrRules;
use crate::types::{Money, PropertyRecord, Rate};

const DAYS_PER_YEAR: Decimal = dec!(365);

/// Short-term-rental projection and per-threshold rule outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrMetrics {
    /// ADR x occupied days per year
    pub projected_annual_revenue: Money,
    /// Projected annual revenue / purchase price
    pub projected_gross_yield: Rate,
    pub meets_adr_minimum: bool,
    pub meets_occupancy_minimum: bool,
    pub meets_gross_yield_minimum: bool,
    pub meets_revenue_minimum: bool,
    pub meets_criteria: bool,
}

/// Evaluate STR thresholds for a listing. Returns `None` for listings that
/// do not carry ADR + occupancy data; those are not judged under STR rules.
pub fn evaluate_str(property: &PropertyRecord, rules: &StrRules) -> Option<StrMetrics> {
    let adr = property.adr?;
    let occupancy = property.occupancy_rate?;

    let projected_annual_revenue = adr * DAYS_PER_YEAR * occupancy;
    let projected_gross_yield = if property.purchase_price > Decimal::ZERO {
        projected_annual_revenue / property.purchase_price
    } else {
        Decimal::ZERO
    };

    let meets_adr_minimum = adr >= rules.min_adr;
    let meets_occupancy_minimum = occupancy >= rules.min_occupancy;
    let meets_gross_yield_minimum = projected_gross_yield >= rules.min_gross_yield;
    let meets_revenue_minimum = projected_annual_revenue >= rules.min_annual_revenue;

    Some(StrMetrics {
        projected_annual_revenue,
        projected_gross_yield,
        meets_adr_minimum,
        meets_occupancy_minimum,
        meets_gross_yield_minimum,
        meets_revenue_minimum,
        meets_criteria: meets_adr_minimum
            && meets_occupancy_minimum
            && meets_gross_yield_minimum
            && meets_revenue_minimum,
    })
}
