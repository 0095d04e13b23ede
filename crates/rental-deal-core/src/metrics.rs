use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Money, Rate};

/// Annual property tax as a fraction of purchase price (1.2%/yr).
pub const PROPERTY_TAX_ANNUAL_RATE: Decimal = dec!(0.012);
/// Flat monthly insurance estimate.
pub const INSURANCE_MONTHLY: Decimal = dec!(100);
/// Vacancy allowance as a fraction of gross monthly rent.
pub const VACANCY_PCT: Decimal = dec!(0.05);
/// Property management fee as a fraction of gross monthly rent.
pub const MANAGEMENT_PCT: Decimal = dec!(0.10);

const TWELVE: Decimal = dec!(12);

/// Monthly operating expense estimate, itemised. Excludes debt service so
/// the annualised total feeds NOI directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub property_tax: Money,
    pub insurance: Money,
    pub vacancy: Money,
    pub management: Money,
    pub maintenance_reserve: Money,
    /// Sum of the listing's itemised expense categories.
    pub other: Money,
}

impl ExpenseBreakdown {
    pub fn operating_monthly(&self) -> Money {
        self.property_tax
            + self.insurance
            + self.vacancy
            + self.management
            + self.maintenance_reserve
            + self.other
    }

    pub fn operating_annual(&self) -> Money {
        self.operating_monthly() * TWELVE
    }
}

/// Standard monthly operating expense estimate for a listing. The same
/// breakdown feeds both live analysis and stored-record recalculation, so
/// the two paths cannot drift apart.
pub fn operating_expenses(
    purchase_price: Money,
    monthly_rent: Money,
    maintenance_reserve_pct: Rate,
    itemised: &BTreeMap<String, Money>,
) -> ExpenseBreakdown {
    ExpenseBreakdown {
        property_tax: purchase_price * PROPERTY_TAX_ANNUAL_RATE / TWELVE,
        insurance: INSURANCE_MONTHLY,
        vacancy: monthly_rent * VACANCY_PCT,
        management: monthly_rent * MANAGEMENT_PCT,
        maintenance_reserve: monthly_rent * maintenance_reserve_pct,
        other: itemised.values().copied().sum(),
    }
}

/// Derived cash-flow and return metrics for one property snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealMetrics {
    /// Debt service plus all operating expenses
    pub total_monthly_expenses: Money,
    pub cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Annual rent minus annualised operating expenses, excluding debt service
    pub net_operating_income: Money,
    pub cap_rate: Rate,
    pub coc_return: Rate,
}

/// Derive all cash-flow and return metrics from a normalised expense
/// breakdown. Ratio denominators of zero yield 0, never a division error.
pub fn derive_metrics(
    purchase_price: Money,
    monthly_rent: Money,
    monthly_mortgage_payment: Money,
    expenses: &ExpenseBreakdown,
    total_cash_needed: Money,
) -> DealMetrics {
    let total_monthly_expenses = monthly_mortgage_payment + expenses.operating_monthly();
    let cash_flow = monthly_rent - total_monthly_expenses;
    let annual_cash_flow = cash_flow * TWELVE;

    let net_operating_income = monthly_rent * TWELVE - expenses.operating_annual();

    let cap_rate = if purchase_price > Decimal::ZERO {
        net_operating_income / purchase_price
    } else {
        Decimal::ZERO
    };

    let coc_return = if total_cash_needed > Decimal::ZERO {
        annual_cash_flow / total_cash_needed
    } else {
        Decimal::ZERO
    };

    DealMetrics {
        total_monthly_expenses,
        cash_flow,
        annual_cash_flow,
        net_operating_income,
        cap_rate,
        coc_return,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_itemised() -> BTreeMap<String, Money> {
        BTreeMap::new()
    }

    #[test]
    fn test_expense_breakdown_components() {
        let breakdown = operating_expenses(dec!(300000), dec!(2500), dec!(0.10), &no_itemised());

        // 300000 * 0.012 / 12 = 300
        assert_eq!(breakdown.property_tax, dec!(300));
        assert_eq!(breakdown.insurance, dec!(100));
        // 2500 * 5%
        assert_eq!(breakdown.vacancy, dec!(125));
        // 2500 * 10%
        assert_eq!(breakdown.management, dec!(250));
        // 2500 * 10% reserve
        assert_eq!(breakdown.maintenance_reserve, dec!(250.0));
        assert_eq!(breakdown.other, Decimal::ZERO);
        assert_eq!(breakdown.operating_monthly(), dec!(1025.0));
        assert_eq!(breakdown.operating_annual(), dec!(12300.0));
    }

    #[test]
    fn test_itemised_categories_are_summed() {
        let mut itemised = BTreeMap::new();
        itemised.insert("utilities".to_string(), dec!(150));
        itemised.insert("cleaning".to_string(), dec!(75));

        let breakdown = operating_expenses(dec!(300000), dec!(2500), dec!(0.10), &itemised);
        assert_eq!(breakdown.other, dec!(225));
    }

    #[test]
    fn test_metric_derivation() {
        let breakdown = operating_expenses(dec!(300000), dec!(2500), dec!(0.10), &no_itemised());
        let metrics = derive_metrics(dec!(300000), dec!(2500), dec!(1596.73), &breakdown, dec!(82500));

        assert_eq!(metrics.total_monthly_expenses, dec!(2621.73));
        assert_eq!(metrics.cash_flow, dec!(-121.73));
        assert_eq!(metrics.annual_cash_flow, dec!(-1460.76));
        // NOI = 30000 - 12300
        assert_eq!(metrics.net_operating_income, dec!(17700.0));
        assert_eq!(metrics.cap_rate, dec!(0.059));
        assert_eq!(metrics.coc_return, dec!(-1460.76) / dec!(82500));
    }

    #[test]
    fn test_zero_denominators_yield_zero_ratios() {
        let breakdown = operating_expenses(Decimal::ZERO, dec!(1000), dec!(0.10), &no_itemised());
        let metrics = derive_metrics(Decimal::ZERO, dec!(1000), dec!(500), &breakdown, Decimal::ZERO);

        assert_eq!(metrics.cap_rate, Decimal::ZERO);
        assert_eq!(metrics.coc_return, Decimal::ZERO);
    }

    #[test]
    fn test_rent_increase_never_decreases_metrics() {
        // Vacancy + management + reserve scale with rent at 25% combined,
        // so each extra rent dollar improves cash flow by 75 cents.
        let mut previous: Option<DealMetrics> = None;
        for rent in [dec!(2000), dec!(2500), dec!(3000), dec!(3500)] {
            let breakdown = operating_expenses(dec!(300000), rent, dec!(0.10), &no_itemised());
            let metrics =
                derive_metrics(dec!(300000), rent, dec!(1596.73), &breakdown, dec!(82500));
            if let Some(prev) = previous {
                assert!(metrics.cash_flow > prev.cash_flow);
                assert!(metrics.coc_return > prev.coc_return);
                assert!(metrics.cap_rate > prev.cap_rate);
            }
            previous = Some(metrics);
        }
    }
}
