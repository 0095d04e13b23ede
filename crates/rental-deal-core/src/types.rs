use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::str_rental::StrMetrics;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%) unless a field says otherwise.
pub type Rate = Decimal;

/// Listing category. Anything that is not a recognised residential
/// rental type maps to `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    #[default]
    SingleFamily,
    MultiFamily,
    Other,
}

/// A property listing as received from upstream ingestion. Immutable input
/// to analysis; only `purchase_price` and `monthly_rent` are mandatory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub property_type: PropertyType,
    /// Asking / contract price. Must be positive for ratio math.
    pub purchase_price: Money,
    /// Expected gross monthly rent.
    pub monthly_rent: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub square_footage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_built: Option<u32>,
    /// Itemised monthly expense estimates by category
    /// (utilities, cleaning, supplies, other). Missing categories count as 0.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub monthly_expenses: BTreeMap<String, Money>,
    /// Average daily rate, present only on short-term-rental listings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adr: Option<Money>,
    /// Expected occupancy as a decimal (0.65 = 65%), STR listings only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy_rate: Option<Rate>,
    /// Informational tag (e.g. "conventional", "seller-finance"). Unused in math.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_source: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub listing_url: String,
}

impl PropertyRecord {
    /// STR listings are identified by carrying both ADR and occupancy data.
    pub fn is_short_term_rental(&self) -> bool {
        self.adr.is_some() && self.occupancy_rate.is_some()
    }
}

/// Complete analysis of one property snapshot at one point in time.
/// Read-only once produced; superseded, never mutated.
///
/// Derived numeric fields default to zero on deserialization so that stored
/// records written before a given field existed still load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// The exact property snapshot this analysis was derived from.
    pub property: PropertyRecord,
    #[serde(default)]
    pub calculated_downpayment: Money,
    #[serde(default)]
    pub calculated_closing_costs: Money,
    #[serde(default)]
    pub calculated_initial_fixed_costs: Money,
    #[serde(default)]
    pub estimated_maintenance_reserve: Money,
    #[serde(default)]
    pub total_cash_needed: Money,
    #[serde(default)]
    pub loan_amount: Money,
    /// Monthly principal & interest. Absent on records stored before the
    /// mortgage path existed; the recalculator re-derives it in that case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_mortgage_payment: Option<Money>,
    /// True when the payment came from the manual closed-form fallback
    /// rather than the external pricing service.
    #[serde(default)]
    pub mortgage_used_fallback: bool,
    #[serde(default)]
    pub total_monthly_expenses: Money,
    #[serde(default)]
    pub cash_flow: Money,
    #[serde(default)]
    pub annual_cash_flow: Money,
    #[serde(default)]
    pub coc_return: Rate,
    #[serde(default)]
    pub cap_rate: Rate,
    #[serde(default)]
    pub net_operating_income: Money,
    #[serde(default)]
    pub passes_one_percent_rule: bool,
    #[serde(default)]
    pub cash_flow_positive: bool,
    #[serde(default)]
    pub coc_meets_minimum: bool,
    #[serde(default)]
    pub cap_meets_minimum: bool,
    #[serde(default)]
    pub within_max_purchase_price: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub str_metrics: Option<StrMetrics>,
    /// Aggregate verdict over the applicable rule subset.
    #[serde(default)]
    pub meets_criteria: bool,
    pub analysis_date: DateTime<Utc>,
}

/// Transient corrected view of a stored analysis, for presentation only.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectedMetrics {
    pub cash_flow: Money,
    pub coc_return: Rate,
    pub cap_rate: Rate,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
