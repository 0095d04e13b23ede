use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_deal_core::analyzer::{self, FinancingAssumptions};
use rental_deal_core::mortgage::{HttpMortgageService, MortgageQuoteSource};
use rental_deal_core::types::PropertyRecord;

use crate::input;

/// Arguments for property analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON property file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to investment criteria file (JSON or YAML); defaults otherwise
    #[arg(long)]
    pub criteria: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Expected gross monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Street address (informational)
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub zip_code: Option<String>,

    /// Base URL of the external mortgage pricing service; manual formula
    /// only when omitted
    #[arg(long)]
    pub mortgage_api: Option<String>,

    /// Annual interest rate in percentage points (7.0 = 7%)
    #[arg(long, default_value = "7.0")]
    pub interest_rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub term_years: u32,

    /// Downpayment fraction override (e.g. 0.20); criteria-range midpoint otherwise
    #[arg(long)]
    pub downpayment_pct: Option<Decimal>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let property: PropertyRecord = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PropertyRecord {
            address: args.address.unwrap_or_default(),
            city: args.city.unwrap_or_default(),
            state: args.state.unwrap_or_default(),
            zip_code: args.zip_code.unwrap_or_default(),
            property_type: Default::default(),
            purchase_price: args
                .purchase_price
                .ok_or("--purchase-price is required (or provide --input)")?,
            monthly_rent: args
                .monthly_rent
                .ok_or("--monthly-rent is required (or provide --input)")?,
            bedrooms: None,
            bathrooms: None,
            square_footage: None,
            year_built: None,
            monthly_expenses: Default::default(),
            adr: None,
            occupancy_rate: None,
            funding_source: None,
            description: String::new(),
            listing_url: String::new(),
        }
    };

    let criteria = super::load_criteria(&args.criteria)?;
    let financing = FinancingAssumptions {
        annual_interest_rate_pct: args.interest_rate,
        term_years: args.term_years,
        downpayment_pct_override: args.downpayment_pct,
    };

    let service = match args.mortgage_api {
        Some(url) => Some(HttpMortgageService::with_default_timeout(url)?),
        None => None,
    };
    let external = service.as_ref().map(|s| s as &dyn MortgageQuoteSource);

    let result = analyzer::analyze(&property, &criteria, &financing, external)?;
    Ok(serde_json::to_value(result)?)
}
