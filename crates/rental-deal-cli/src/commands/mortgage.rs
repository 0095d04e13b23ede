use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_deal_core::mortgage::{
    compute_mortgage, HttpMortgageService, MortgageInputs, MortgageQuoteSource,
};

/// Arguments for a mortgage payment quote
#[derive(Args)]
pub struct MortgageArgs {
    /// Loan principal
    #[arg(long)]
    pub loan_amount: Decimal,

    /// Annual interest rate in percentage points (7.0 = 7%)
    #[arg(long)]
    pub interest_rate: Decimal,

    /// Loan term in years
    #[arg(long, default_value = "30")]
    pub years: u32,

    /// Base URL of the external mortgage pricing service; manual formula
    /// only when omitted
    #[arg(long)]
    pub mortgage_api: Option<String>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = MortgageInputs {
        loan_amount: args.loan_amount,
        interest_rate: args.interest_rate,
        duration_years: args.years,
    };

    let service = match args.mortgage_api {
        Some(url) => Some(HttpMortgageService::with_default_timeout(url)?),
        None => None,
    };
    let external = service.as_ref().map(|s| s as &dyn MortgageQuoteSource);

    let quote = compute_mortgage(&inputs, external)?;
    Ok(serde_json::to_value(quote)?)
}
