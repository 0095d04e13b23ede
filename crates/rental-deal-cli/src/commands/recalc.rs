use clap::Args;
use serde_json::Value;

use rental_deal_core::recalc;
use rental_deal_core::types::AnalysisResult;

use crate::input;

/// Arguments for recomputing metrics from a stored analysis
#[derive(Args)]
pub struct RecalcArgs {
    /// Path to a stored analysis JSON file
    #[arg(long)]
    pub input: Option<String>,

    /// Path to investment criteria file (JSON or YAML); defaults otherwise
    #[arg(long)]
    pub criteria: Option<String>,
}

pub fn run_recalc(args: RecalcArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stored: AnalysisResult = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for recalc".into());
    };

    let criteria = super::load_criteria(&args.criteria)?;
    let corrected = recalc::recalculate(&stored, &criteria);
    Ok(serde_json::to_value(corrected)?)
}
