use clap::Args;
use serde_json::Value;

/// Arguments for inspecting the active criteria set
#[derive(Args)]
pub struct CriteriaArgs {
    /// Path to investment criteria file (JSON or YAML); defaults otherwise
    #[arg(long)]
    pub criteria: Option<String>,
}

pub fn run_criteria(args: CriteriaArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let criteria = super::load_criteria(&args.criteria)?;
    Ok(serde_json::to_value(criteria)?)
}
