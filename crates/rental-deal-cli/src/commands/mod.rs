pub mod analyze;
pub mod criteria;
pub mod mortgage;
pub mod recalc;

use rental_deal_core::criteria::InvestmentCriteria;

use crate::input;

/// Load a criteria file when given, defaults otherwise.
pub(crate) fn load_criteria(
    path: &Option<String>,
) -> Result<InvestmentCriteria, Box<dyn std::error::Error>> {
    match path {
        Some(p) => input::file::read_criteria(p),
        None => Ok(InvestmentCriteria::default()),
    }
}
