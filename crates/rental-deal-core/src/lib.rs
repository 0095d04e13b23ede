pub mod analyzer;
pub mod criteria;
pub mod error;
pub mod metrics;
pub mod mortgage;
pub mod recalc;
pub mod str_rental;
pub mod types;

pub use error::DealEngineError;
pub use types::*;

/// Standard result type for all deal-engine operations
pub type DealResult<T> = Result<T, DealEngineError>;
