pub mod amortization;
pub mod error;
pub mod format;
pub mod schedule;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(feature = "loan")]
pub mod loan;

#[cfg(feature = "mortgage")]
pub mod mortgage;

#[cfg(feature = "bmi")]
pub mod bmi;

pub use error::CalcHubError;
pub use types::*;

/// Standard result type for all calc-hub operations
pub type CalcHubResult<T> = Result<T, CalcHubError>;
