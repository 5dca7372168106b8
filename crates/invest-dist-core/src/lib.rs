pub mod error;
pub mod special;
pub mod types;

#[cfg(feature = "distribution")]
pub mod distribution;

#[cfg(feature = "analysis")]
pub mod analysis;

#[cfg(feature = "settings")]
pub mod settings;

pub use error::InvestDistError;
pub use types::*;

/// Standard result type for all invest-dist operations
pub type InvestDistResult<T> = Result<T, InvestDistError>;
