pub mod curve;
pub mod density;
pub mod params;
pub mod worst_case;

pub use curve::{CurveOptions, DensityCurve, DensitySample};
pub use params::{DistributionModel, DistributionStatistics, InvestmentDistributionParams};
pub use worst_case::{PercentileLadder, WorstCaseOutcome};
