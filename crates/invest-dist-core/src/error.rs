use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvestDistError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid probability: {0} is outside the open interval (0, 1)")]
    InvalidProbability(f64),

    #[error("Degenerate distribution in {context}: spread is zero or range is empty")]
    DegenerateDistribution { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for InvestDistError {
    fn from(e: serde_json::Error) -> Self {
        InvestDistError::SerializationError(e.to_string())
    }
}
