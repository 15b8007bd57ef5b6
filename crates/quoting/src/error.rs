use thiserror::Error;

/// Quote engine failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// No registered part has the requested part type.
    #[error("part type not found: {part_type}")]
    PartNotFound { part_type: String },

    /// The total does not fit the amount representation.
    #[error("quote amount overflow")]
    AmountOverflow,
}

impl QuoteError {
    pub fn part_not_found(part_type: impl Into<String>) -> Self {
        Self::PartNotFound {
            part_type: part_type.into(),
        }
    }
}
