//! Point-accounting errors.

use pass_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("insufficient points: need {needed}, available {available}")]
    InsufficientBalance { needed: i64, available: i64 },

    #[error("give either an amount or a category, not both")]
    AmbiguousInput,

    #[error("amount must resolve to a positive number of points")]
    InvalidAmount,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PointsError {
    /// Stable reason code for callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "insufficient_balance",
            Self::AmbiguousInput => "ambiguous_input",
            Self::InvalidAmount => "invalid_amount",
            Self::Store(_) => "store_error",
        }
    }

    /// Whether this is a rejection of the request rather than an
    /// infrastructure failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}
