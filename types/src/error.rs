//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing the shared types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PassError {
    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("identity is {len} bytes, longer than the {max}-byte limit")]
    IdentityTooLong { len: usize, max: usize },

    #[error("unknown point category: {0}")]
    UnknownCategory(String),

    #[error("unknown profile field: {0}")]
    UnknownField(String),
}
