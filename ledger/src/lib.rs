//! Point accounting over the balance table and the audit ledger.
//!
//! - [`PointAssigner`] applies signed deltas. Each accepted delta upserts the
//!   balance row and appends one immutable ledger row in the same store
//!   transaction; a debit that would go below zero writes nothing.
//! - [`BulkReset`] wipes every balance and soft-deletes the matching ledger
//!   rows, attributing the removal to the acting administrator.
//!
//! Invariant: for every identity, `balance == Σ delta` over its active
//! ledger rows.

pub mod assigner;
pub mod config;
pub mod error;
pub mod reset;

pub use assigner::{CreditReceipt, PointAssigner};
pub use config::PointsConfig;
pub use error::PointsError;
pub use reset::BulkReset;
