//! Check-in accumulator.
//!
//! Each identity may check in once per 23-hour window. Every check-in
//! advances a 0-based iterator; the check-in that reaches the configured
//! threshold pays the reward and resets the iterator to 0, in the same store
//! transaction as the progress update. The cycle repeats indefinitely.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{CheckInConfig, CHECK_IN_COOLDOWN_SECS};
pub use engine::{CheckInEngine, CheckInReceipt, CheckInStatus, RewardPaid};
pub use error::CheckInError;
