//! Fundamental types for the point economy.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, timestamps and clocks, point categories, profile fields, and
//! the randomness abstraction.

pub mod category;
pub mod error;
pub mod identity;
pub mod profile;
pub mod random;
pub mod time;

pub use category::PointCategory;
pub use error::PassError;
pub use identity::{Identity, Member, MAX_IDENTITY_LEN};
pub use profile::ProfileField;
pub use random::RandomSource;
pub use time::{Clock, SystemClock, Timestamp, SECS_PER_DAY, SECS_PER_HOUR};
