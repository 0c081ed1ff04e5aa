//! Profile change gate.
//!
//! Every change to an identity-linked profile field passes, in order:
//!
//! 1. the global profile lock (stored, shared by every running instance),
//! 2. the per-field cooldown derived from the change log,
//! 3. format validation,
//! 4. the identity verifier (email and wallet only, cross-checked as a pair),
//!
//! and, once accepted, is persisted together with its change-log row. The
//! first time a field is set the member receives a one-time bonus.

pub mod config;
pub mod error;
pub mod gate;
pub mod validate;

pub use config::ProfileConfig;
pub use error::ProfileError;
pub use gate::{IncompleteProfile, ProfileGate, ProfileUpdate, ProfileView};
pub use validate::normalize;
