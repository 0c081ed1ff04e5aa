//! Identity verification against the external authority.
//!
//! The authority confirms that an email and/or wallet address belong to a
//! known account and, when both are submitted, that they belong to the
//! *same* account. This crate owns:
//!
//! - the wire types exchanged with the authority ([`wire`]),
//! - the ordered decision table turning a response into an outcome ([`classify`]),
//! - the [`IdentityVerifier`] seam with an HTTP client and an offline
//!   randomized stub selected by configuration.
//!
//! Transport failures are [`VerifierError`]s, never outcomes: an unreachable
//! authority can not be mistaken for an acceptance.

pub mod classify;
pub mod config;
pub mod debug;
pub mod error;
pub mod http;
pub mod outcome;
pub mod verifier;
pub mod wire;

pub use classify::classify;
pub use config::VerifierConfig;
pub use debug::{DebugVerifier, OsRandom};
pub use error::VerifierError;
pub use http::HttpVerifier;
pub use outcome::{VerificationOutcome, VerificationReason};
pub use verifier::{AuthorityVerifier, IdentityVerifier};
pub use wire::{MatchStatus, UserCheckData, UserCheckResponse, VerificationRequest, VerifiedEmail, VerifiedWallet};
