//! Offline randomized stand-in for the authority.
//!
//! Synthesises a random authority response and runs it through the same
//! [`classify`] table as real answers, so it can only produce outcomes from
//! the shared taxonomy.

use pass_types::RandomSource;

use crate::classify::classify;
use crate::error::VerifierError;
use crate::outcome::VerificationOutcome;
use crate::verifier::IdentityVerifier;
use crate::wire::{MatchStatus, UserCheckData, UserCheckResponse, VerificationRequest, VerifiedEmail, VerifiedWallet};

/// Operating-system randomness via `getrandom`.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill_bytes(&self, buf: &mut [u8]) {
        if let Err(e) = getrandom::getrandom(buf) {
            tracing::warn!(error = %e, "OS randomness unavailable, using zeros");
            buf.fill(0);
        }
    }
}

pub struct DebugVerifier<R = OsRandom> {
    random: R,
}

impl DebugVerifier<OsRandom> {
    pub fn new() -> Self {
        Self { random: OsRandom }
    }
}

impl Default for DebugVerifier<OsRandom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> DebugVerifier<R> {
    pub fn with_random(random: R) -> Self {
        Self { random }
    }

    /// A response shaped like the authority's, with random flags.
    ///
    /// One byte in sixteen yields no response and another no data, so the
    /// infrastructure reasons show up in offline runs too.
    pub fn synthesize(&self, request: &VerificationRequest) -> Option<UserCheckResponse> {
        let mut roll = [0u8; 1];
        self.random.fill_bytes(&mut roll);
        match roll[0] % 16 {
            0 => return None,
            1 => return Some(UserCheckResponse::default()),
            _ => {}
        }

        let verified_email = request.email.as_ref().map(|email| VerifiedEmail {
            email: email.clone(),
            is_pass_email: self.random.next_bool(),
        });
        let verified_wallet_address = request.wallet_address.as_ref().map(|wallet| VerifiedWallet {
            wallet_address: wallet.clone(),
            is_pass_wallet_address: self.random.next_bool(),
        });
        let match_status = (verified_email.is_some() && verified_wallet_address.is_some()).then(|| MatchStatus {
            is_email_match_with_wallet_address: self.random.next_bool(),
        });

        Some(UserCheckResponse {
            data: Some(UserCheckData {
                verified_email,
                verified_wallet_address,
                match_status,
            }),
            meta: None,
        })
    }
}

impl<R: RandomSource> IdentityVerifier for DebugVerifier<R> {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutcome, VerifierError> {
        if request.is_empty() {
            return Err(VerifierError::EmptyRequest);
        }
        let response = self.synthesize(request);
        let outcome = classify(request, response.as_ref());
        tracing::debug!(outcome = outcome.code(), "debug verifier answered");
        Ok(outcome)
    }
}
