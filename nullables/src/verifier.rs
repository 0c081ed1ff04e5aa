//! Nullable verifier: scripted authority answers.

use pass_verification::{IdentityVerifier, VerificationOutcome, VerificationRequest, VerifierError};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A verifier that answers from a script and records every request.
///
/// Once the script is exhausted every call returns the fallback outcome
/// (`Accepted` unless configured otherwise).
pub struct NullVerifier {
    script: Mutex<VecDeque<Result<VerificationOutcome, VerifierError>>>,
    fallback: VerificationOutcome,
    requests: Mutex<Vec<VerificationRequest>>,
}

impl NullVerifier {
    /// Accept everything.
    pub fn accepting() -> Self {
        Self::always(VerificationOutcome::Accepted)
    }

    /// Answer every request with `outcome`.
    pub fn always(outcome: VerificationOutcome) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: outcome,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue one answer ahead of the fallback.
    pub fn push(&self, answer: Result<VerificationOutcome, VerifierError>) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    /// Every request seen so far (for assertions).
    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for NullVerifier {
    fn default() -> Self {
        Self::accepting()
    }
}

impl IdentityVerifier for NullVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutcome, VerifierError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(self.fallback))
    }
}
