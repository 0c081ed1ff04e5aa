//! Ordered decision table over an authority response.
//!
//! The order of the checks is part of the contract: an email failure
//! dominates a wallet failure, and a mismatch is only considered once both
//! values have passed their individual checks.

use crate::outcome::{VerificationOutcome, VerificationReason};
use crate::wire::{UserCheckResponse, VerificationRequest};

/// Classify the authority's answer to `request`.
///
/// `response` is `None` when the authority returned no usable body.
pub fn classify(request: &VerificationRequest, response: Option<&UserCheckResponse>) -> VerificationOutcome {
    use VerificationReason::*;

    let Some(response) = response else {
        return ResponseNull.into();
    };
    let Some(data) = response.data.as_ref() else {
        return DataNull.into();
    };

    let email_rejected = data.verified_email.as_ref().is_some_and(|e| !e.is_pass_email);
    let wallet_rejected = data
        .verified_wallet_address
        .as_ref()
        .is_some_and(|w| !w.is_pass_wallet_address);

    if email_rejected {
        return if wallet_rejected {
            BothNotRecognized.into()
        } else {
            EmailNotRecognized.into()
        };
    }
    if wallet_rejected {
        return WalletNotRecognized.into();
    }

    let both_verified = data.verified_email.is_some() && data.verified_wallet_address.is_some();
    if request.has_email() && request.has_wallet() && both_verified {
        let matched = data
            .match_status
            .is_some_and(|m| m.is_email_match_with_wallet_address);
        if !matched {
            return EmailWalletMismatch.into();
        }
    }

    if data.verified_email.is_none() && data.verified_wallet_address.is_none() {
        return AmbiguousVerificationState.into();
    }

    VerificationOutcome::Accepted
}
