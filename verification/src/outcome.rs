//! Verification outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the authority's answer does not permit the change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerificationReason {
    /// No response body, a JSON `null`, or a body that is not a response.
    ResponseNull,
    /// A response without a `data` payload.
    DataNull,
    BothNotRecognized,
    EmailNotRecognized,
    WalletNotRecognized,
    /// Both values are known individually but not to the same account.
    EmailWalletMismatch,
    /// Neither a verified-email nor a verified-wallet object was returned.
    AmbiguousVerificationState,
}

impl VerificationReason {
    /// Stable reason code for callers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ResponseNull => "response_null",
            Self::DataNull => "data_null",
            Self::BothNotRecognized => "both_not_recognized",
            Self::EmailNotRecognized => "email_not_recognized",
            Self::WalletNotRecognized => "wallet_not_recognized",
            Self::EmailWalletMismatch => "email_wallet_mismatch",
            Self::AmbiguousVerificationState => "ambiguous_verification_state",
        }
    }

    /// User-facing explanation.
    pub fn message(&self) -> &'static str {
        match self {
            Self::ResponseNull => "verification response is empty; contact an admin",
            Self::DataNull => "verification response carries no data; contact an admin",
            Self::BothNotRecognized => "neither the email nor the wallet is connected to an account",
            Self::EmailNotRecognized => "the email is not connected to an account",
            Self::WalletNotRecognized => "the wallet is not connected to an account",
            Self::EmailWalletMismatch => "the email and wallet do not belong to the same account",
            Self::AmbiguousVerificationState => "verification statuses are missing; contact an admin",
        }
    }
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Terminal result of one verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationOutcome {
    Accepted,
    Rejected(VerificationReason),
}

impl VerificationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Rejected(reason) => reason.code(),
        }
    }
}

impl From<VerificationReason> for VerificationOutcome {
    fn from(reason: VerificationReason) -> Self {
        Self::Rejected(reason)
    }
}
