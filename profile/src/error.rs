use pass_ledger::PointsError;
use pass_store::StoreError;
use pass_types::ProfileField;
use pass_verification::{VerificationReason, VerifierError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("profile changes are locked")]
    ProfileLocked,

    #[error("{field} was changed recently; try again in {remaining_secs}s")]
    CooldownActive { field: ProfileField, remaining_secs: u64 },

    #[error("no value given for {0}")]
    MissingValue(ProfileField),

    #[error("'{value}' is not a valid {field}")]
    InvalidFormat { field: ProfileField, value: String },

    #[error("verification rejected the change: {0}")]
    VerificationFailed(VerificationReason),

    #[error(transparent)]
    Verifier(#[from] VerifierError),

    #[error(transparent)]
    Points(#[from] PointsError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProfileError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProfileLocked => "profile_locked",
            Self::CooldownActive { .. } => "cooldown_active",
            Self::MissingValue(_) => "missing_value",
            Self::InvalidFormat { .. } => "invalid_format",
            Self::VerificationFailed(reason) => reason.code(),
            Self::Verifier(e) => e.code(),
            Self::Points(e) => e.code(),
            Self::Store(_) => "store_error",
        }
    }
}
