use pass_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckInError {
    #[error("already checked in; try again in {remaining_secs}s")]
    CooldownActive { remaining_secs: u64 },

    #[error("check-in reward must be positive, got {0}")]
    InvalidReward(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CheckInError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::CooldownActive { .. } => "cooldown_active",
            Self::InvalidReward(_) => "invalid_reward",
            Self::Store(_) => "store_error",
        }
    }
}
