use pass_types::SECS_PER_HOUR;
use serde::{Deserialize, Serialize};

use crate::error::CheckInError;

/// Minimum time between two check-ins of one identity.
///
/// 23 rather than 24 hours, so a member checking in at roughly the same
/// local time every day does not drift past the window.
pub const CHECK_IN_COOLDOWN_SECS: u64 = 23 * SECS_PER_HOUR;

/// Reward settings. The reward is always positive: a config that says
/// otherwise fails to load.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCheckInConfig", into = "RawCheckInConfig")]
pub struct CheckInConfig {
    reward: i64,
    threshold: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawCheckInConfig {
    /// Points paid when the threshold is reached.
    #[serde(default = "default_reward")]
    reward: i64,

    /// Check-ins needed per reward. 0 and 1 both pay on every check-in.
    #[serde(default = "default_threshold")]
    threshold: u32,
}

fn default_reward() -> i64 {
    10
}

fn default_threshold() -> u32 {
    3
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            reward: default_reward(),
            threshold: default_threshold(),
        }
    }
}

impl CheckInConfig {
    pub fn new(reward: i64, threshold: u32) -> Result<Self, CheckInError> {
        if reward <= 0 {
            return Err(CheckInError::InvalidReward(reward));
        }
        Ok(Self { reward, threshold })
    }

    pub fn reward(&self) -> i64 {
        self.reward
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Threshold with the degenerate values folded to 1.
    pub fn effective_threshold(&self) -> u32 {
        self.threshold.max(1)
    }
}

impl TryFrom<RawCheckInConfig> for CheckInConfig {
    type Error = CheckInError;

    fn try_from(raw: RawCheckInConfig) -> Result<Self, Self::Error> {
        Self::new(raw.reward, raw.threshold)
    }
}

impl From<CheckInConfig> for RawCheckInConfig {
    fn from(config: CheckInConfig) -> Self {
        Self {
            reward: config.reward,
            threshold: config.threshold,
        }
    }
}
