use pass_types::SECS_PER_DAY;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Days a field stays frozen after each change.
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: u64,

    /// Points paid the first time each field is set. 0 disables the bonus.
    #[serde(default = "default_first_time_bonus")]
    pub first_time_bonus: i64,
}

fn default_cooldown_days() -> u64 {
    30
}

fn default_first_time_bonus() -> i64 {
    100
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            cooldown_days: default_cooldown_days(),
            first_time_bonus: default_first_time_bonus(),
        }
    }
}

impl ProfileConfig {
    pub fn cooldown_secs(&self) -> u64 {
        self.cooldown_days.saturating_mul(SECS_PER_DAY)
    }
}
