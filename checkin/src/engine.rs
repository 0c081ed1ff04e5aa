//! The check-in state machine.

use std::sync::Arc;

use pass_store::{CheckInState, CheckInStore, NewLedgerEntry};
use pass_types::{Clock, Identity, Member, SystemClock, Timestamp};

use crate::config::{CheckInConfig, CHECK_IN_COOLDOWN_SECS};
use crate::error::CheckInError;

/// Ledger message attached to check-in rewards.
pub const CHECK_IN_MESSAGE: &str = "Check-In";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewardPaid {
    pub points: i64,
    /// Balance after the reward.
    pub balance: i64,
    pub entry_id: u64,
}

/// Result of an accepted check-in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckInReceipt {
    pub checked_in_at: Timestamp,
    /// Iterator after this check-in (0 once a reward was paid).
    pub iterator: u32,
    /// Check-ins still needed for the next reward.
    pub check_ins_until_reward: u32,
    pub reward: Option<RewardPaid>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckInStatus {
    pub iterator: u32,
    pub last_check_in: Option<Timestamp>,
    /// Seconds until the next check-in is allowed; `None` if allowed now.
    pub remaining_cooldown_secs: Option<u64>,
    pub check_ins_until_reward: u32,
}

pub struct CheckInEngine<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    config: CheckInConfig,
}

impl<S, C> CheckInEngine<S, C>
where
    S: CheckInStore,
    C: Clock,
{
    pub fn new(store: Arc<S>, clock: C, config: CheckInConfig) -> Self {
        Self { store, clock, config }
    }

    pub fn config(&self) -> &CheckInConfig {
        &self.config
    }

    /// Check `member` in.
    ///
    /// The cooldown is checked before anything else, whatever the iterator.
    /// The cooldown read and the state write are not one transaction: two
    /// simultaneous check-ins can both pass.
    pub fn check_in(&self, member: &Member) -> Result<CheckInReceipt, CheckInError> {
        let now = self.clock.now();
        let mut state = self
            .store
            .get_check_in(&member.identity)?
            .unwrap_or_else(|| CheckInState::fresh(member.identity.clone()));

        if let Some(remaining_secs) = remaining(&state, now) {
            tracing::debug!(identity = %member.identity, remaining_secs, "check-in on cooldown");
            return Err(CheckInError::CooldownActive { remaining_secs });
        }

        let threshold = self.config.effective_threshold();
        let reward_entry = if state.iterator.saturating_add(1) >= threshold {
            state.iterator = 0;
            Some(NewLedgerEntry {
                target: member.clone(),
                assigner: member.clone(),
                delta: self.config.reward(),
                message: Some(CHECK_IN_MESSAGE.to_string()),
            })
        } else {
            state.iterator += 1;
            None
        };

        state.display_name = member.display_name.clone();
        state.last_check_in = Some(now);
        // Reward and progress commit together.
        let reward = self
            .store
            .record_check_in(&state, reward_entry, now)?
            .map(|paid| RewardPaid {
                points: paid.entry.delta,
                balance: paid.balance.balance,
                entry_id: paid.entry.id,
            });

        tracing::info!(
            identity = %member.identity,
            iterator = state.iterator,
            reward = ?reward.as_ref().map(|r| r.points),
            "checked in"
        );

        Ok(CheckInReceipt {
            checked_in_at: now,
            iterator: state.iterator,
            check_ins_until_reward: threshold - state.iterator,
            reward,
        })
    }

    pub fn status(&self, identity: &Identity) -> Result<CheckInStatus, CheckInError> {
        let state = self
            .store
            .get_check_in(identity)?
            .unwrap_or_else(|| CheckInState::fresh(identity.clone()));
        let threshold = self.config.effective_threshold();
        Ok(CheckInStatus {
            iterator: state.iterator,
            last_check_in: state.last_check_in,
            remaining_cooldown_secs: remaining(&state, self.clock.now()),
            check_ins_until_reward: threshold.saturating_sub(state.iterator).max(1),
        })
    }

    /// Clear the cooldown so the next check-in is allowed immediately.
    /// Progress toward the reward is kept. Returns `false` if the identity
    /// never checked in.
    pub fn reset_cooldown(&self, identity: &Identity) -> Result<bool, CheckInError> {
        let Some(mut state) = self.store.get_check_in(identity)? else {
            return Ok(false);
        };
        state.last_check_in = None;
        self.store.put_check_in(&state)?;
        tracing::info!(identity = %identity, "check-in cooldown reset");
        Ok(true)
    }
}

fn remaining(state: &CheckInState, now: Timestamp) -> Option<u64> {
    state
        .last_check_in
        .and_then(|last| last.remaining(CHECK_IN_COOLDOWN_SECS, now))
}
