//! Check-in state storage trait.

use crate::{AppliedCredit, NewLedgerEntry, StoreError};
use pass_types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Per-identity progress toward the multi-step check-in reward.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInState {
    pub identity: Identity,
    pub display_name: String,
    /// `None` until the first check-in, or after an administrative reset.
    pub last_check_in: Option<Timestamp>,
    /// 0-based progress; reset to 0 exactly when a reward is paid.
    pub iterator: u32,
}

impl CheckInState {
    pub fn fresh(identity: Identity) -> Self {
        Self {
            identity,
            display_name: String::new(),
            last_check_in: None,
            iterator: 0,
        }
    }
}

pub trait CheckInStore {
    fn get_check_in(&self, identity: &Identity) -> Result<Option<CheckInState>, StoreError>;
    fn put_check_in(&self, state: &CheckInState) -> Result<(), StoreError>;

    /// Write `state` and, when given, pay `reward` in the same transaction.
    ///
    /// `reward.delta` must be positive; anything else fails with
    /// [`StoreError::NonPositiveCredit`] and writes nothing.
    fn record_check_in(
        &self,
        state: &CheckInState,
        reward: Option<NewLedgerEntry>,
        now: Timestamp,
    ) -> Result<Option<AppliedCredit>, StoreError>;
}
