//! LMDB implementation of CheckInStore.

use pass_store::{AppliedCredit, CheckInState, CheckInStore, NewLedgerEntry, StoreError};
use pass_types::{Identity, Timestamp};

use crate::ledger::bundled_credit;
use crate::{LmdbEnvironment, LmdbError};

impl CheckInStore for LmdbEnvironment {
    fn get_check_in(&self, identity: &Identity) -> Result<Option<CheckInState>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .checkins_db
            .get(&rtxn, identity.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn put_check_in(&self, state: &CheckInState) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.put_check_in(state)?;
        batch.commit()?;
        Ok(())
    }

    fn record_check_in(
        &self,
        state: &CheckInState,
        reward: Option<NewLedgerEntry>,
        now: Timestamp,
    ) -> Result<Option<AppliedCredit>, StoreError> {
        let mut batch = self.write_batch()?;
        let paid = match reward {
            Some(entry) => Some(bundled_credit(&mut batch, entry, now)?),
            None => None,
        };
        batch.put_check_in(state)?;
        batch.commit()?;
        Ok(paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pass_store::LedgerStore;
    use pass_types::Member;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    fn reward(delta: i64) -> NewLedgerEntry {
        let member = Member::new(Identity::new("7").unwrap(), "bob");
        NewLedgerEntry {
            target: member.clone(),
            assigner: member,
            delta,
            message: Some("Check-In".into()),
        }
    }

    fn state(iterator: u32) -> CheckInState {
        CheckInState {
            identity: Identity::new("7").unwrap(),
            display_name: "bob".into(),
            last_check_in: Some(Timestamp::new(500)),
            iterator,
        }
    }

    #[test]
    fn reward_and_state_commit_together() {
        let (_dir, env) = temp_env();
        let paid = env
            .record_check_in(&state(0), Some(reward(10)), Timestamp::new(500))
            .unwrap()
            .expect("reward paid");
        assert_eq!(paid.balance.balance, 10);
        assert_eq!(paid.entry.id, 1);

        let id = Identity::new("7").unwrap();
        assert_eq!(env.get_check_in(&id).unwrap(), Some(state(0)));
        assert_eq!(env.ledger_for(&id, true).unwrap().len(), 1);
    }

    #[test]
    fn rejected_reward_leaves_state_untouched() {
        let (_dir, env) = temp_env();
        let result = env.record_check_in(&state(0), Some(reward(0)), Timestamp::new(500));
        assert!(matches!(result, Err(StoreError::NonPositiveCredit(0))));

        let id = Identity::new("7").unwrap();
        assert_eq!(env.get_check_in(&id).unwrap(), None);
        assert!(env.iter_ledger().unwrap().is_empty());
    }
}
