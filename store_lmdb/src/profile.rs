//! LMDB implementation of ProfileStore.

use pass_store::{NewLedgerEntry, Profile, ProfileChange, ProfileChangeOutcome, ProfileStore, StoreError};
use pass_types::{Identity, Member, ProfileField, Timestamp};

use crate::keys;
use crate::ledger::bundled_credit;
use crate::{LmdbEnvironment, LmdbError};

impl ProfileStore for LmdbEnvironment {
    fn get_profile(&self, identity: &Identity) -> Result<Option<Profile>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .profiles_db
            .get(&rtxn, identity.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn apply_profile_change(
        &self,
        member: &Member,
        change: &ProfileChange,
        first_set_bonus: Option<NewLedgerEntry>,
    ) -> Result<ProfileChangeOutcome, StoreError> {
        let mut batch = self.write_batch()?;
        let mut profile = batch
            .get_profile(&member.identity)?
            .unwrap_or_else(|| Profile::empty(member));
        let was_unset = profile.field(change.field).is_none();

        let bonus = match first_set_bonus {
            Some(entry) if was_unset => Some(bundled_credit(&mut batch, entry, change.changed_at)?),
            _ => None,
        };

        profile.display_name = member.display_name.clone();
        profile.set_field(change.field, change.value.clone());
        batch.put_profile(&profile)?;
        batch.append_change(change)?;
        batch.commit()?;
        Ok(ProfileChangeOutcome { profile, bonus })
    }

    fn last_change(&self, identity: &Identity, field: ProfileField) -> Result<Option<Timestamp>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = keys::change_prefix(identity, field);
        let mut iter = self
            .changes_db
            .rev_prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?;
        match iter.next() {
            Some(item) => {
                let (_, bytes) = item.map_err(LmdbError::from)?;
                let change: ProfileChange = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(change.changed_at))
            }
            None => Ok(None),
        }
    }

    fn changes_for(&self, identity: &Identity) -> Result<Vec<ProfileChange>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = keys::identity_prefix(identity);
        let mut results: Vec<ProfileChange> = Vec::new();
        for item in self
            .changes_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        // Keys group by field first; callers want one timeline.
        results.sort_by_key(|c| c.changed_at);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    fn apply(env: &LmdbEnvironment, member: &Member, change: &ProfileChange) -> Profile {
        env.apply_profile_change(member, change, None).unwrap().profile
    }

    fn bonus(member: &Member) -> NewLedgerEntry {
        NewLedgerEntry {
            target: member.clone(),
            assigner: member.clone(),
            delta: 100,
            message: Some("Profile Email Set".into()),
        }
    }

    fn change(id: &str, field: ProfileField, value: &str, at: u64) -> ProfileChange {
        ProfileChange {
            identity: Identity::new(id).unwrap(),
            field,
            value: value.to_string(),
            changed_at: Timestamp::new(at),
        }
    }

    #[test]
    fn last_change_is_per_field() {
        let (_dir, env) = temp_env();
        let member = Member::new(Identity::new("1").unwrap(), "alice");

        apply(&env, &member, &change("1", ProfileField::Email, "a@x.io", 100));
        apply(&env, &member, &change("1", ProfileField::Email, "b@x.io", 300));
        let profile = apply(&env, &member, &change("1", ProfileField::Handle, "alice", 200));

        assert_eq!(profile.email.as_deref(), Some("b@x.io"));
        assert_eq!(profile.handle.as_deref(), Some("alice"));
        assert_eq!(
            env.last_change(&member.identity, ProfileField::Email).unwrap(),
            Some(Timestamp::new(300))
        );
        assert_eq!(
            env.last_change(&member.identity, ProfileField::Handle).unwrap(),
            Some(Timestamp::new(200))
        );
        assert_eq!(env.last_change(&member.identity, ProfileField::WalletAddress).unwrap(), None);

        let timeline: Vec<u64> = env
            .changes_for(&member.identity)
            .unwrap()
            .iter()
            .map(|c| c.changed_at.as_secs())
            .collect();
        assert_eq!(timeline, vec![100, 200, 300]);
    }

    #[test]
    fn changes_do_not_leak_across_identities() {
        let (_dir, env) = temp_env();
        let a = Member::new(Identity::new("12").unwrap(), "a");
        let b = Member::new(Identity::new("123").unwrap(), "b");
        apply(&env, &b, &change("123", ProfileField::Email, "b@x.io", 100));

        assert!(env.changes_for(&a.identity).unwrap().is_empty());
        assert_eq!(env.last_change(&a.identity, ProfileField::Email).unwrap(), None);
    }

    #[test]
    fn bonus_is_paid_only_while_the_field_is_unset() {
        use pass_store::LedgerStore;

        let (_dir, env) = temp_env();
        let member = Member::new(Identity::new("5").unwrap(), "eve");

        let first = env
            .apply_profile_change(&member, &change("5", ProfileField::Email, "a@x.io", 100), Some(bonus(&member)))
            .unwrap();
        let paid = first.bonus.expect("first set pays");
        assert_eq!(paid.balance.balance, 100);
        assert_eq!(paid.entry.inserted_at, Timestamp::new(100));

        let second = env
            .apply_profile_change(&member, &change("5", ProfileField::Email, "b@x.io", 200), Some(bonus(&member)))
            .unwrap();
        assert!(second.bonus.is_none());
        assert_eq!(second.profile.email.as_deref(), Some("b@x.io"));
        assert_eq!(env.ledger_for(&member.identity, true).unwrap().len(), 1);
        assert_eq!(env.changes_for(&member.identity).unwrap().len(), 2);
    }
}
