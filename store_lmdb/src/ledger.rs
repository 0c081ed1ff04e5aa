//! LMDB implementation of LedgerStore.

use pass_store::{
    AppliedCredit, Balance, CreditOutcome, LedgerEntry, LedgerStore, NewLedgerEntry, RemovalSummary, StoreError,
};
use pass_types::{Identity, Timestamp};

use crate::keys;
use crate::{LmdbEnvironment, LmdbError, WriteBatch};

impl LedgerStore for LmdbEnvironment {
    fn get_balance(&self, identity: &Identity) -> Result<Option<Balance>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .balances_db
            .get(&rtxn, identity.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes).map_err(LmdbError::from)?)),
            None => Ok(None),
        }
    }

    fn iter_balances(&self) -> Result<Vec<Balance>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for item in self.balances_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(results)
    }

    fn apply_credit(&self, entry: NewLedgerEntry, now: Timestamp) -> Result<CreditOutcome, StoreError> {
        let mut batch = self.write_batch()?;
        let outcome = credit_in_batch(&mut batch, entry, now)?;
        if let CreditOutcome::Applied { .. } = outcome {
            batch.commit()?;
        }
        // Insufficient: batch dropped, nothing written.
        Ok(outcome)
    }

    fn ledger_for(&self, identity: &Identity, include_removed: bool) -> Result<Vec<LedgerEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let prefix = keys::identity_prefix(identity);
        let mut results = Vec::new();
        for item in self
            .ledger_index_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            let (key, _) = item.map_err(LmdbError::from)?;
            let id = keys::ledger_id_from_index_key(key)
                .ok_or_else(|| StoreError::Corruption("malformed ledger index key".into()))?;
            let bytes = self
                .ledger_db
                .get(&rtxn, &id.to_be_bytes())
                .map_err(LmdbError::from)?
                .ok_or_else(|| StoreError::Corruption(format!("index points at missing ledger entry {id}")))?;
            let entry: LedgerEntry = bincode::deserialize(bytes).map_err(LmdbError::from)?;
            if include_removed || entry.is_active() {
                results.push(entry);
            }
        }
        Ok(results)
    }

    fn iter_ledger(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for item in self.ledger_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (_, bytes) = item.map_err(LmdbError::from)?;
            results.push(bincode::deserialize(bytes).map_err(LmdbError::from)?);
        }
        Ok(results)
    }

    fn reset_all(&self, actor: &Identity, now: Timestamp) -> Result<RemovalSummary, StoreError> {
        let mut batch = self.write_batch()?;
        let balances_cleared = batch.clear_balances()?;
        let entries_marked = batch.mark_all_removed(actor, now)?;
        batch.commit()?;
        Ok(RemovalSummary {
            balances_cleared,
            entries_marked,
        })
    }

    fn remove_identities(
        &self,
        identities: &[Identity],
        actor: &Identity,
        now: Timestamp,
    ) -> Result<RemovalSummary, StoreError> {
        let mut batch = self.write_batch()?;
        let mut summary = RemovalSummary::default();
        for identity in identities {
            if batch.delete_balance(identity)? {
                summary.balances_cleared += 1;
            }
            summary.entries_marked += batch.mark_identity_removed(identity, actor, now)?;
        }
        batch.commit()?;
        Ok(summary)
    }
}

/// Upsert the balance and append the ledger row inside an open batch.
///
/// On [`CreditOutcome::Insufficient`] nothing has been written to the batch.
pub(crate) fn credit_in_batch(
    batch: &mut WriteBatch<'_>,
    entry: NewLedgerEntry,
    now: Timestamp,
) -> Result<CreditOutcome, StoreError> {
    let mut balance = batch
        .get_balance(&entry.target.identity)?
        .unwrap_or_else(|| Balance::empty(entry.target.identity.clone()));

    let updated = balance
        .balance
        .checked_add(entry.delta)
        .ok_or_else(|| StoreError::Overflow(entry.target.identity.to_string()))?;
    if updated < 0 {
        return Ok(CreditOutcome::Insufficient {
            available: balance.balance,
        });
    }

    balance.balance = updated;
    balance.display_name = entry.target.display_name.clone();
    balance.last_updated = now;

    let id = batch.next_ledger_id()?;
    let row = entry.into_entry(id, now);

    batch.put_balance(&balance)?;
    batch.append_ledger(&row)?;
    Ok(CreditOutcome::Applied {
        balance,
        entry: row,
    })
}

/// A positive credit that rides along with another write.
pub(crate) fn bundled_credit(
    batch: &mut WriteBatch<'_>,
    entry: NewLedgerEntry,
    now: Timestamp,
) -> Result<AppliedCredit, StoreError> {
    if entry.delta <= 0 {
        return Err(StoreError::NonPositiveCredit(entry.delta));
    }
    match credit_in_batch(batch, entry, now)? {
        CreditOutcome::Applied { balance, entry } => Ok(AppliedCredit { balance, entry }),
        CreditOutcome::Insufficient { available } => Err(StoreError::Corruption(format!(
            "stored balance {available} is negative"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pass_types::Member;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    fn member(id: &str) -> Member {
        Member::new(Identity::new(id).unwrap(), format!("user{id}"))
    }

    fn credit(env: &LmdbEnvironment, target: &str, delta: i64, at: u64) -> CreditOutcome {
        env.apply_credit(
            NewLedgerEntry {
                target: member(target),
                assigner: member("admin"),
                delta,
                message: Some("test".into()),
            },
            Timestamp::new(at),
        )
        .unwrap()
    }

    #[test]
    fn credit_upserts_balance_and_appends_row() {
        let (_dir, env) = temp_env();
        credit(&env, "1", 50, 100);
        let outcome = credit(&env, "1", -30, 200);

        let CreditOutcome::Applied { balance, entry } = outcome else {
            panic!("debit within balance should apply");
        };
        assert_eq!(balance.balance, 20);
        assert_eq!(balance.last_updated, Timestamp::new(200));
        assert_eq!(entry.id, 2);
        assert_eq!(entry.delta, -30);

        let rows = env.ledger_for(&Identity::new("1").unwrap(), true).unwrap();
        assert_eq!(rows.iter().map(|r| r.delta).collect::<Vec<_>>(), vec![50, -30]);
    }

    #[test]
    fn overdraft_writes_nothing() {
        let (_dir, env) = temp_env();
        credit(&env, "1", 20, 100);
        assert_eq!(credit(&env, "1", -25, 200), CreditOutcome::Insufficient { available: 20 });

        let id = Identity::new("1").unwrap();
        assert_eq!(env.get_balance(&id).unwrap().unwrap().balance, 20);
        assert_eq!(env.ledger_for(&id, true).unwrap().len(), 1);
    }

    #[test]
    fn reset_all_preserves_earlier_removals() {
        let (_dir, env) = temp_env();
        credit(&env, "1", 10, 100);
        credit(&env, "2", 15, 100);

        let first = Identity::new("first-admin").unwrap();
        let summary = env
            .remove_identities(&[Identity::new("1").unwrap()], &first, Timestamp::new(150))
            .unwrap();
        assert_eq!(summary, RemovalSummary { balances_cleared: 1, entries_marked: 1 });

        credit(&env, "2", 5, 160);
        let second = Identity::new("second-admin").unwrap();
        let summary = env.reset_all(&second, Timestamp::new(200)).unwrap();
        assert_eq!(summary, RemovalSummary { balances_cleared: 1, entries_marked: 2 });

        assert!(env.iter_balances().unwrap().is_empty());
        let rows = env.iter_ledger().unwrap();
        assert!(rows.iter().all(|r| !r.is_active()));
        assert_eq!(rows[0].removed_by(), Some(&first));
        assert_eq!(rows[0].removed_at(), Some(Timestamp::new(150)));
        assert_eq!(rows[1].removed_by(), Some(&second));
        assert_eq!(rows[2].removed_by(), Some(&second));
    }

    #[test]
    fn history_can_hide_removed_rows() {
        let (_dir, env) = temp_env();
        credit(&env, "1", 10, 100);
        env.reset_all(&Identity::new("admin").unwrap(), Timestamp::new(150))
            .unwrap();
        credit(&env, "1", 3, 200);

        let id = Identity::new("1").unwrap();
        assert_eq!(env.ledger_for(&id, true).unwrap().len(), 2);
        let active = env.ledger_for(&id, false).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].delta, 3);
    }
}
