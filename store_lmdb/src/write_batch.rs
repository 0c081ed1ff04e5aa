//! Write batching: groups multiple store operations into a single LMDB write
//! transaction, so multi-row operations commit together or not at all.
//!
//! # Usage
//!
//! ```ignore
//! let mut batch = env.write_batch()?;
//! batch.put_balance(&balance)?;
//! batch.append_ledger(&entry)?;
//! batch.commit()?;
//! ```
//!
//! If the batch is dropped without calling [`WriteBatch::commit`], all
//! operations are rolled back (the underlying LMDB transaction is aborted).

use heed::RwTxn;

use pass_store::{Balance, CheckInState, LedgerEntry, Profile, ProfileChange};
use pass_types::{Identity, Timestamp};

use crate::environment::LmdbEnvironment;
use crate::keys;
use crate::LmdbError;

const CHANGE_SEQ_KEY: &[u8] = b"profile_change_seq";

/// A write batch that groups multiple store operations into a single LMDB
/// write transaction.
pub struct WriteBatch<'a> {
    txn: RwTxn<'a>,
    env: &'a LmdbEnvironment,
}

impl<'a> WriteBatch<'a> {
    /// Begin a new write batch.
    pub(crate) fn new(env: &'a LmdbEnvironment) -> Result<Self, LmdbError> {
        let txn = env.env.write_txn()?;
        Ok(Self { txn, env })
    }

    // ── Balance operations ──────────────────────────────────────────────

    /// Read a balance row through the batch (sees uncommitted writes).
    pub fn get_balance(&self, identity: &Identity) -> Result<Option<Balance>, LmdbError> {
        match self.env.balances_db.get(&self.txn, identity.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_balance(&mut self, balance: &Balance) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(balance)?;
        self.env
            .balances_db
            .put(&mut self.txn, balance.identity.as_bytes(), &bytes)?;
        Ok(())
    }

    /// Delete one balance row. Returns whether a row existed.
    pub fn delete_balance(&mut self, identity: &Identity) -> Result<bool, LmdbError> {
        Ok(self.env.balances_db.delete(&mut self.txn, identity.as_bytes())?)
    }

    /// Delete every balance row. Returns the number of rows removed.
    pub fn clear_balances(&mut self) -> Result<u64, LmdbError> {
        let count = self.env.balances_db.len(&self.txn)?;
        self.env.balances_db.clear(&mut self.txn)?;
        Ok(count)
    }

    // ── Ledger operations ───────────────────────────────────────────────

    /// Next unused ledger id (ids start at 1).
    pub fn next_ledger_id(&self) -> Result<u64, LmdbError> {
        match self.env.ledger_db.last(&self.txn)? {
            Some((key, _)) => {
                let bytes: [u8; 8] = key
                    .try_into()
                    .map_err(|_| LmdbError::Serialization("ledger key is not 8 bytes".into()))?;
                Ok(u64::from_be_bytes(bytes) + 1)
            }
            None => Ok(1),
        }
    }

    /// Append a ledger row and its per-identity index entry.
    pub fn append_ledger(&mut self, entry: &LedgerEntry) -> Result<(), LmdbError> {
        self.put_ledger(entry)?;
        self.env.ledger_index_db.put(
            &mut self.txn,
            &keys::ledger_index_key(&entry.identity, entry.id),
            &[],
        )?;
        Ok(())
    }

    fn put_ledger(&mut self, entry: &LedgerEntry) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(entry)?;
        self.env
            .ledger_db
            .put(&mut self.txn, &entry.id.to_be_bytes(), &bytes)?;
        Ok(())
    }

    fn get_ledger(&self, id: u64) -> Result<LedgerEntry, LmdbError> {
        let bytes = self
            .env
            .ledger_db
            .get(&self.txn, &id.to_be_bytes())?
            .ok_or_else(|| LmdbError::NotFound(format!("ledger entry {id}")))?;
        Ok(bincode::deserialize(bytes)?)
    }

    /// Mark every active row of one identity removed. Returns the number of
    /// rows that changed.
    pub fn mark_identity_removed(
        &mut self,
        identity: &Identity,
        by: &Identity,
        at: Timestamp,
    ) -> Result<u64, LmdbError> {
        let prefix = keys::identity_prefix(identity);
        let mut ids = Vec::new();
        for item in self.env.ledger_index_db.prefix_iter(&self.txn, &prefix)? {
            let (key, _) = item?;
            if let Some(id) = keys::ledger_id_from_index_key(key) {
                ids.push(id);
            }
        }

        let mut marked = 0;
        for id in ids {
            let mut entry = self.get_ledger(id)?;
            if entry.mark_removed(by, at) {
                self.put_ledger(&entry)?;
                marked += 1;
            }
        }
        Ok(marked)
    }

    /// Mark every active ledger row removed. Returns the number of rows that
    /// changed; rows already removed keep their attribution.
    pub fn mark_all_removed(&mut self, by: &Identity, at: Timestamp) -> Result<u64, LmdbError> {
        let mut pending = Vec::new();
        for item in self.env.ledger_db.iter(&self.txn)? {
            let (_, bytes) = item?;
            let mut entry: LedgerEntry = bincode::deserialize(bytes)?;
            if entry.mark_removed(by, at) {
                pending.push(entry);
            }
        }

        let marked = pending.len() as u64;
        for entry in &pending {
            self.put_ledger(entry)?;
        }
        Ok(marked)
    }

    // ── Check-in operations ─────────────────────────────────────────────

    pub fn put_check_in(&mut self, state: &CheckInState) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(state)?;
        self.env
            .checkins_db
            .put(&mut self.txn, state.identity.as_bytes(), &bytes)?;
        Ok(())
    }

    // ── Profile operations ──────────────────────────────────────────────

    pub fn get_profile(&self, identity: &Identity) -> Result<Option<Profile>, LmdbError> {
        match self.env.profiles_db.get(&self.txn, identity.as_bytes())? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put_profile(&mut self, profile: &Profile) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(profile)?;
        self.env
            .profiles_db
            .put(&mut self.txn, profile.identity.as_bytes(), &bytes)?;
        Ok(())
    }

    /// Append a change-log row under a fresh sequence number.
    pub fn append_change(&mut self, change: &ProfileChange) -> Result<(), LmdbError> {
        let seq = self
            .env
            .meta_db
            .get(&self.txn, CHANGE_SEQ_KEY)?
            .and_then(|b| <[u8; 8]>::try_from(b).ok())
            .map(u64::from_be_bytes)
            .unwrap_or(0);
        let key = keys::change_key(&change.identity, change.field, change.changed_at, seq);
        let bytes = bincode::serialize(change)?;
        self.env.changes_db.put(&mut self.txn, &key, &bytes)?;
        self.env
            .meta_db
            .put(&mut self.txn, CHANGE_SEQ_KEY, &(seq + 1).to_be_bytes())?;
        Ok(())
    }

    // ── Settings / meta ─────────────────────────────────────────────────

    pub fn put_setting(&mut self, key: &str, value: &[u8]) -> Result<(), LmdbError> {
        self.env.settings_db.put(&mut self.txn, key.as_bytes(), value)?;
        Ok(())
    }

    pub fn put_meta(&mut self, key: &str, value: &[u8]) -> Result<(), LmdbError> {
        self.env.meta_db.put(&mut self.txn, key.as_bytes(), value)?;
        Ok(())
    }

    // ── Commit / rollback ───────────────────────────────────────────────

    /// Commit all batched operations in a single write transaction.
    pub fn commit(self) -> Result<(), LmdbError> {
        self.txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pass_store::LedgerStore;

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
        (dir, env)
    }

    fn balance(id: &str, points: i64) -> Balance {
        Balance {
            identity: Identity::new(id).unwrap(),
            display_name: id.to_string(),
            balance: points,
            transferred_balance: 0,
            last_updated: Timestamp::new(10),
        }
    }

    #[test]
    fn committed_batch_is_visible() {
        let (_dir, env) = temp_env();
        let mut batch = env.write_batch().unwrap();
        batch.put_balance(&balance("1", 40)).unwrap();
        batch.commit().unwrap();

        let stored = env.get_balance(&Identity::new("1").unwrap()).unwrap().unwrap();
        assert_eq!(stored.balance, 40);
    }

    #[test]
    fn dropped_batch_does_not_persist() {
        let (_dir, env) = temp_env();
        {
            let mut batch = env.write_batch().unwrap();
            batch.put_balance(&balance("1", 40)).unwrap();
            // batch is dropped here, rolling back
        }
        assert!(env.get_balance(&Identity::new("1").unwrap()).unwrap().is_none());
    }

    #[test]
    fn batch_reads_its_own_writes() {
        let (_dir, env) = temp_env();
        let mut batch = env.write_batch().unwrap();
        batch.put_balance(&balance("1", 5)).unwrap();
        assert_eq!(batch.get_balance(&Identity::new("1").unwrap()).unwrap().unwrap().balance, 5);
        assert_eq!(batch.clear_balances().unwrap(), 1);
        assert!(batch.get_balance(&Identity::new("1").unwrap()).unwrap().is_none());
    }

    #[test]
    fn ledger_ids_start_at_one() {
        let (_dir, env) = temp_env();
        let batch = env.write_batch().unwrap();
        assert_eq!(batch.next_ledger_id().unwrap(), 1);
    }
}
