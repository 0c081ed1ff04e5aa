//! Nullable store: thread-safe in-memory storage for testing.
//!
//! All tables live behind one mutex, so every trait method is atomic the
//! same way an LMDB write transaction is.

use pass_store::{
    AppliedCredit, Balance, CheckInState, CheckInStore, CreditOutcome, LedgerEntry, LedgerStore,
    MetaStore, NewLedgerEntry, Profile, ProfileChange, ProfileChangeOutcome, ProfileStore,
    RemovalSummary, SettingsStore, StoreError,
};
use pass_types::{Identity, Member, ProfileField, Timestamp};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Tables {
    balances: BTreeMap<Identity, Balance>,
    ledger: Vec<LedgerEntry>,
    checkins: HashMap<Identity, CheckInState>,
    profiles: BTreeMap<Identity, Profile>,
    changes: Vec<ProfileChange>,
    profile_lock: Option<bool>,
    meta: HashMap<String, Vec<u8>>,
}

impl Tables {
    fn credit(&mut self, entry: NewLedgerEntry, now: Timestamp) -> Result<CreditOutcome, StoreError> {
        let mut balance = self
            .balances
            .get(&entry.target.identity)
            .cloned()
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

        let id = self.ledger.last().map_or(1, |e| e.id + 1);
        let row = entry.into_entry(id, now);
        self.balances.insert(balance.identity.clone(), balance.clone());
        self.ledger.push(row.clone());

        Ok(CreditOutcome::Applied { balance, entry: row })
    }

    /// Same contract as the durable store: positive only, all or nothing.
    fn bundled_credit(&mut self, entry: NewLedgerEntry, now: Timestamp) -> Result<AppliedCredit, StoreError> {
        if entry.delta <= 0 {
            return Err(StoreError::NonPositiveCredit(entry.delta));
        }
        match self.credit(entry, now)? {
            CreditOutcome::Applied { balance, entry } => Ok(AppliedCredit { balance, entry }),
            CreditOutcome::Insufficient { available } => Err(StoreError::Corruption(format!(
                "stored balance {available} is negative"
            ))),
        }
    }
}

/// An in-memory implementation of every store trait.
/// Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    tables: Mutex<Tables>,
}

impl NullStore {
    /// A store with the profile lock row seeded as unlocked, the state a
    /// migrated database starts in.
    pub fn new() -> Self {
        let store = Self::without_lock_row();
        store.tables().profile_lock = Some(false);
        store
    }

    /// A store with no profile lock row at all.
    pub fn without_lock_row() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for NullStore {
    fn get_balance(&self, identity: &Identity) -> Result<Option<Balance>, StoreError> {
        Ok(self.tables().balances.get(identity).cloned())
    }

    fn iter_balances(&self) -> Result<Vec<Balance>, StoreError> {
        Ok(self.tables().balances.values().cloned().collect())
    }

    fn apply_credit(&self, entry: NewLedgerEntry, now: Timestamp) -> Result<CreditOutcome, StoreError> {
        self.tables().credit(entry, now)
    }

    fn ledger_for(&self, identity: &Identity, include_removed: bool) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .tables()
            .ledger
            .iter()
            .filter(|e| &e.identity == identity && (include_removed || e.is_active()))
            .cloned()
            .collect())
    }

    fn iter_ledger(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self.tables().ledger.clone())
    }

    fn reset_all(&self, actor: &Identity, now: Timestamp) -> Result<RemovalSummary, StoreError> {
        let mut tables = self.tables();
        let balances_cleared = tables.balances.len() as u64;
        tables.balances.clear();
        let entries_marked = tables
            .ledger
            .iter_mut()
            .filter_map(|e| e.mark_removed(actor, now).then_some(()))
            .count() as u64;
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
        let mut tables = self.tables();
        let mut summary = RemovalSummary::default();
        for identity in identities {
            if tables.balances.remove(identity).is_some() {
                summary.balances_cleared += 1;
            }
        }
        summary.entries_marked = tables
            .ledger
            .iter_mut()
            .filter(|e| identities.contains(&e.identity))
            .filter_map(|e| e.mark_removed(actor, now).then_some(()))
            .count() as u64;
        Ok(summary)
    }
}

impl CheckInStore for NullStore {
    fn get_check_in(&self, identity: &Identity) -> Result<Option<CheckInState>, StoreError> {
        Ok(self.tables().checkins.get(identity).cloned())
    }

    fn put_check_in(&self, state: &CheckInState) -> Result<(), StoreError> {
        self.tables()
            .checkins
            .insert(state.identity.clone(), state.clone());
        Ok(())
    }

    fn record_check_in(
        &self,
        state: &CheckInState,
        reward: Option<NewLedgerEntry>,
        now: Timestamp,
    ) -> Result<Option<AppliedCredit>, StoreError> {
        let mut tables = self.tables();
        let paid = match reward {
            Some(entry) => Some(tables.bundled_credit(entry, now)?),
            None => None,
        };
        tables.checkins.insert(state.identity.clone(), state.clone());
        Ok(paid)
    }
}

impl ProfileStore for NullStore {
    fn get_profile(&self, identity: &Identity) -> Result<Option<Profile>, StoreError> {
        Ok(self.tables().profiles.get(identity).cloned())
    }

    fn apply_profile_change(
        &self,
        member: &Member,
        change: &ProfileChange,
        first_set_bonus: Option<NewLedgerEntry>,
    ) -> Result<ProfileChangeOutcome, StoreError> {
        let mut tables = self.tables();
        let was_unset = tables
            .profiles
            .get(&member.identity)
            .and_then(|p| p.field(change.field))
            .is_none();
        // Credit first: it is the only step that can fail.
        let bonus = match first_set_bonus {
            Some(entry) if was_unset => Some(tables.bundled_credit(entry, change.changed_at)?),
            _ => None,
        };

        let profile = tables
            .profiles
            .entry(member.identity.clone())
            .or_insert_with(|| Profile::empty(member));
        profile.display_name = member.display_name.clone();
        profile.set_field(change.field, change.value.clone());
        let profile = profile.clone();
        tables.changes.push(change.clone());
        Ok(ProfileChangeOutcome { profile, bonus })
    }

    fn last_change(&self, identity: &Identity, field: ProfileField) -> Result<Option<Timestamp>, StoreError> {
        Ok(self
            .tables()
            .changes
            .iter()
            .filter(|c| &c.identity == identity && c.field == field)
            .map(|c| c.changed_at)
            .max())
    }

    fn changes_for(&self, identity: &Identity) -> Result<Vec<ProfileChange>, StoreError> {
        let mut changes: Vec<ProfileChange> = self
            .tables()
            .changes
            .iter()
            .filter(|c| &c.identity == identity)
            .cloned()
            .collect();
        changes.sort_by_key(|c| c.changed_at);
        Ok(changes)
    }
}

impl SettingsStore for NullStore {
    fn profile_lock(&self) -> Result<Option<bool>, StoreError> {
        Ok(self.tables().profile_lock)
    }

    fn set_profile_lock(&self, locked: bool) -> Result<(), StoreError> {
        self.tables().profile_lock = Some(locked);
        Ok(())
    }
}

impl MetaStore for NullStore {
    fn get_schema_version(&self) -> Result<u32, StoreError> {
        match self.tables().meta.get("schema_version") {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
                    StoreError::Corruption("schema_version has unexpected byte length".to_string())
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.tables()
            .meta
            .insert("schema_version".to_string(), version.to_le_bytes().to_vec());
        Ok(())
    }
}
