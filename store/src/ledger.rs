//! Audit ledger storage trait.

use crate::{Balance, StoreError};
use pass_types::{Identity, Member, Timestamp};
use serde::{Deserialize, Serialize};

/// Removal state of a ledger row.
///
/// Rows are never physically deleted. A row moves from `Active` to
/// `Removed` at most once; the first removal's attribution is permanent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    Active,
    Removed { by: Identity, at: Timestamp },
}

/// One immutable row of the audit ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Monotonic row id assigned by the store.
    pub id: u64,
    pub identity: Identity,
    pub display_name: String,
    pub assigner: Identity,
    pub assigner_name: String,
    /// Signed point delta; negative for debits.
    pub delta: i64,
    pub inserted_at: Timestamp,
    pub message: Option<String>,
    pub status: EntryStatus,
}

impl LedgerEntry {
    pub fn is_active(&self) -> bool {
        matches!(self.status, EntryStatus::Active)
    }

    /// Mark the row removed. Returns `false` (and changes nothing) if it was
    /// already removed.
    pub fn mark_removed(&mut self, by: &Identity, at: Timestamp) -> bool {
        if !self.is_active() {
            return false;
        }
        self.status = EntryStatus::Removed { by: by.clone(), at };
        true
    }

    pub fn removed_at(&self) -> Option<Timestamp> {
        match &self.status {
            EntryStatus::Active => None,
            EntryStatus::Removed { at, .. } => Some(*at),
        }
    }

    pub fn removed_by(&self) -> Option<&Identity> {
        match &self.status {
            EntryStatus::Active => None,
            EntryStatus::Removed { by, .. } => Some(by),
        }
    }
}

/// A ledger row before the store has assigned its id and timestamp.
#[derive(Clone, Debug)]
pub struct NewLedgerEntry {
    pub target: Member,
    pub assigner: Member,
    pub delta: i64,
    pub message: Option<String>,
}

impl NewLedgerEntry {
    /// Materialise the row with a store-assigned id.
    pub fn into_entry(self, id: u64, now: Timestamp) -> LedgerEntry {
        LedgerEntry {
            id,
            identity: self.target.identity,
            display_name: self.target.display_name,
            assigner: self.assigner.identity,
            assigner_name: self.assigner.display_name,
            delta: self.delta,
            inserted_at: now,
            message: self.message,
            status: EntryStatus::Active,
        }
    }
}

/// Result of an atomic credit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Balance row upserted and ledger row appended together.
    Applied { balance: Balance, entry: LedgerEntry },
    /// The delta would have driven the balance below zero; nothing written.
    Insufficient { available: i64 },
}

/// A credit written inside another operation's transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedCredit {
    pub balance: Balance,
    pub entry: LedgerEntry,
}

/// Counts reported by a removal operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RemovalSummary {
    pub balances_cleared: u64,
    pub entries_marked: u64,
}

/// Trait for the balance table and the audit ledger.
pub trait LedgerStore {
    /// Balance row for an identity, if one has been created.
    fn get_balance(&self, identity: &Identity) -> Result<Option<Balance>, StoreError>;

    /// All balance rows.
    fn iter_balances(&self) -> Result<Vec<Balance>, StoreError>;

    /// Apply `entry.delta` to the target's balance and append the ledger row,
    /// in one transaction.
    ///
    /// The non-negativity check and the increment run inside the same
    /// transaction, so no concurrent credit can be lost or bypass the check.
    fn apply_credit(&self, entry: NewLedgerEntry, now: Timestamp) -> Result<CreditOutcome, StoreError>;

    /// Ledger rows for one identity, oldest first.
    fn ledger_for(&self, identity: &Identity, include_removed: bool) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Every ledger row, oldest first.
    fn iter_ledger(&self) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Clear every balance row and mark every active ledger row removed by
    /// `actor`, in one transaction. Rows removed earlier keep their attribution.
    fn reset_all(&self, actor: &Identity, now: Timestamp) -> Result<RemovalSummary, StoreError>;

    /// Like [`LedgerStore::reset_all`], restricted to the listed identities.
    fn remove_identities(
        &self,
        identities: &[Identity],
        actor: &Identity,
        now: Timestamp,
    ) -> Result<RemovalSummary, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    fn entry() -> LedgerEntry {
        NewLedgerEntry {
            target: Member::new(id("1"), "alice"),
            assigner: Member::new(id("2"), "admin"),
            delta: 10,
            message: None,
        }
        .into_entry(7, Timestamp::new(100))
    }

    #[test]
    fn removal_is_one_shot() {
        let mut e = entry();
        assert!(e.mark_removed(&id("admin-a"), Timestamp::new(200)));
        assert!(!e.mark_removed(&id("admin-b"), Timestamp::new(300)));
        assert_eq!(e.removed_by(), Some(&id("admin-a")));
        assert_eq!(e.removed_at(), Some(Timestamp::new(200)));
    }

    #[test]
    fn new_entry_is_active() {
        let e = entry();
        assert!(e.is_active());
        assert_eq!(e.id, 7);
        assert_eq!(e.removed_at(), None);
    }
}
