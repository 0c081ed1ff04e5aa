//! The point assigner.

use std::sync::Arc;

use pass_store::{Balance, CreditOutcome, LedgerEntry, LedgerStore, NewLedgerEntry, RemovalSummary};
use pass_types::{Clock, Identity, Member, PointCategory, SystemClock};

use crate::config::PointsConfig;
use crate::error::PointsError;

/// Result of an accepted credit or debit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditReceipt {
    /// Balance after the delta was applied.
    pub balance: i64,
    /// The ledger row that was appended.
    pub entry: LedgerEntry,
}

/// Applies signed point deltas.
///
/// The non-negativity check and the increment run inside one store
/// transaction (see [`LedgerStore::apply_credit`]), so two concurrent debits
/// can not both pass against the same balance.
pub struct PointAssigner<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    config: PointsConfig,
}

impl<S: LedgerStore, C: Clock> PointAssigner<S, C> {
    pub fn new(store: Arc<S>, clock: C, config: PointsConfig) -> Self {
        Self { store, clock, config }
    }

    pub fn config(&self) -> &PointsConfig {
        &self.config
    }

    /// Turn an explicit amount or a category into a positive point value.
    pub fn resolve_amount(&self, amount: Option<i64>, category: Option<PointCategory>) -> Result<i64, PointsError> {
        let resolved = match (amount, category) {
            (Some(_), Some(_)) => return Err(PointsError::AmbiguousInput),
            (Some(amount), None) => amount,
            (None, Some(category)) => self.config.value_of(category).unwrap_or(0),
            (None, None) => 0,
        };
        if resolved <= 0 {
            return Err(PointsError::InvalidAmount);
        }
        Ok(resolved)
    }

    /// Apply `delta` to `target`'s balance and append the ledger row.
    ///
    /// A negative delta is a debit; a debit larger than the current balance
    /// is rejected with [`PointsError::InsufficientBalance`] and nothing is
    /// written.
    pub fn credit(
        &self,
        target: &Member,
        assigner: &Member,
        delta: i64,
        message: Option<String>,
    ) -> Result<CreditReceipt, PointsError> {
        if delta == 0 {
            return Err(PointsError::InvalidAmount);
        }

        let entry = NewLedgerEntry {
            target: target.clone(),
            assigner: assigner.clone(),
            delta,
            message,
        };
        match self.store.apply_credit(entry, self.clock.now())? {
            CreditOutcome::Applied { balance, entry } => {
                tracing::info!(
                    identity = %target.identity,
                    assigner = %assigner.identity,
                    delta,
                    balance = balance.balance,
                    entry_id = entry.id,
                    "points applied"
                );
                Ok(CreditReceipt {
                    balance: balance.balance,
                    entry,
                })
            }
            CreditOutcome::Insufficient { available } => {
                tracing::warn!(
                    identity = %target.identity,
                    delta,
                    available,
                    "debit rejected: insufficient balance"
                );
                Err(PointsError::InsufficientBalance {
                    needed: delta.saturating_neg(),
                    available,
                })
            }
        }
    }

    /// Resolve the amount, then credit it.
    ///
    /// Without an explicit message the category's label is recorded.
    pub fn grant(
        &self,
        target: &Member,
        assigner: &Member,
        amount: Option<i64>,
        category: Option<PointCategory>,
        message: Option<String>,
    ) -> Result<CreditReceipt, PointsError> {
        let points = self.resolve_amount(amount, category)?;
        let message = message.or_else(|| category.map(|c| c.label().to_string()));
        self.credit(target, assigner, points, message)
    }

    /// Current balance row; an identity never credited reads as zero.
    pub fn balance(&self, identity: &Identity) -> Result<Balance, PointsError> {
        Ok(self
            .store
            .get_balance(identity)?
            .unwrap_or_else(|| Balance::empty(identity.clone())))
    }

    /// Ledger rows for one identity, oldest first.
    pub fn history(&self, identity: &Identity, include_removed: bool) -> Result<Vec<LedgerEntry>, PointsError> {
        Ok(self.store.ledger_for(identity, include_removed)?)
    }

    /// Delete the listed identities' balances and soft-delete their ledger
    /// rows, in one transaction.
    pub fn remove_identities(&self, identities: &[Identity], actor: &Identity) -> Result<RemovalSummary, PointsError> {
        let summary = self.store.remove_identities(identities, actor, self.clock.now())?;
        tracing::info!(
            actor = %actor,
            identities = identities.len(),
            balances_cleared = summary.balances_cleared,
            entries_marked = summary.entries_marked,
            "identities removed from ledger"
        );
        Ok(summary)
    }
}
