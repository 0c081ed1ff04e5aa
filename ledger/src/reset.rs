//! Administrative bulk reset.

use std::sync::Arc;

use pass_store::{LedgerStore, RemovalSummary};
use pass_types::{Clock, Identity, SystemClock};

use crate::error::PointsError;

/// Clears every balance and soft-deletes every active ledger row.
///
/// Both steps commit together or not at all. Rows removed before the call
/// keep their original `removed_by`/`removed_at`.
pub struct BulkReset<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
}

impl<S: LedgerStore, C: Clock> BulkReset<S, C> {
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn reset_all(&self, actor: &Identity) -> Result<RemovalSummary, PointsError> {
        let summary = self.store.reset_all(actor, self.clock.now())?;
        tracing::info!(
            actor = %actor,
            balances_cleared = summary.balances_cleared,
            entries_marked = summary.entries_marked,
            "all balances reset"
        );
        Ok(summary)
    }
}
