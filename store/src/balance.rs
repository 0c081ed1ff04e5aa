//! Balance rows.

use pass_types::{Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// Denormalised per-identity balance, upserted on first mutation.
///
/// The ledger is the source of truth; for every identity
/// `balance == Σ delta` over its active ledger entries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    pub identity: Identity,
    /// Display name last seen for this identity.
    pub display_name: String,
    pub balance: i64,
    /// Points already moved out of the community ledger.
    #[serde(default)]
    pub transferred_balance: i64,
    pub last_updated: Timestamp,
}

impl Balance {
    /// An empty balance for an identity without a row.
    pub fn empty(identity: Identity) -> Self {
        Self {
            identity,
            display_name: String::new(),
            balance: 0,
            transferred_balance: 0,
            last_updated: Timestamp::EPOCH,
        }
    }
}
