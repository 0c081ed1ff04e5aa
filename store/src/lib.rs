//! Abstract storage traits for the point economy.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The engines depend only on the traits.
//!
//! Operations that touch more than one row (a credit, a bulk reset, a
//! profile change) are single trait methods so that each backend can run
//! them inside one transaction.

pub mod balance;
pub mod checkin;
pub mod error;
pub mod ledger;
pub mod meta;
pub mod profile;
pub mod settings;

pub use balance::Balance;
pub use checkin::{CheckInState, CheckInStore};
pub use error::StoreError;
pub use ledger::{AppliedCredit, CreditOutcome, EntryStatus, LedgerEntry, LedgerStore, NewLedgerEntry, RemovalSummary};
pub use meta::MetaStore;
pub use profile::{Profile, ProfileChange, ProfileChangeOutcome, ProfileStore};
pub use settings::SettingsStore;

/// Everything the engines need from one backend.
pub trait PassStore: LedgerStore + CheckInStore + ProfileStore + SettingsStore + Send + Sync {}

impl<T> PassStore for T where T: LedgerStore + CheckInStore + ProfileStore + SettingsStore + Send + Sync {}
