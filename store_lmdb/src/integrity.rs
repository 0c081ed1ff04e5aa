//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before any command touches
//! balances. Besides counting rows, the check recomputes every balance from
//! the active ledger rows and reports any mismatch.

use std::collections::HashMap;
use std::path::Path;

use heed::types::Bytes;

use pass_store::{LedgerStore, SettingsStore};
use pass_types::Identity;

use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that we expect to exist in a valid environment.
const EXPECTED_DATABASES: &[&str] = &[
    "balances",
    "ledger",
    "ledger_index",
    "checkins",
    "profiles",
    "profile_changes",
    "settings",
    "meta",
];

/// Check LMDB database integrity.
///
/// Read failures and ledger mismatches are recorded in the report rather
/// than causing a hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();

    {
        let rtxn = env.env.read_txn()?;
        for &db_name in EXPECTED_DATABASES {
            match env.env.open_database::<Bytes, Bytes>(&rtxn, Some(db_name)) {
                Ok(Some(db)) => {
                    report.databases_checked += 1;
                    match db.len(&rtxn) {
                        Ok(count) => report.total_entries += count,
                        Err(e) => report
                            .errors
                            .push(format!("failed to read database '{db_name}': {e}")),
                    }
                }
                Ok(None) => report.errors.push(format!("database '{db_name}' is missing")),
                Err(e) => report
                    .errors
                    .push(format!("failed to open database '{db_name}': {e}")),
            }
        }
    }

    match (env.iter_balances(), env.iter_ledger()) {
        (Ok(balances), Ok(entries)) => {
            let mut sums: HashMap<Identity, i64> = HashMap::new();
            for entry in entries.iter().filter(|e| e.is_active()) {
                *sums.entry(entry.identity.clone()).or_default() += entry.delta;
            }
            for balance in &balances {
                let expected = sums.remove(&balance.identity).unwrap_or(0);
                if balance.balance != expected {
                    report.errors.push(format!(
                        "balance of {} is {} but active ledger rows sum to {}",
                        balance.identity, balance.balance, expected
                    ));
                }
                if balance.balance < 0 {
                    report
                        .errors
                        .push(format!("balance of {} is negative", balance.identity));
                }
            }
            for (identity, sum) in sums {
                if sum != 0 {
                    report.errors.push(format!(
                        "{identity} has active ledger rows summing to {sum} but no balance row"
                    ));
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => report.errors.push(format!("failed to scan ledger: {e}")),
    }

    if let Ok(None) = env.profile_lock() {
        tracing::warn!("profile lock row is missing; profile edits are refused until it is set");
    }

    Ok(report)
}

/// Check if the LMDB data directory looks valid before opening.
///
/// A missing or empty directory is fresh and passes. A directory holding
/// other files but no `data.mdb` suggests corruption or a wrong path.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let mut entries = std::fs::read_dir(path)
        .map_err(|e| format!("cannot read data directory {}: {e}", path.display()))?;
    if entries.next().is_none() {
        return Ok(());
    }
    let data_file = path.join("data.mdb");
    if !data_file.exists() {
        return Err(format!(
            "LMDB directory exists but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
