//! LMDB environment setup.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::write_batch::WriteBatch;
use crate::LmdbError;

/// Default map size: 1 GiB is far beyond what a community ledger needs.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024 * 1024;

/// Number of named databases opened by [`LmdbEnvironment::open`].
pub const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
///
/// Cloning is cheap: `heed::Env` is reference counted and database handles
/// are plain identifiers.
#[derive(Clone)]
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    /// identity -> Balance
    pub(crate) balances_db: Database<Bytes, Bytes>,
    /// ledger id (u64 BE) -> LedgerEntry
    pub(crate) ledger_db: Database<Bytes, Bytes>,
    /// (identity, ledger id) -> ()
    pub(crate) ledger_index_db: Database<Bytes, Bytes>,
    /// identity -> CheckInState
    pub(crate) checkins_db: Database<Bytes, Bytes>,
    /// identity -> Profile
    pub(crate) profiles_db: Database<Bytes, Bytes>,
    /// (identity, field, time, seq) -> ProfileChange
    pub(crate) changes_db: Database<Bytes, Bytes>,
    /// setting name -> value
    pub(crate) settings_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, max_dbs: u32, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        // SAFETY: the environment is opened once per process for this path and
        // the data file is never memory-mapped by anything else.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(max_dbs.max(MAX_DBS))
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let balances_db = env.create_database(&mut wtxn, Some("balances"))?;
        let ledger_db = env.create_database(&mut wtxn, Some("ledger"))?;
        let ledger_index_db = env.create_database(&mut wtxn, Some("ledger_index"))?;
        let checkins_db = env.create_database(&mut wtxn, Some("checkins"))?;
        let profiles_db = env.create_database(&mut wtxn, Some("profiles"))?;
        let changes_db = env.create_database(&mut wtxn, Some("profile_changes"))?;
        let settings_db = env.create_database(&mut wtxn, Some("settings"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), map_size, "opened LMDB environment");

        Ok(Self {
            env,
            balances_db,
            ledger_db,
            ledger_index_db,
            checkins_db,
            profiles_db,
            changes_db,
            settings_db,
            meta_db,
        })
    }

    /// Open with the default map size.
    pub fn open_default(path: &Path) -> Result<Self, LmdbError> {
        Self::open(path, MAX_DBS, DEFAULT_MAP_SIZE)
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Begin a write batch. Dropping it without committing rolls back.
    pub fn write_batch(&self) -> Result<WriteBatch<'_>, LmdbError> {
        WriteBatch::new(self)
    }
}
