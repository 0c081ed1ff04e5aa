//! Database schema migration engine.
//!
//! Tracks a monotonically increasing schema version in the meta store and
//! runs sequential migration steps to bring an older database up to date.

use pass_store::{MetaStore, SettingsStore};

use crate::{LmdbEnvironment, LmdbError};

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Runs database migrations to bring the schema up to date.
pub struct Migrator;

impl Migrator {
    /// Check the stored schema version and run any needed migrations.
    ///
    /// - Version 0 means a fresh database (no version stored yet).
    /// - If the stored version matches `CURRENT_SCHEMA_VERSION`, this is a no-op.
    /// - A stored version *higher* than this code supports is refused.
    pub fn run(env: &LmdbEnvironment) -> Result<u32, LmdbError> {
        let current = env
            .get_schema_version()
            .map_err(|e| LmdbError::Schema(e.to_string()))?;

        if current == CURRENT_SCHEMA_VERSION {
            tracing::info!(version = current, "database schema is up to date");
            return Ok(current);
        }

        if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::Schema(format!(
                "database schema version {current} is newer than supported version {CURRENT_SCHEMA_VERSION}"
            )));
        }

        for version in current..CURRENT_SCHEMA_VERSION {
            tracing::info!(from = version, to = version + 1, "running migration");
            run_migration(env, version, version + 1)?;
        }

        env.set_schema_version(CURRENT_SCHEMA_VERSION)
            .map_err(|e| LmdbError::Schema(e.to_string()))?;

        tracing::info!(version = CURRENT_SCHEMA_VERSION, "migration complete");
        Ok(CURRENT_SCHEMA_VERSION)
    }
}

fn run_migration(env: &LmdbEnvironment, from: u32, to: u32) -> Result<(), LmdbError> {
    match (from, to) {
        (0, 1) => {
            // Seed the profile lock as open. A missing row reads as locked,
            // so only a fresh database gets the default.
            let existing = env
                .profile_lock()
                .map_err(|e| LmdbError::Schema(e.to_string()))?;
            if existing.is_none() {
                env.set_profile_lock(false)
                    .map_err(|e| LmdbError::Schema(e.to_string()))?;
                tracing::debug!("seeded profile lock row (unlocked)");
            }
            Ok(())
        }
        _ => Err(LmdbError::Schema(format!("unknown migration: {from} -> {to}"))),
    }
}
