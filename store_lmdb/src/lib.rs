//! LMDB storage backend for the point economy.
//!
//! Implements all storage traits from `pass-store` using the `heed` LMDB bindings.
//! Each logical store maps to one LMDB database within a single environment,
//! and every multi-row operation runs inside one [`WriteBatch`].

pub mod checkin;
pub mod environment;
pub mod error;
pub mod integrity;
mod keys;
pub mod ledger;
pub mod meta;
pub mod migration;
pub mod profile;
pub mod settings;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
pub use write_batch::WriteBatch;
