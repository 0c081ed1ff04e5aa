//! LMDB implementation of SettingsStore.

use pass_store::{SettingsStore, StoreError};

use crate::{LmdbEnvironment, LmdbError};

pub(crate) const PROFILE_LOCK_KEY: &str = "profile_lock";

impl SettingsStore for LmdbEnvironment {
    fn profile_lock(&self) -> Result<Option<bool>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let value = self
            .settings_db
            .get(&rtxn, PROFILE_LOCK_KEY.as_bytes())
            .map_err(LmdbError::from)?;
        match value {
            Some([flag]) => Ok(Some(*flag != 0)),
            Some(_) => Err(StoreError::Corruption(
                "profile_lock has unexpected byte length".to_string(),
            )),
            None => Ok(None),
        }
    }

    fn set_profile_lock(&self, locked: bool) -> Result<(), StoreError> {
        let mut batch = self.write_batch()?;
        batch.put_setting(PROFILE_LOCK_KEY, &[u8::from(locked)])?;
        batch.commit()?;
        Ok(())
    }
}
