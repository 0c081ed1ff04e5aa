//! Global settings storage trait.

use crate::StoreError;

/// Externally stored configuration rows shared by every running instance.
pub trait SettingsStore {
    /// The profile-lock flag, or `None` if the row does not exist.
    fn profile_lock(&self) -> Result<Option<bool>, StoreError>;

    fn set_profile_lock(&self, locked: bool) -> Result<(), StoreError>;
}
