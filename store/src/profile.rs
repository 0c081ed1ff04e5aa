//! Profile and profile change-log storage trait.

use crate::{AppliedCredit, NewLedgerEntry, StoreError};
use pass_types::{Identity, Member, ProfileField, Timestamp};
use serde::{Deserialize, Serialize};

/// Identity-linked profile fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub identity: Identity,
    pub display_name: String,
    pub email: Option<String>,
    pub wallet_address: Option<String>,
    pub handle: Option<String>,
}

impl Profile {
    pub fn empty(member: &Member) -> Self {
        Self {
            identity: member.identity.clone(),
            display_name: member.display_name.clone(),
            email: None,
            wallet_address: None,
            handle: None,
        }
    }

    pub fn field(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Email => self.email.as_deref(),
            ProfileField::WalletAddress => self.wallet_address.as_deref(),
            ProfileField::Handle => self.handle.as_deref(),
        }
    }

    pub fn set_field(&mut self, field: ProfileField, value: String) {
        let slot = match field {
            ProfileField::Email => &mut self.email,
            ProfileField::WalletAddress => &mut self.wallet_address,
            ProfileField::Handle => &mut self.handle,
        };
        *slot = Some(value);
    }

    /// Email and wallet are both required for a complete profile.
    pub fn is_complete(&self) -> bool {
        self.email.is_some() && self.wallet_address.is_some()
    }
}

/// Append-only record of one accepted field change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileChange {
    pub identity: Identity,
    pub field: ProfileField,
    pub value: String,
    pub changed_at: Timestamp,
}

/// Result of [`ProfileStore::apply_profile_change`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileChangeOutcome {
    pub profile: Profile,
    /// The first-set bonus, when it was paid by this change.
    pub bonus: Option<AppliedCredit>,
}

pub trait ProfileStore {
    fn get_profile(&self, identity: &Identity) -> Result<Option<Profile>, StoreError>;

    /// Upsert the field value and append the change-log row in one
    /// transaction.
    ///
    /// `first_set_bonus` is credited in that same transaction if, and only
    /// if, the stored field was unset when the transaction began. Two
    /// concurrent first sets therefore pay it once.
    fn apply_profile_change(
        &self,
        member: &Member,
        change: &ProfileChange,
        first_set_bonus: Option<NewLedgerEntry>,
    ) -> Result<ProfileChangeOutcome, StoreError>;

    /// Time of the latest change-log row for `(identity, field)`.
    fn last_change(&self, identity: &Identity, field: ProfileField) -> Result<Option<Timestamp>, StoreError>;

    /// Change-log rows for one identity, oldest first.
    fn changes_for(&self, identity: &Identity) -> Result<Vec<ProfileChange>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_targets_the_right_slot() {
        let member = Member::new(Identity::new("1").unwrap(), "alice");
        let mut profile = Profile::empty(&member);
        assert!(!profile.is_complete());

        profile.set_field(ProfileField::Email, "a@b.io".into());
        assert_eq!(profile.field(ProfileField::Email), Some("a@b.io"));
        assert_eq!(profile.field(ProfileField::WalletAddress), None);

        profile.set_field(ProfileField::WalletAddress, "0xabc".into());
        assert!(profile.is_complete());
        assert_eq!(profile.field(ProfileField::Handle), None);
    }
}
