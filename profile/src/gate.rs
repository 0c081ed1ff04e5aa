//! The profile change gate.

use std::sync::Arc;

use pass_ledger::{CreditReceipt, PointAssigner, PointsConfig};
use pass_store::{Balance, LedgerStore, NewLedgerEntry, Profile, ProfileChange, ProfileStore, SettingsStore};
use pass_types::{Clock, Identity, Member, ProfileField, SystemClock};
use pass_verification::{IdentityVerifier, VerificationOutcome, VerificationRequest};

use crate::config::ProfileConfig;
use crate::error::ProfileError;
use crate::validate::normalize;

/// Result of an accepted field change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub profile: Profile,
    /// Present when this change set the field for the first time.
    pub bonus: Option<CreditReceipt>,
}

/// A profile joined with its balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub profile: Option<Profile>,
    pub balance: Balance,
}

/// A member holding points without a complete profile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncompleteProfile {
    pub identity: Identity,
    pub display_name: String,
    pub balance: i64,
    pub missing: Vec<ProfileField>,
}

pub struct ProfileGate<S, V, C = SystemClock> {
    store: Arc<S>,
    verifier: V,
    clock: C,
    assigner: PointAssigner<S, C>,
    config: ProfileConfig,
}

impl<S, V, C> ProfileGate<S, V, C>
where
    S: ProfileStore + SettingsStore + LedgerStore,
    V: IdentityVerifier,
    C: Clock + Clone,
{
    pub fn new(store: Arc<S>, verifier: V, clock: C, config: ProfileConfig) -> Self {
        let assigner = PointAssigner::new(store.clone(), clock.clone(), PointsConfig::default());
        Self {
            store,
            verifier,
            clock,
            assigner,
            config,
        }
    }

    pub fn config(&self) -> &ProfileConfig {
        &self.config
    }

    /// Change one field of `target`'s profile on behalf of `actor`.
    ///
    /// Rejections are returned before any write: the lock short-circuits
    /// everything, the cooldown is checked before the format, and the format
    /// before the verifier is called.
    pub async fn set_field(
        &self,
        actor: &Member,
        target: &Member,
        field: ProfileField,
        raw_value: &str,
    ) -> Result<ProfileUpdate, ProfileError> {
        if self.is_locked()? {
            tracing::debug!(identity = %target.identity, %field, "profile change refused: locked");
            return Err(ProfileError::ProfileLocked);
        }

        if let Some(remaining_secs) = self.time_until_next_change(&target.identity, field)? {
            tracing::debug!(identity = %target.identity, %field, remaining_secs, "profile change on cooldown");
            return Err(ProfileError::CooldownActive { field, remaining_secs });
        }

        let value = normalize(field, raw_value)?;

        if field.is_verified() {
            let current = self.store.get_profile(&target.identity)?;
            let request = verification_request(current.as_ref(), field, &value);
            match self.verifier.verify(&request).await? {
                VerificationOutcome::Accepted => {}
                VerificationOutcome::Rejected(reason) => {
                    tracing::warn!(
                        identity = %target.identity,
                        %field,
                        reason = reason.code(),
                        "profile change rejected by verifier"
                    );
                    return Err(ProfileError::VerificationFailed(reason));
                }
            }
        }

        let now = self.clock.now();
        let change = ProfileChange {
            identity: target.identity.clone(),
            field,
            value,
            changed_at: now,
        };
        // Whether the field was unset is decided inside the store's
        // transaction, so concurrent first sets pay the bonus once.
        let first_set_bonus = (self.config.first_time_bonus > 0).then(|| NewLedgerEntry {
            target: target.clone(),
            assigner: actor.clone(),
            delta: self.config.first_time_bonus,
            message: Some(field.bonus_message().to_string()),
        });
        let outcome = self
            .store
            .apply_profile_change(target, &change, first_set_bonus)?;
        let bonus = outcome.bonus.map(|paid| CreditReceipt {
            balance: paid.balance.balance,
            entry: paid.entry,
        });
        tracing::info!(
            identity = %target.identity,
            actor = %actor.identity,
            %field,
            bonus = ?bonus.as_ref().map(|b| b.entry.delta),
            "profile field updated"
        );

        Ok(ProfileUpdate {
            profile: outcome.profile,
            bonus,
        })
    }

    /// A missing lock row reads as locked.
    pub fn is_locked(&self) -> Result<bool, ProfileError> {
        Ok(self.store.profile_lock()? != Some(false))
    }

    pub fn lock_profiles(&self, actor: &Identity) -> Result<(), ProfileError> {
        self.store.set_profile_lock(true)?;
        tracing::info!(actor = %actor, "profile changes locked");
        Ok(())
    }

    pub fn unlock_profiles(&self, actor: &Identity) -> Result<(), ProfileError> {
        self.store.set_profile_lock(false)?;
        tracing::info!(actor = %actor, "profile changes unlocked");
        Ok(())
    }

    /// Seconds until `field` may change again, or `None` if it may change now.
    pub fn time_until_next_change(&self, identity: &Identity, field: ProfileField) -> Result<Option<u64>, ProfileError> {
        let now = self.clock.now();
        Ok(self
            .store
            .last_change(identity, field)?
            .and_then(|last| last.remaining(self.config.cooldown_secs(), now)))
    }

    pub fn profile(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
        Ok(self.store.get_profile(identity)?)
    }

    pub fn profile_with_points(&self, identity: &Identity) -> Result<ProfileView, ProfileError> {
        Ok(ProfileView {
            profile: self.store.get_profile(identity)?,
            balance: self.assigner.balance(identity)?,
        })
    }

    /// Members with a positive balance missing an email or a wallet,
    /// ordered by display name.
    pub fn incomplete_profiles(&self) -> Result<Vec<IncompleteProfile>, ProfileError> {
        let mut result = Vec::new();
        for balance in self.store.iter_balances()? {
            if balance.balance <= 0 {
                continue;
            }
            let profile = self.store.get_profile(&balance.identity)?;
            let missing: Vec<ProfileField> = [ProfileField::Email, ProfileField::WalletAddress]
                .into_iter()
                .filter(|f| profile.as_ref().and_then(|p| p.field(*f)).is_none())
                .collect();
            if missing.is_empty() {
                continue;
            }
            result.push(IncompleteProfile {
                display_name: profile.map_or(balance.display_name, |p| p.display_name),
                identity: balance.identity,
                balance: balance.balance,
                missing,
            });
        }
        result.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(result)
    }
}

/// The candidate for `field` plus whatever is stored for the other verified
/// field, so email and wallet are always checked as a pair.
fn verification_request(current: Option<&Profile>, field: ProfileField, candidate: &str) -> VerificationRequest {
    let stored = |f| current.and_then(|p| p.field(f));
    match field {
        ProfileField::WalletAddress => VerificationRequest::new(stored(ProfileField::Email), Some(candidate)),
        _ => VerificationRequest::new(Some(candidate), stored(ProfileField::WalletAddress)),
    }
}
