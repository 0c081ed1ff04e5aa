//! Wiring of the engines behind the admin commands.

use std::sync::Arc;

use pass_checkin::{CheckInConfig, CheckInEngine, CheckInError};
use pass_ledger::{BulkReset, PointAssigner, PointsConfig, PointsError};
use pass_profile::{ProfileConfig, ProfileError, ProfileGate};
use pass_store::{LedgerEntry, PassStore, StoreError};
use pass_types::{Clock, Identity, Member, PointCategory, ProfileField};
use pass_utils::format_duration;
use pass_verification::IdentityVerifier;
use thiserror::Error;

/// Why a command did not succeed.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The request was refused; nothing was written.
    #[error("{message}")]
    Rejected { code: &'static str, message: String },

    /// Infrastructure failure.
    #[error(transparent)]
    Failed(#[from] StoreError),
}

impl CommandError {
    fn rejected(code: &'static str, message: impl ToString) -> Self {
        Self::Rejected {
            code,
            message: message.to_string(),
        }
    }
}

impl From<PointsError> for CommandError {
    fn from(e: PointsError) -> Self {
        match e {
            PointsError::Store(e) => Self::Failed(e),
            other => Self::rejected(other.code(), &other),
        }
    }
}

impl From<CheckInError> for CommandError {
    fn from(e: CheckInError) -> Self {
        match e {
            CheckInError::Store(e) => Self::Failed(e),
            CheckInError::CooldownActive { remaining_secs } => Self::rejected(
                "cooldown_active",
                format!("already checked in; try again in {}", format_duration(remaining_secs)),
            ),
            other => Self::rejected(other.code(), &other),
        }
    }
}

impl From<ProfileError> for CommandError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::Store(e) | ProfileError::Points(PointsError::Store(e)) => Self::Failed(e),
            ProfileError::CooldownActive { field, remaining_secs } => Self::rejected(
                "cooldown_active",
                format!("{field} can change again in {}", format_duration(remaining_secs)),
            ),
            other => Self::rejected(other.code(), &other),
        }
    }
}

/// Lines printed on success.
pub type Output = Vec<String>;

pub struct App<S, V, C> {
    actor: Member,
    max_grant: i64,
    assigner: PointAssigner<S, C>,
    reset: BulkReset<S, C>,
    check_in: CheckInEngine<S, C>,
    profiles: ProfileGate<S, V, C>,
}

impl<S, V, C> App<S, V, C>
where
    S: PassStore,
    V: IdentityVerifier,
    C: Clock + Clone,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<S>,
        verifier: V,
        clock: C,
        actor: Member,
        max_grant: i64,
        points: PointsConfig,
        check_in: CheckInConfig,
        profile: ProfileConfig,
    ) -> Self {
        Self {
            actor,
            max_grant,
            assigner: PointAssigner::new(store.clone(), clock.clone(), points),
            reset: BulkReset::new(store.clone(), clock.clone()),
            check_in: CheckInEngine::new(store.clone(), clock.clone(), check_in),
            profiles: ProfileGate::new(store, verifier, clock, profile),
        }
    }

    fn check_max_grant(&self, points: i64) -> Result<(), CommandError> {
        if points > self.max_grant {
            return Err(CommandError::rejected(
                "exceeds_max_grant",
                format!("can not assign more than {} points at once", self.max_grant),
            ));
        }
        Ok(())
    }

    /// Signed credit; negative amounts debit.
    pub fn credit(&self, target: &Member, amount: i64, message: Option<String>) -> Result<Output, CommandError> {
        self.check_max_grant(amount)?;
        let receipt = self.assigner.credit(target, &self.actor, amount, message)?;
        Ok(vec![format!(
            "{target}: {amount:+} points, balance {}",
            receipt.balance
        )])
    }

    pub fn grant(
        &self,
        target: &Member,
        amount: Option<i64>,
        category: Option<PointCategory>,
        message: Option<String>,
    ) -> Result<Output, CommandError> {
        let points = self.assigner.resolve_amount(amount, category)?;
        self.check_max_grant(points)?;
        let receipt = self.assigner.grant(target, &self.actor, amount, category, message)?;
        Ok(vec![format!(
            "{target}: +{points} points ({}), balance {}",
            receipt.entry.message.as_deref().unwrap_or("no message"),
            receipt.balance
        )])
    }

    pub fn balance(&self, identity: &Identity) -> Result<Output, CommandError> {
        let balance = self.assigner.balance(identity)?;
        Ok(vec![format!(
            "{identity}: {} points ({} transferred)",
            balance.balance, balance.transferred_balance
        )])
    }

    pub fn history(&self, identity: &Identity, include_removed: bool) -> Result<Output, CommandError> {
        let rows = self.assigner.history(identity, include_removed)?;
        if rows.is_empty() {
            return Ok(vec![format!("{identity}: no ledger entries")]);
        }
        Ok(rows.iter().map(format_entry).collect())
    }

    pub fn remove(&self, identities: &[Identity]) -> Result<Output, CommandError> {
        let summary = self.assigner.remove_identities(identities, &self.actor.identity)?;
        Ok(vec![format!(
            "removed {} balances, marked {} ledger entries",
            summary.balances_cleared, summary.entries_marked
        )])
    }

    pub fn reset_all(&self) -> Result<Output, CommandError> {
        let summary = self.reset.reset_all(&self.actor.identity)?;
        Ok(vec![format!(
            "reset {} balances, marked {} ledger entries",
            summary.balances_cleared, summary.entries_marked
        )])
    }

    pub fn check_in(&self, member: &Member) -> Result<Output, CommandError> {
        let receipt = self.check_in.check_in(member)?;
        let line = match receipt.reward {
            Some(reward) => format!(
                "{member}: checked in, earned {} points, balance {}",
                reward.points, reward.balance
            ),
            None => format!(
                "{member}: checked in, {} more check-in(s) until the reward",
                receipt.check_ins_until_reward
            ),
        };
        Ok(vec![line])
    }

    pub fn check_in_status(&self, identity: &Identity) -> Result<Output, CommandError> {
        let status = self.check_in.status(identity)?;
        let next = match status.remaining_cooldown_secs {
            Some(secs) => format!("next check-in in {}", format_duration(secs)),
            None => "may check in now".to_string(),
        };
        Ok(vec![format!(
            "{identity}: progress {}/{}, {next}",
            status.iterator,
            self.check_in.config().effective_threshold()
        )])
    }

    pub fn reset_check_in(&self, identity: &Identity) -> Result<Output, CommandError> {
        if self.check_in.reset_cooldown(identity)? {
            Ok(vec![format!("{identity}: check-in cooldown cleared")])
        } else {
            Ok(vec![format!("{identity}: has never checked in")])
        }
    }

    pub async fn set_field(&self, target: &Member, field: ProfileField, value: &str) -> Result<Output, CommandError> {
        let update = self.profiles.set_field(&self.actor, target, field, value).await?;
        let mut lines = vec![format!(
            "{target}: {field} set to {}",
            update.profile.field(field).unwrap_or_default()
        )];
        if let Some(bonus) = update.bonus {
            lines.push(format!(
                "first-time bonus paid: {:+} points, balance {}",
                bonus.entry.delta, bonus.balance
            ));
        }
        Ok(lines)
    }

    pub fn profile(&self, identity: &Identity) -> Result<Output, CommandError> {
        let view = self.profiles.profile_with_points(identity)?;
        let mut lines = vec![format!("{identity}: {} points", view.balance.balance)];
        for field in ProfileField::ALL {
            let value = view
                .profile
                .as_ref()
                .and_then(|p| p.field(field))
                .unwrap_or("(not set)");
            let wait = match self.profiles.time_until_next_change(identity, field)? {
                Some(secs) => format!(", locked for {}", format_duration(secs)),
                None => String::new(),
            };
            lines.push(format!("  {field}: {value}{wait}"));
        }
        Ok(lines)
    }

    pub fn lock_profiles(&self, locked: bool) -> Result<Output, CommandError> {
        if locked {
            self.profiles.lock_profiles(&self.actor.identity)?;
            Ok(vec!["profile changes locked".to_string()])
        } else {
            self.profiles.unlock_profiles(&self.actor.identity)?;
            Ok(vec!["profile changes unlocked".to_string()])
        }
    }

    pub fn incomplete_profiles(&self) -> Result<Output, CommandError> {
        let list = self.profiles.incomplete_profiles()?;
        if list.is_empty() {
            return Ok(vec!["every point holder has a complete profile".to_string()]);
        }
        Ok(list
            .iter()
            .map(|p| {
                let missing: Vec<&str> = p.missing.iter().map(|f| f.as_str()).collect();
                format!(
                    "{} ({}): {} points, missing {}",
                    p.display_name,
                    p.identity,
                    p.balance,
                    missing.join(", ")
                )
            })
            .collect())
    }
}

fn format_entry(entry: &LedgerEntry) -> String {
    let removed = match (entry.removed_by(), entry.removed_at()) {
        (Some(by), Some(at)) => format!(" [removed by {by} at {at}]"),
        _ => String::new(),
    };
    format!(
        "#{} {} {:+} by {} \"{}\"{removed}",
        entry.id,
        entry.inserted_at,
        entry.delta,
        entry.assigner_name,
        entry.message.as_deref().unwrap_or("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pass_nullables::{NullClock, NullStore, NullVerifier};

    type TestApp = App<NullStore, NullVerifier, Arc<NullClock>>;

    fn app() -> TestApp {
        App::new(
            Arc::new(NullStore::new()),
            NullVerifier::accepting(),
            Arc::new(NullClock::new(1_700_000_000)),
            Member::new(Identity::new("admin").unwrap(), "admin"),
            100,
            PointsConfig::default(),
            CheckInConfig::default(),
            ProfileConfig::default(),
        )
    }

    fn user() -> Member {
        Member::new(Identity::new("1").unwrap(), "alice")
    }

    fn code(result: Result<Output, CommandError>) -> &'static str {
        match result {
            Err(CommandError::Rejected { code, .. }) => code,
            other => panic!("expected a rejection, got {other:?}"),
        }
    }

    #[test]
    fn caller_enforces_max_grant() {
        let app = app();
        assert_eq!(code(app.credit(&user(), 101, None)), "exceeds_max_grant");
        assert_eq!(code(app.grant(&user(), Some(500), None, None)), "exceeds_max_grant");
        app.credit(&user(), 100, None).unwrap();
    }

    #[test]
    fn rejections_carry_engine_codes() {
        let app = app();
        assert_eq!(code(app.credit(&user(), -1, None)), "insufficient_balance");
        assert_eq!(
            code(app.grant(&user(), Some(5), Some(PointCategory::AnswerPoll), None)),
            "ambiguous_input"
        );
        app.check_in(&user()).unwrap();
        assert_eq!(code(app.check_in(&user())), "cooldown_active");
    }

    #[test]
    fn history_marks_removed_rows() {
        let app = app();
        app.grant(&user(), None, Some(PointCategory::BetaTesting), None)
            .unwrap();
        app.reset_all().unwrap();
        let lines = app.history(&user().identity, true).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("+50"));
        assert!(lines[0].contains("removed by admin"));
        assert!(app.history(&user().identity, false).unwrap()[0].contains("no ledger entries"));
    }

    #[tokio::test]
    async fn profile_flow_reports_bonus_and_lock() {
        let app = app();
        let lines = app
            .set_field(&user(), ProfileField::Email, "alice@pass.io")
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("+100"));

        app.lock_profiles(true).unwrap();
        assert_eq!(
            code(app.set_field(&user(), ProfileField::Handle, "alice").await),
            "profile_locked"
        );
    }
}
