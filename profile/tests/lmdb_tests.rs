//! Profile gate against the LMDB backend and the debug verifier.

use std::sync::Arc;

use pass_nullables::{NullClock, NullRandom, NullVerifier};
use pass_profile::{ProfileConfig, ProfileError, ProfileGate};
use pass_store::{LedgerStore, ProfileStore};
use pass_store_lmdb::{LmdbEnvironment, Migrator};
use pass_types::{Identity, Member, ProfileField, SECS_PER_DAY};
use pass_verification::{
    DebugVerifier, IdentityVerifier, VerificationOutcome, VerificationReason, VerificationRequest, VerifierError,
};

struct YieldingVerifier;

impl IdentityVerifier for YieldingVerifier {
    async fn verify(&self, _request: &VerificationRequest) -> Result<VerificationOutcome, VerifierError> {
        tokio::task::yield_now().await;
        Ok(VerificationOutcome::Accepted)
    }
}

fn open() -> (tempfile::TempDir, Arc<LmdbEnvironment>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
    (dir, Arc::new(env))
}

#[tokio::test]
async fn unmigrated_store_is_locked() {
    let (_dir, env) = open();
    let gate = ProfileGate::new(
        env.clone(),
        NullVerifier::accepting(),
        Arc::new(NullClock::new(0)),
        ProfileConfig::default(),
    );
    assert!(gate.is_locked().unwrap());

    Migrator::run(&env).unwrap();
    assert!(!gate.is_locked().unwrap());
}

#[tokio::test]
async fn change_log_drives_cooldown_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let member = Member::new(Identity::new("5").unwrap(), "eve");
    let clock = Arc::new(NullClock::new(10 * SECS_PER_DAY));
    let config = ProfileConfig {
        cooldown_days: 3,
        first_time_bonus: 20,
    };

    {
        let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap());
        Migrator::run(&env).unwrap();
        let gate = ProfileGate::new(env, NullVerifier::accepting(), clock.clone(), config.clone());
        let update = gate
            .set_field(&member, &member, ProfileField::Email, "eve@pass.io")
            .await
            .unwrap();
        assert_eq!(update.bonus.map(|b| b.balance), Some(20));
    }

    clock.advance(SECS_PER_DAY);
    let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap());
    let gate = ProfileGate::new(env.clone(), NullVerifier::accepting(), clock.clone(), config);
    assert_eq!(
        gate.time_until_next_change(&member.identity, ProfileField::Email).unwrap(),
        Some(2 * SECS_PER_DAY)
    );
    assert!(matches!(
        gate.set_field(&member, &member, ProfileField::Email, "eve2@pass.io").await,
        Err(ProfileError::CooldownActive { .. })
    ));
    assert_eq!(env.changes_for(&member.identity).unwrap().len(), 1);
}

#[tokio::test]
async fn debug_verifier_outcomes_come_from_the_taxonomy() {
    let (_dir, env) = open();
    Migrator::run(&env).unwrap();
    // First byte rolls "no data".
    let verifier = DebugVerifier::with_random(NullRandom::new(vec![1]));
    let gate = ProfileGate::new(env, verifier, Arc::new(NullClock::new(0)), ProfileConfig::default());
    let member = Member::new(Identity::new("6").unwrap(), "mallory");

    let err = gate
        .set_field(&member, &member, ProfileField::Email, "m@pass.io")
        .await
        .unwrap_err();
    assert!(matches!(err, ProfileError::VerificationFailed(VerificationReason::DataNull)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn racing_first_sets_share_one_bonus() {
    let (_dir, env) = open();
    Migrator::run(&env).unwrap();
    let gate = Arc::new(ProfileGate::new(
        env.clone(),
        YieldingVerifier,
        Arc::new(NullClock::new(0)),
        ProfileConfig::default(),
    ));
    let member = Member::new(Identity::new("8").unwrap(), "trent");

    let tasks: Vec<_> = ["t1@pass.io", "t2@pass.io", "t3@pass.io"]
        .into_iter()
        .map(|email| {
            let gate = gate.clone();
            let member = member.clone();
            tokio::spawn(async move {
                // A task that starts after another committed hits the cooldown.
                match gate.set_field(&member, &member, ProfileField::Email, email).await {
                    Ok(update) => update.bonus.is_some(),
                    Err(ProfileError::CooldownActive { .. }) => false,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            })
        })
        .collect();
    let mut paid = 0;
    for task in tasks {
        if task.await.unwrap() {
            paid += 1;
        }
    }

    assert_eq!(paid, 1);
    assert_eq!(env.ledger_for(&member.identity, true).unwrap().len(), 1);
    assert_eq!(env.get_balance(&member.identity).unwrap().unwrap().balance, 100);
}
