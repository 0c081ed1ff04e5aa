//! End-to-end ledger scenarios against the LMDB backend.

use std::sync::Arc;

use pass_ledger::{BulkReset, PointAssigner, PointsConfig, PointsError};
use pass_nullables::NullClock;
use pass_store::LedgerStore;
use pass_store_lmdb::LmdbEnvironment;
use pass_types::{Identity, Member, PointCategory, Timestamp};

fn open() -> (tempfile::TempDir, Arc<LmdbEnvironment>) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let env = LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).expect("failed to open env");
    (dir, Arc::new(env))
}

fn member(id: &str, name: &str) -> Member {
    Member::new(Identity::new(id).unwrap(), name)
}

#[test]
fn credit_redeem_and_rejected_overdraft() {
    let (_dir, env) = open();
    let clock = Arc::new(NullClock::new(1_700_000_000));
    let assigner = PointAssigner::new(env.clone(), clock.clone(), PointsConfig::default());
    let user = member("111", "u");
    let admin = member("999", "admin");
    let shop = member("500", "redemption");

    let receipt = assigner
        .grant(&user, &admin, None, Some(PointCategory::BetaTesting), None)
        .unwrap();
    assert_eq!(receipt.balance, 50);
    assert_eq!(receipt.entry.delta, 50);
    assert_eq!(receipt.entry.message.as_deref(), Some("Beta Testing"));

    clock.advance(60);
    let receipt = assigner
        .credit(&user, &shop, -30, Some("Redeemed item".into()))
        .unwrap();
    assert_eq!(receipt.balance, 20);

    clock.advance(60);
    let err = assigner.credit(&user, &shop, -25, None).unwrap_err();
    assert!(matches!(err, PointsError::InsufficientBalance { needed: 25, available: 20 }));

    assert_eq!(assigner.balance(&user.identity).unwrap().balance, 20);
    let history = assigner.history(&user.identity, true).unwrap();
    assert_eq!(history.iter().map(|e| e.delta).collect::<Vec<_>>(), vec![50, -30]);
    assert_eq!(history[1].assigner, shop.identity);
}

#[test]
fn reset_all_preserves_prior_removals() {
    let (_dir, env) = open();
    let clock = Arc::new(NullClock::new(1_000));
    let assigner = PointAssigner::new(env.clone(), clock.clone(), PointsConfig::default());
    let reset = BulkReset::new(env.clone(), clock.clone());
    let admin = member("1", "admin");
    let moderator = member("2", "moderator");
    let (a, b) = (member("10", "a"), member("11", "b"));

    assigner.credit(&a, &admin, 10, None).unwrap();
    assigner.credit(&b, &admin, 20, None).unwrap();

    clock.set(2_000);
    assigner
        .remove_identities(&[a.identity.clone()], &moderator.identity)
        .unwrap();
    assert_eq!(assigner.balance(&a.identity).unwrap().balance, 0);
    assert_eq!(assigner.balance(&b.identity).unwrap().balance, 20);

    clock.set(3_000);
    let summary = reset.reset_all(&admin.identity).unwrap();
    assert_eq!(summary.balances_cleared, 1);
    assert_eq!(summary.entries_marked, 1);

    assert!(env.iter_balances().unwrap().is_empty());
    let rows = env.iter_ledger().unwrap();
    assert_eq!(rows[0].removed_by(), Some(&moderator.identity));
    assert_eq!(rows[0].removed_at(), Some(Timestamp::new(2_000)));
    assert_eq!(rows[1].removed_by(), Some(&admin.identity));
    assert_eq!(rows[1].removed_at(), Some(Timestamp::new(3_000)));
}

#[test]
fn balances_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap());
        let assigner = PointAssigner::new(env, NullClock::new(5), PointsConfig::default());
        assigner
            .credit(&member("1", "u"), &member("2", "admin"), 42, None)
            .unwrap();
    }
    let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap());
    let assigner = PointAssigner::new(env, NullClock::new(6), PointsConfig::default());
    assert_eq!(assigner.balance(&Identity::new("1").unwrap()).unwrap().balance, 42);
}
