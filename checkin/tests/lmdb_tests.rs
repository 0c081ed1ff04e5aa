use std::sync::Arc;

use pass_checkin::{CheckInConfig, CheckInEngine, CheckInError, CHECK_IN_COOLDOWN_SECS};
use pass_nullables::NullClock;
use pass_store::LedgerStore;
use pass_store_lmdb::LmdbEnvironment;
use pass_types::{Identity, Member};

#[test]
fn progress_and_reward_persist_in_lmdb() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let env = Arc::new(LmdbEnvironment::open(dir.path(), 8, 10 * 1024 * 1024).unwrap());
    let clock = Arc::new(NullClock::new(1_000_000));
    let engine = CheckInEngine::new(
        env.clone(),
        clock.clone(),
        CheckInConfig::new(25, 2).unwrap(),
    );
    let member = Member::new(Identity::new("7").unwrap(), "bob");

    assert!(engine.check_in(&member).unwrap().reward.is_none());
    clock.advance(CHECK_IN_COOLDOWN_SECS / 2);
    assert!(matches!(
        engine.check_in(&member),
        Err(CheckInError::CooldownActive { .. })
    ));

    clock.advance(CHECK_IN_COOLDOWN_SECS);
    let receipt = engine.check_in(&member).unwrap();
    assert_eq!(receipt.reward.map(|r| r.balance), Some(25));
    assert_eq!(env.get_balance(&member.identity).unwrap().unwrap().balance, 25);
    assert_eq!(engine.status(&member.identity).unwrap().iterator, 0);
}
