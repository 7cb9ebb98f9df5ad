mod common;

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use common::{err, Engine, T0};
use proptest::prelude::*;
use yield_staking::error::StakingError;

#[derive(Clone, Debug)]
enum Op {
    Stake { user: usize, package: u8, amount: u64 },
    Claim { user: usize, package: u8, index: u32 },
    Withdraw { user: usize, package: u8, index: u32 },
    EmergencyWithdraw { user: usize, package: u8, index: u32 },
    SetPackage { id: u8, lock_period: i64, apy: u16, enabled: bool },
    Fund(u64),
    WithdrawExcess(u64),
    Advance(i64),
    Pause,
    Unpause,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..3usize, 1..4u8, 0..5_000_000_000_000u64)
            .prop_map(|(user, package, amount)| Op::Stake { user, package, amount }),
        3 => (0..3usize, 1..4u8, 0..4u32)
            .prop_map(|(user, package, index)| Op::Claim { user, package, index }),
        3 => (0..3usize, 1..4u8, 0..4u32)
            .prop_map(|(user, package, index)| Op::Withdraw { user, package, index }),
        1 => (0..3usize, 1..4u8, 0..4u32)
            .prop_map(|(user, package, index)| Op::EmergencyWithdraw { user, package, index }),
        1 => (1..4u8, 1..1_000i64, 1..=10_000u16, any::<bool>())
            .prop_map(|(id, lock_period, apy, enabled)| Op::SetPackage { id, lock_period, apy, enabled }),
        2 => (0..50_000_000u64).prop_map(Op::Fund),
        1 => (0..50_000_000u64).prop_map(Op::WithdrawExcess),
        3 => (0..400i64).prop_map(Op::Advance),
        1 => Just(Op::Pause),
        1 => Just(Op::Unpause),
    ]
}

/// Payouts that need the vault must never be short of funds.
fn assert_never_short(result: Result<impl std::fmt::Debug>) {
    if let Err(error) = result {
        assert_ne!(error, err(StakingError::InsufficientRewardLiquidity));
        assert_ne!(error, err(StakingError::MathOverflow));
    }
}

fn run(same_asset: bool, ops: Vec<Op>) {
    let mut engine = Engine::new(same_asset, 1_000);
    let admin = engine.admin();
    let users = [Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
    engine.set_package(admin, 1, 100, 10_000, true).unwrap();
    engine.set_package(admin, 2, 365, 2_500, true).unwrap();
    engine.fund(20_000_000);

    let mut now = T0;
    let mut counts: BTreeMap<(Pubkey, u8), u32> = BTreeMap::new();

    for op in ops {
        match op {
            Op::Stake { user, package, amount } => {
                let owner = users[user];
                let before = engine.totals();
                if engine.stake(owner, amount as u128, package, now).is_err() {
                    assert_eq!(engine.totals(), before);
                }
            }
            Op::Claim { user, package, index } => {
                assert_never_short(engine.claim(users[user], package, index, now));
            }
            Op::Withdraw { user, package, index } => {
                assert_never_short(engine.withdraw(users[user], package, index, now));
            }
            Op::EmergencyWithdraw { user, package, index } => {
                assert_never_short(engine.emergency_withdraw(admin, users[user], package, index, now));
            }
            Op::SetPackage { id, lock_period, apy, enabled } => {
                engine
                    .set_package(admin, id, lock_period, apy, enabled)
                    .unwrap();
            }
            Op::Fund(amount) => engine.fund(amount),
            Op::WithdrawExcess(amount) => {
                let excess = engine.totals().excess;
                let result = engine.withdraw_excess_reward(admin, amount);
                assert_eq!(result.is_ok(), amount > 0 && amount <= excess);
            }
            Op::Advance(seconds) => now += seconds,
            Op::Pause => {
                let _ = engine.pause(admin, now);
            }
            Op::Unpause => {
                let _ = engine.unpause(admin, now);
            }
        }

        engine.assert_aggregates_consistent();
        engine.assert_solvent();

        for (key, position) in &engine.positions {
            assert!(position.reward_claimed <= position.reward_total);
            let paid = engine.rewards_paid.get(key).copied().unwrap_or(0);
            assert!(paid <= position.reward_total);
        }
        for (key, counter) in &engine.counters {
            let previous = counts.insert(*key, counter.count).unwrap_or(0);
            assert!(counter.count >= previous);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn shared_vault_sequences_keep_ledger_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        run(true, ops);
    }

    #[test]
    fn separate_vault_sequences_keep_ledger_invariants(ops in prop::collection::vec(op_strategy(), 1..60)) {
        run(false, ops);
    }

    #[test]
    fn claims_never_exceed_snapshot(
        amount in 1_000u64..10_000_000_000_000,
        apy in 1..=10_000u16,
        lock_period in 1..100_000i64,
        checkpoints in prop::collection::vec(0..200_000i64, 0..8),
    ) {
        let mut engine = Engine::new(false, 1_000);
        let admin = engine.admin();
        engine.set_package(admin, 1, lock_period, apy, true).unwrap();
        engine.fund(u64::MAX / 2);
        let alice = Pubkey::new_unique();
        engine.stake(alice, amount as u128, 1, T0).unwrap();
        let reward_total = engine.position(alice, 1, 0).reward_total;

        let mut sorted = checkpoints;
        sorted.sort_unstable();
        let mut claimed = 0u64;
        for offset in sorted {
            if let Ok(amount) = engine.claim(alice, 1, 0, T0 + offset) {
                claimed += amount;
            }
            prop_assert!(claimed <= reward_total);
        }

        let settled = engine.withdraw(alice, 1, 0, T0 + lock_period).unwrap();
        prop_assert_eq!(claimed + settled.reward, reward_total);
        prop_assert_eq!(settled.principal, amount);
    }
}
