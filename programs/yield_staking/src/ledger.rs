//! Guarded state transitions of the staking ledger.
//!
//! Instruction handlers resolve accounts and move tokens; every decision about
//! whether an operation may proceed, and every aggregate update it implies,
//! is made here. Each operation is split into a `plan_*` step that only reads
//! state and an `apply_*` step that mutates it, so a handler can run its token
//! transfers in between and the whole instruction still reverts as one unit.

use anchor_lang::prelude::*;

use crate::error::StakingError;
use crate::math::{reward_total, to_ledger_amount};
use crate::state::{Package, PositionStatus, StakeCounter, StakePosition, StakingConfig, UserTotals};

/// Terms of a position about to be opened, fixed from the package at `now`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpenTerms {
    pub principal: u64,
    pub reward_total: u64,
    pub apy: u16,
    pub lock_period: i64,
    pub stake_index: u32,
    pub start_timestamp: i64,
    pub unlock_timestamp: i64,
}

/// Amounts released when a position closes.
///
/// For a normal withdrawal `reward` is paid out; for an emergency exit it is
/// the forfeited remainder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub principal: u64,
    pub reward: u64,
}

/// Admission checks for a new stake, in the order callers observe them.
pub fn plan_open(
    config: &StakingConfig,
    package: Option<&Package>,
    user_total_staked: u64,
    stake_count: u32,
    amount: u128,
    now: i64,
) -> Result<OpenTerms> {
    require!(!config.paused, StakingError::EnginePaused);

    let package = package
        .filter(|package| package.accepts_stakes())
        .ok_or(StakingError::InvalidPackage)?;

    require!(
        amount >= config.min_stake_amount as u128,
        StakingError::BelowMinimum
    );

    // Width check must precede any reward math.
    let principal = to_ledger_amount(amount)?;

    if config.max_stake_per_user > 0 {
        let user_after = user_total_staked
            .checked_add(principal)
            .ok_or(StakingError::UserCapExceeded)?;
        require!(
            user_after <= config.max_stake_per_user,
            StakingError::UserCapExceeded
        );
    }

    if config.max_total_staked_per_package > 0 {
        let package_after = package
            .total_staked
            .checked_add(principal)
            .ok_or(StakingError::PackageCapExceeded)?;
        require!(
            package_after <= config.max_total_staked_per_package,
            StakingError::PackageCapExceeded
        );
    }

    require!(stake_count < u32::MAX, StakingError::StakeIdOverflow);

    let reward_total = reward_total(principal, package.apy, package.lock_period)?;
    let unlock_timestamp = now
        .checked_add(package.lock_period)
        .ok_or(StakingError::MathOverflow)?;

    Ok(OpenTerms {
        principal,
        reward_total,
        apy: package.apy,
        lock_period: package.lock_period,
        stake_index: stake_count,
        start_timestamp: now,
        unlock_timestamp,
    })
}

/// The vault must have grown by exactly the declared amount.
pub fn ensure_received(declared: u64, balance_before: u64, balance_after: u64) -> Result<()> {
    let received = balance_after
        .checked_sub(balance_before)
        .ok_or(StakingError::TransferAmountMismatch)?;
    require!(received == declared, StakingError::TransferAmountMismatch);
    Ok(())
}

/// Solvency with the planned position tentatively added.
///
/// `held_reward_balance` is read after the principal has been received, so
/// for a shared-asset vault it already includes the new principal.
pub fn ensure_reward_liquidity(
    config: &StakingConfig,
    terms: &OpenTerms,
    held_reward_balance: u64,
) -> Result<()> {
    let required = config.required_reserve_with(terms.principal, terms.reward_total)?;
    require!(
        held_reward_balance >= required,
        StakingError::InsufficientRewardLiquidity
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn apply_open(
    config: &mut StakingConfig,
    package: &mut Package,
    user_totals: &mut UserTotals,
    counter: &mut StakeCounter,
    position: &mut StakePosition,
    config_key: Pubkey,
    owner: Pubkey,
    terms: &OpenTerms,
) -> Result<()> {
    require!(
        counter.count == terms.stake_index,
        StakingError::PositionMismatch
    );

    position.config = config_key;
    position.owner = owner;
    position.package_id = package.id;
    position.stake_index = terms.stake_index;
    position.principal = terms.principal;
    position.reward_total = terms.reward_total;
    position.reward_claimed = 0;
    position.lock_period = terms.lock_period;
    position.start_timestamp = terms.start_timestamp;
    position.unlock_timestamp = terms.unlock_timestamp;
    position.balance = terms.principal;
    position.status = PositionStatus::Open;

    counter.count = counter
        .count
        .checked_add(1)
        .ok_or(StakingError::StakeIdOverflow)?;

    config.total_locked = config
        .total_locked
        .checked_add(terms.principal)
        .ok_or(StakingError::MathOverflow)?;
    config.total_reward_debt = config
        .total_reward_debt
        .checked_add(terms.reward_total)
        .ok_or(StakingError::MathOverflow)?;
    user_totals.total_staked = user_totals
        .total_staked
        .checked_add(terms.principal)
        .ok_or(StakingError::MathOverflow)?;
    package.total_staked = package
        .total_staked
        .checked_add(terms.principal)
        .ok_or(StakingError::MathOverflow)?;
    config.last_updated = terms.start_timestamp;

    Ok(())
}

pub fn plan_claim(config: &StakingConfig, position: Option<&StakePosition>, now: i64) -> Result<u64> {
    require!(!config.paused, StakingError::EnginePaused);
    let position = position
        .filter(|position| position.is_open())
        .ok_or(StakingError::NoStake)?;

    let claimable = position.claimable_at(now)?;
    require!(claimable > 0, StakingError::NothingToClaim);
    Ok(claimable)
}

pub fn apply_claim(
    config: &mut StakingConfig,
    position: &mut StakePosition,
    amount: u64,
    now: i64,
) -> Result<()> {
    let claimed = position
        .reward_claimed
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;
    require!(claimed <= position.reward_total, StakingError::MathOverflow);

    position.reward_claimed = claimed;
    config.total_reward_debt = config
        .total_reward_debt
        .checked_sub(amount)
        .ok_or(StakingError::MathOverflow)?;
    config.last_updated = now;
    Ok(())
}

pub fn plan_withdraw(
    config: &StakingConfig,
    position: Option<&StakePosition>,
    now: i64,
) -> Result<Settlement> {
    require!(!config.paused, StakingError::EnginePaused);
    let position = position
        .filter(|position| position.is_open())
        .ok_or(StakingError::NoStake)?;
    require!(position.is_unlocked(now), StakingError::StakeLocked);

    Ok(Settlement {
        principal: position.principal,
        reward: position.remaining_reward(),
    })
}

/// Token movements out of the vaults for one payout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Payout {
    /// Paid from the stake vault in the stake mint.
    pub from_stake_vault: u64,
    /// Paid from the separate reward vault. Always zero for a shared asset.
    pub from_reward_vault: u64,
}

/// Splits `principal` and `reward` across the vaults that hold them. A shared
/// asset pays both from the single stake vault in one transfer.
pub fn payout_plan(config: &StakingConfig, principal: u64, reward: u64) -> Result<Payout> {
    if config.same_asset() {
        let total = principal
            .checked_add(reward)
            .ok_or(StakingError::MathOverflow)?;
        return Ok(Payout {
            from_stake_vault: total,
            from_reward_vault: 0,
        });
    }
    Ok(Payout {
        from_stake_vault: principal,
        from_reward_vault: reward,
    })
}

pub fn plan_emergency_withdraw(
    config: &StakingConfig,
    position: Option<&StakePosition>,
) -> Result<Settlement> {
    require!(config.paused, StakingError::NotPaused);
    let position = position
        .filter(|position| position.is_open())
        .ok_or(StakingError::NoStake)?;

    Ok(Settlement {
        principal: position.principal,
        reward: position.remaining_reward(),
    })
}

/// Terminal transition shared by withdraw and emergency withdraw.
///
/// Unclaimed reward leaves the debt either way; only a normal withdrawal
/// records it as claimed.
pub fn apply_close(
    config: &mut StakingConfig,
    package: &mut Package,
    user_totals: &mut UserTotals,
    position: &mut StakePosition,
    status: PositionStatus,
    now: i64,
) -> Result<Settlement> {
    require!(position.is_open(), StakingError::NoStake);
    require!(status != PositionStatus::Open, StakingError::NoStake);

    let settlement = Settlement {
        principal: position.principal,
        reward: position.remaining_reward(),
    };

    position.balance = 0;
    position.status = status;
    if status == PositionStatus::Withdrawn {
        position.reward_claimed = position.reward_total;
    }

    config.total_locked = config
        .total_locked
        .checked_sub(settlement.principal)
        .ok_or(StakingError::MathOverflow)?;
    config.total_reward_debt = config
        .total_reward_debt
        .checked_sub(settlement.reward)
        .ok_or(StakingError::MathOverflow)?;
    user_totals.total_staked = user_totals
        .total_staked
        .checked_sub(settlement.principal)
        .ok_or(StakingError::MathOverflow)?;
    package.total_staked = package
        .total_staked
        .checked_sub(settlement.principal)
        .ok_or(StakingError::MathOverflow)?;
    config.last_updated = now;

    Ok(settlement)
}

pub fn plan_excess_withdrawal(
    config: &StakingConfig,
    held_reward_balance: u64,
    amount: u64,
) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);
    let excess = config.excess_reward(held_reward_balance)?;
    require!(amount <= excess, StakingError::ExceedsExcess);
    Ok(())
}

/// Create or overwrite a package's terms. Never touches `total_staked`.
pub fn apply_package_update(
    config: &StakingConfig,
    package: &mut Package,
    config_key: Pubkey,
    id: u8,
    lock_period: i64,
    apy: u16,
    enabled: bool,
) -> Result<()> {
    config.validate_package_terms(lock_period, apy)?;

    package.config = config_key;
    package.id = id;
    package.lock_period = lock_period;
    package.apy = apy;
    package.enabled = enabled;
    Ok(())
}

pub fn apply_pause(config: &mut StakingConfig, paused: bool, now: i64) -> Result<()> {
    if paused {
        require!(!config.paused, StakingError::AlreadyPaused);
    } else {
        require!(config.paused, StakingError::NotPaused);
    }
    config.paused = paused;
    config.last_updated = now;
    Ok(())
}
