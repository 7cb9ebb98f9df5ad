//! Reward arithmetic.
//!
//! All intermediate products are computed in u128 and narrowed back to the
//! 64-bit ledger width with an explicit check.

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Narrow a declared stake amount to the ledger's amount width.
pub fn to_ledger_amount(amount: u128) -> Result<u64> {
    u64::try_from(amount).map_err(|_| error!(StakingError::AmountTooLarge))
}

/// Reward promised to a position at open time.
///
/// `principal * apy * lock_period / (SECONDS_PER_YEAR * 10_000)`, floored.
pub fn reward_total(principal: u64, apy: u16, lock_period: i64) -> Result<u64> {
    let lock = u128::try_from(lock_period).map_err(|_| error!(StakingError::InvalidTimestamp))?;
    let denominator = (SECONDS_PER_YEAR as u128)
        .checked_mul(BASIS_POINTS_DENOMINATOR as u128)
        .ok_or(StakingError::MathOverflow)?;

    let reward = (principal as u128)
        .checked_mul(apy as u128)
        .ok_or(StakingError::MathOverflow)?
        .checked_mul(lock)
        .ok_or(StakingError::MathOverflow)?
        .checked_div(denominator)
        .ok_or(StakingError::MathOverflow)?;

    u64::try_from(reward).map_err(|_| error!(StakingError::MathOverflow))
}

/// Portion of `reward_total` earned after `elapsed` seconds of a
/// `lock_period`-second lock. Elapsed time is clamped to `[0, lock_period]`.
pub fn accrued_reward(reward_total: u64, lock_period: i64, elapsed: i64) -> Result<u64> {
    if lock_period <= 0 {
        return Ok(reward_total);
    }
    let elapsed = elapsed.clamp(0, lock_period);
    if elapsed == lock_period {
        return Ok(reward_total);
    }

    let earned = (reward_total as u128)
        .checked_mul(elapsed as u128)
        .ok_or(StakingError::MathOverflow)?
        .checked_div(lock_period as u128)
        .ok_or(StakingError::MathOverflow)?;

    u64::try_from(earned).map_err(|_| error!(StakingError::MathOverflow))
}
