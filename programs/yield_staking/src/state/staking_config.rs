use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::StakingError;

/// Engine-wide configuration and aggregate liabilities.
///
/// One config exists per (stake mint, reward mint) pair. It is the signing
/// authority of every vault it custodies.
#[account]
#[derive(Default, Debug)]
pub struct StakingConfig {
    pub admin: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    /// Equals `stake_vault` when both mints are the same.
    pub reward_vault: Pubkey,

    pub paused: bool,

    pub min_stake_amount: u64,
    /// Zero means no per-user cap.
    pub max_stake_per_user: u64,
    /// Zero means no per-package cap.
    pub max_total_staked_per_package: u64,

    pub min_apy: u16,
    pub max_apy: u16,
    pub min_lock_period: i64,
    pub max_lock_period: i64,

    /// Sum of principal over open positions.
    pub total_locked: u64,
    /// Sum of unclaimed reward over open positions.
    pub total_reward_debt: u64,

    pub last_updated: i64,

    pub bump: u8,
}

impl StakingConfig {
    pub const LEN: usize = 8
        + (32 * 5)
        + 1
        + (8 * 3)
        + (2 * 2)
        + (8 * 2)
        + (8 * 2)
        + 8
        + 1;

    pub fn same_asset(&self) -> bool {
        self.stake_mint == self.reward_mint
    }

    /// Balance backing reward liabilities, given the stake vault balance and
    /// the separate reward vault balance when one was supplied.
    pub fn held_reward_balance(&self, stake_vault: u64, reward_vault: Option<u64>) -> Result<u64> {
        if self.same_asset() {
            return Ok(stake_vault);
        }
        reward_vault.ok_or_else(|| error!(StakingError::RewardVaultMissing))
    }

    /// Balance the reward vault must hold to honour every outstanding promise.
    ///
    /// When principal and reward share one asset they compete for the same
    /// vault, so locked principal is part of the reserve.
    pub fn required_reserve(&self) -> Result<u64> {
        self.required_reserve_with(0, 0)
    }

    /// Reserve requirement with an extra position tentatively added.
    pub fn required_reserve_with(&self, extra_principal: u64, extra_reward: u64) -> Result<u64> {
        let debt = self
            .total_reward_debt
            .checked_add(extra_reward)
            .ok_or(StakingError::MathOverflow)?;
        if !self.same_asset() {
            return Ok(debt);
        }
        self.total_locked
            .checked_add(extra_principal)
            .and_then(|locked| locked.checked_add(debt))
            .ok_or_else(|| error!(StakingError::MathOverflow))
    }

    /// Surplus of `held_reward_balance` over the required reserve, floored at zero.
    pub fn excess_reward(&self, held_reward_balance: u64) -> Result<u64> {
        Ok(held_reward_balance.saturating_sub(self.required_reserve()?))
    }

    pub fn validate_package_terms(&self, lock_period: i64, apy: u16) -> Result<()> {
        require!(
            apy >= self.min_apy && apy <= self.max_apy,
            StakingError::InvalidApy
        );
        require!(
            lock_period >= self.min_lock_period && lock_period <= self.max_lock_period,
            StakingError::InvalidLockPeriod
        );
        Ok(())
    }

    pub fn set_apy_bounds(&mut self, min_apy: u16, max_apy: u16) -> Result<()> {
        require!(
            min_apy >= ABSOLUTE_MIN_APY && min_apy <= max_apy && max_apy <= ABSOLUTE_MAX_APY,
            StakingError::InvalidBounds
        );
        self.min_apy = min_apy;
        self.max_apy = max_apy;
        Ok(())
    }

    pub fn set_lock_period_bounds(&mut self, min_lock_period: i64, max_lock_period: i64) -> Result<()> {
        require!(
            min_lock_period >= ABSOLUTE_MIN_LOCK_PERIOD
                && min_lock_period <= max_lock_period
                && max_lock_period <= ABSOLUTE_MAX_LOCK_PERIOD,
            StakingError::InvalidBounds
        );
        self.min_lock_period = min_lock_period;
        self.max_lock_period = max_lock_period;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(same_asset: bool) -> StakingConfig {
        let stake_mint = Pubkey::new_unique();
        StakingConfig {
            stake_mint,
            reward_mint: if same_asset { stake_mint } else { Pubkey::new_unique() },
            min_apy: DEFAULT_MIN_APY,
            max_apy: DEFAULT_MAX_APY,
            min_lock_period: DEFAULT_MIN_LOCK_PERIOD,
            max_lock_period: DEFAULT_MAX_LOCK_PERIOD,
            total_locked: 1_000,
            total_reward_debt: 50,
            ..Default::default()
        }
    }

    #[test]
    fn reserve_counts_principal_only_for_shared_asset() {
        assert_eq!(config(false).required_reserve().unwrap(), 50);
        assert_eq!(config(true).required_reserve().unwrap(), 1_050);
        assert_eq!(config(true).required_reserve_with(10, 5).unwrap(), 1_065);
        assert_eq!(config(false).required_reserve_with(10, 5).unwrap(), 55);
    }

    #[test]
    fn held_balance_reads_the_vault_backing_rewards() {
        assert_eq!(config(true).held_reward_balance(900, None).unwrap(), 900);
        assert_eq!(config(true).held_reward_balance(900, Some(5)).unwrap(), 900);
        assert_eq!(config(false).held_reward_balance(900, Some(5)).unwrap(), 5);
        assert_eq!(
            config(false).held_reward_balance(900, None).unwrap_err(),
            StakingError::RewardVaultMissing.into()
        );
    }

    #[test]
    fn excess_floors_at_zero() {
        let cfg = config(false);
        assert_eq!(cfg.excess_reward(80).unwrap(), 30);
        assert_eq!(cfg.excess_reward(10).unwrap(), 0);
    }

    #[test]
    fn package_terms_respect_bounds() {
        let mut cfg = config(false);
        assert!(cfg.validate_package_terms(100, 10_000).is_ok());
        assert_eq!(
            cfg.validate_package_terms(100, 0).unwrap_err(),
            StakingError::InvalidApy.into()
        );
        assert_eq!(
            cfg.validate_package_terms(0, 500).unwrap_err(),
            StakingError::InvalidLockPeriod.into()
        );

        cfg.set_lock_period_bounds(3_600, 7_200).unwrap();
        assert_eq!(
            cfg.validate_package_terms(100, 500).unwrap_err(),
            StakingError::InvalidLockPeriod.into()
        );
    }

    #[test]
    fn bounds_reject_inverted_or_absolute_violations() {
        let mut cfg = config(false);
        assert!(cfg.set_apy_bounds(600, 500).is_err());
        assert!(cfg.set_apy_bounds(0, 500).is_err());
        assert!(cfg.set_apy_bounds(1, 10_001).is_err());
        assert!(cfg.set_lock_period_bounds(10, 5).is_err());
        assert!(cfg.set_lock_period_bounds(1, ABSOLUTE_MAX_LOCK_PERIOD + 1).is_err());
        assert_eq!(cfg.min_apy, DEFAULT_MIN_APY);

        cfg.set_apy_bounds(100, 2_000).unwrap();
        assert_eq!((cfg.min_apy, cfg.max_apy), (100, 2_000));
    }
}
