//! # Yield Staking Program
//!
//! A fixed-term, fixed-yield staking ledger. Users lock a stake asset into
//! one of several admin-configured packages; each package fixes a lock
//! period and an APY. The full reward for the lock period is computed when a
//! position opens and accrues linearly until unlock.
//!
//! ## Features
//! - Package registry with bounded APY and lock periods
//! - Many independent positions per owner and package, addressed by index
//! - Partial reward claims before unlock, full settlement on withdraw
//! - Solvency checks against the reward vault on every stake
//! - Pause with operator-driven emergency exit that forfeits unclaimed reward
//! - Stake and reward assets may be the same mint (one shared vault) or differ
//!
//! ## Accounts
//! - `StakingConfig`: per (stake mint, reward mint) configuration and aggregates
//! - `Package`, `StakePosition`, `UserTotals`, `StakeCounter`, `RoleGrant`

use anchor_lang::prelude::*;

declare_id!("4XUxFEzhr9BpRtrGHNgyy3KcnLb1eKZmqoypxHvqgB1J");

pub mod access;
pub mod constants;
pub mod error;
pub mod events;
pub mod instructions;
pub mod ledger;
pub mod math;
pub mod state;
pub mod utils;

use instructions::*;

#[program]
pub mod yield_staking {
    use super::*;

    /// Creates the staking config and stake vault for a mint pair.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for initialization
    /// * `min_stake_amount` - Smallest principal a position may open with
    ///
    /// # Errors
    /// Returns an error if `min_stake_amount` is zero.
    pub fn initialize(ctx: Context<Initialize>, min_stake_amount: u64) -> Result<()> {
        instructions::initialize::handler(ctx, min_stake_amount)
    }

    /// Creates the reward vault when the reward mint differs from the stake mint.
    pub fn initialize_reward_vault(ctx: Context<InitializeRewardVault>) -> Result<()> {
        instructions::initialize::initialize_reward_vault_handler(ctx)
    }

    /// Creates or overwrites a package.
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the admin
    /// - `apy` or `lock_period` is outside the configured bounds
    pub fn set_package(
        ctx: Context<SetPackage>,
        id: u8,
        lock_period: i64,
        apy: u16,
        enabled: bool,
    ) -> Result<()> {
        instructions::set_package::handler(ctx, id, lock_period, apy, enabled)
    }

    /// Opens a new position under `package_id`.
    ///
    /// # Arguments
    /// * `ctx` - The context containing all accounts needed for staking
    /// * `amount` - Principal to lock
    /// * `package_id` - Package whose terms the position snapshots
    ///
    /// # Errors
    /// Returns an error if:
    /// - The engine is paused
    /// - The package is unknown or disabled
    /// - The amount is below the minimum or exceeds the ledger width
    /// - A per-user or per-package cap would be exceeded
    /// - The vault did not receive exactly `amount`
    /// - The reward vault cannot cover the new liability
    pub fn stake(ctx: Context<Stake>, amount: u128, package_id: u8) -> Result<()> {
        instructions::stake::handler(ctx, amount, package_id)
    }

    /// Claims the reward accrued so far on one position.
    ///
    /// # Errors
    /// Returns an error if the engine is paused, the position is absent or
    /// closed, or nothing has accrued since the last claim.
    pub fn claim_rewards(ctx: Context<ClaimRewards>, package_id: u8, stake_index: u32) -> Result<()> {
        instructions::claim_rewards::handler(ctx, package_id, stake_index)
    }

    /// Closes an unlocked position, paying principal and unclaimed reward.
    ///
    /// # Errors
    /// Returns an error if the engine is paused, the position is absent or
    /// closed, or it is still locked.
    pub fn withdraw(ctx: Context<Withdraw>, package_id: u8, stake_index: u32) -> Result<()> {
        instructions::withdraw::handler(ctx, package_id, stake_index)
    }

    /// Operator-executed exit while paused. Principal goes to the owner;
    /// unclaimed reward is forfeited.
    pub fn emergency_withdraw(
        ctx: Context<EmergencyWithdraw>,
        owner: Pubkey,
        package_id: u8,
        stake_index: u32,
    ) -> Result<()> {
        instructions::emergency_withdraw::handler(ctx, owner, package_id, stake_index)
    }

    /// Deposits reward tokens into the reward vault. Permissionless.
    pub fn fund_rewards(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
        instructions::fund_rewards::handler(ctx, amount)
    }

    /// Admin withdrawal of reward-vault surplus above the required reserve.
    pub fn withdraw_excess_reward(ctx: Context<WithdrawExcessReward>, amount: u64) -> Result<()> {
        instructions::withdraw_excess::handler(ctx, amount)
    }

    /// Pauses the engine.
    pub fn pause(ctx: Context<AdminControl>) -> Result<()> {
        instructions::admin::pause_handler(ctx)
    }

    /// Resumes the engine.
    pub fn unpause(ctx: Context<AdminControl>) -> Result<()> {
        instructions::admin::unpause_handler(ctx)
    }

    pub fn set_min_stake_amount(ctx: Context<AdminControl>, amount: u64) -> Result<()> {
        instructions::admin::set_min_stake_amount_handler(ctx, amount)
    }

    /// Sets the per-owner principal cap. Zero disables the cap.
    pub fn set_max_stake_per_user(ctx: Context<AdminControl>, amount: u64) -> Result<()> {
        instructions::admin::set_max_stake_per_user_handler(ctx, amount)
    }

    /// Sets the per-package principal cap. Zero disables the cap.
    pub fn set_max_total_staked_per_package(ctx: Context<AdminControl>, amount: u64) -> Result<()> {
        instructions::admin::set_max_total_staked_per_package_handler(ctx, amount)
    }

    pub fn set_apy_bounds(ctx: Context<AdminControl>, min_apy: u16, max_apy: u16) -> Result<()> {
        instructions::admin::set_apy_bounds_handler(ctx, min_apy, max_apy)
    }

    pub fn set_lock_period_bounds(
        ctx: Context<AdminControl>,
        min_lock_period: i64,
        max_lock_period: i64,
    ) -> Result<()> {
        instructions::admin::set_lock_period_bounds_handler(ctx, min_lock_period, max_lock_period)
    }

    /// Grants a role to `member`. Only the operator role is grantable.
    pub fn grant_role(ctx: Context<GrantRole>, member: Pubkey, role: u8) -> Result<()> {
        instructions::roles::grant_role_handler(ctx, member, role)
    }

    /// Revokes a role grant and closes its account.
    pub fn revoke_role(ctx: Context<RevokeRole>) -> Result<()> {
        instructions::roles::revoke_role_handler(ctx)
    }

    /// Admin function to transfer authority to a new address.
    ///
    /// # Arguments
    /// * `ctx` - The context containing admin accounts
    /// * `new_authority` - New admin pubkey
    ///
    /// # Errors
    /// Returns an error if:
    /// - Caller is not the current admin
    /// - New authority is zero address
    pub fn transfer_authority(ctx: Context<AdminControl>, new_authority: Pubkey) -> Result<()> {
        instructions::admin::transfer_authority_handler(ctx, new_authority)
    }

    /// Returns the reward claimable now on one position, or 0 if it does
    /// not exist or is closed.
    pub fn get_claimable_rewards_for_stake(
        ctx: Context<GetClaimableRewards>,
        owner: Pubkey,
        package_id: u8,
        stake_index: u32,
    ) -> Result<u64> {
        instructions::views::get_claimable_rewards_handler(ctx, owner, package_id, stake_index)
    }

    /// Returns the ledger aggregates and solvency figures.
    pub fn get_engine_totals(ctx: Context<GetEngineTotals>) -> Result<EngineTotals> {
        instructions::views::get_engine_totals_handler(ctx)
    }
}
