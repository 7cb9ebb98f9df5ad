/// Admin instruction handlers.
///
/// Handles admin-only operations on the staking config.
///
/// ## Security Guarantees
/// - All admin functions require the signer to hold the admin role
/// - PDA validation ensures the correct config
/// - Parameter bounds checking

use anchor_lang::prelude::*;

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::{AuthorityTransferred, LimitsUpdated, Paused, Unpaused};
use crate::ledger;
use crate::state::StakingConfig;

/// Accounts required for admin operations.
///
/// ## Security Notes
/// - Authority must be signer
/// - Authority must hold the admin role on this config
/// - Config PDA validated via seeds
#[derive(Accounts)]
pub struct AdminControl<'info> {
    /// The admin authority.
    /// SECURITY: Must be signer AND pass the admin capability check.
    #[account(
        mut,
        constraint = is_authorized(
            &staking_config,
            &staking_config.key(),
            None,
            &authority.key(),
            Role::Admin
        ) @ StakingError::Unauthorized
    )]
    pub authority: Signer<'info>,

    /// The config to modify.
    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,
}

/// Pause the engine.
///
/// While paused, stake/claim/withdraw fail and only emergency withdrawal
/// is available.
pub fn pause_handler(ctx: Context<AdminControl>) -> Result<()> {
    let clock = Clock::get()?;
    ledger::apply_pause(&mut ctx.accounts.staking_config, true, clock.unix_timestamp)?;

    msg!("Staking PAUSED");
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit!(Paused {
        admin: ctx.accounts.authority.key(),
    });

    Ok(())
}

/// Resume normal operation.
pub fn unpause_handler(ctx: Context<AdminControl>) -> Result<()> {
    let clock = Clock::get()?;
    ledger::apply_pause(&mut ctx.accounts.staking_config, false, clock.unix_timestamp)?;

    msg!("Staking RESUMED");
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit!(Unpaused {
        admin: ctx.accounts.authority.key(),
    });

    Ok(())
}

/// Set the minimum principal for new positions. Must be non-zero.
pub fn set_min_stake_amount_handler(ctx: Context<AdminControl>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);

    let staking_config = &mut ctx.accounts.staking_config;
    msg!(
        "Minimum stake updated: {} -> {}",
        staking_config.min_stake_amount,
        amount
    );
    staking_config.min_stake_amount = amount;

    emit_limits(staking_config)
}

/// Set the per-owner principal cap across all packages. Zero disables it.
pub fn set_max_stake_per_user_handler(ctx: Context<AdminControl>, amount: u64) -> Result<()> {
    let staking_config = &mut ctx.accounts.staking_config;
    msg!(
        "Per-user cap updated: {} -> {}",
        staking_config.max_stake_per_user,
        amount
    );
    staking_config.max_stake_per_user = amount;

    emit_limits(staking_config)
}

/// Set the per-package principal cap. Zero disables it.
pub fn set_max_total_staked_per_package_handler(
    ctx: Context<AdminControl>,
    amount: u64,
) -> Result<()> {
    let staking_config = &mut ctx.accounts.staking_config;
    msg!(
        "Per-package cap updated: {} -> {}",
        staking_config.max_total_staked_per_package,
        amount
    );
    staking_config.max_total_staked_per_package = amount;

    emit_limits(staking_config)
}

/// Tune the APY range accepted by `set_package`.
///
/// Existing packages keep their terms even if they fall outside the new range.
pub fn set_apy_bounds_handler(ctx: Context<AdminControl>, min_apy: u16, max_apy: u16) -> Result<()> {
    let staking_config = &mut ctx.accounts.staking_config;
    staking_config.set_apy_bounds(min_apy, max_apy)?;

    msg!("APY bounds: [{}bp, {}bp]", min_apy, max_apy);

    emit_limits(staking_config)
}

/// Tune the lock-period range accepted by `set_package`.
pub fn set_lock_period_bounds_handler(
    ctx: Context<AdminControl>,
    min_lock_period: i64,
    max_lock_period: i64,
) -> Result<()> {
    let staking_config = &mut ctx.accounts.staking_config;
    staking_config.set_lock_period_bounds(min_lock_period, max_lock_period)?;

    msg!("Lock period bounds: [{}s, {}s]", min_lock_period, max_lock_period);

    emit_limits(staking_config)
}

/// Transfer admin authority to a new address.
///
/// # Security
/// - Only the current admin can call this
/// - New authority must be a valid pubkey (non-zero)
pub fn transfer_authority_handler(ctx: Context<AdminControl>, new_authority: Pubkey) -> Result<()> {
    require!(
        new_authority != Pubkey::default(),
        StakingError::Unauthorized
    );

    let staking_config = &mut ctx.accounts.staking_config;
    let clock = Clock::get()?;

    let old_authority = staking_config.admin;
    staking_config.admin = new_authority;
    staking_config.last_updated = clock.unix_timestamp;

    msg!("Authority transferred: {} -> {}", old_authority, new_authority);

    emit!(AuthorityTransferred {
        previous_admin: old_authority,
        new_admin: new_authority,
    });

    Ok(())
}

fn emit_limits(staking_config: &mut StakingConfig) -> Result<()> {
    staking_config.last_updated = Clock::get()?.unix_timestamp;

    emit!(LimitsUpdated {
        min_stake_amount: staking_config.min_stake_amount,
        max_stake_per_user: staking_config.max_stake_per_user,
        max_total_staked_per_package: staking_config.max_total_staked_per_package,
        min_apy: staking_config.min_apy,
        max_apy: staking_config.max_apy,
        min_lock_period: staking_config.min_lock_period,
        max_lock_period: staking_config.max_lock_period,
    });

    Ok(())
}
