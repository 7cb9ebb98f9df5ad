//! Package registry instruction handler.

use anchor_lang::prelude::*;

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::PackageUpdated;
use crate::ledger;
use crate::state::{Package, StakingConfig};

#[derive(Accounts)]
#[instruction(id: u8)]
pub struct SetPackage<'info> {
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

    #[account(
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    /// Created on first configuration of `id`, overwritten afterwards.
    #[account(
        init_if_needed,
        payer = authority,
        space = Package::LEN,
        seeds = [PACKAGE_SEED, staking_config.key().as_ref(), id.to_le_bytes().as_ref()],
        bump
    )]
    pub package: Account<'info, Package>,

    pub system_program: Program<'info, System>,
}

/// Create or overwrite package `id`.
///
/// Positions already opened under this package keep their snapshotted terms
/// and its running `total_staked` is preserved.
pub fn handler(
    ctx: Context<SetPackage>,
    id: u8,
    lock_period: i64,
    apy: u16,
    enabled: bool,
) -> Result<()> {
    let config_key = ctx.accounts.staking_config.key();
    let package = &mut ctx.accounts.package;

    ledger::apply_package_update(
        &ctx.accounts.staking_config,
        package,
        config_key,
        id,
        lock_period,
        apy,
        enabled,
    )?;
    package.bump = ctx.bumps.package;

    msg!(
        "Package {} set: lock={}s apy={}bp enabled={}",
        id,
        lock_period,
        apy,
        enabled
    );
    msg!("Admin: {}", ctx.accounts.authority.key());

    emit!(PackageUpdated {
        id,
        lock_period,
        apy,
        enabled,
    });

    Ok(())
}
