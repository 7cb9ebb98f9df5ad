//! Claim rewards instruction handler.
//!
//! Pays out the reward accrued so far on one position without closing it.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Claimed;
use crate::ledger;
use crate::state::{StakePosition, StakingConfig};
use crate::utils::transfer_from_vault_to_user;

/// Accounts required for claiming rewards.
#[derive(Accounts)]
pub struct ClaimRewards<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = reward_mint @ StakingError::MintMismatch,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    /// The position to claim from. Omitted or foreign positions fail with `NoStake`.
    #[account(mut)]
    pub stake_position: Option<Box<Account<'info, StakePosition>>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        constraint = owner_reward_token.mint == reward_mint.key() @ StakingError::MintMismatch,
        constraint = owner_reward_token.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_reward_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Claim the reward accrued on position (`package_id`, `stake_index`).
///
/// Accrual is linear over the lock period and stops at unlock; the amount
/// paid is whatever has accrued minus what was already claimed.
pub fn handler(ctx: Context<ClaimRewards>, package_id: u8, stake_index: u32) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config_key = ctx.accounts.staking_config.key();
    let owner = ctx.accounts.owner.key();

    let amount = {
        let position = ctx
            .accounts
            .stake_position
            .as_deref()
            .map(|position| &**position)
            .filter(|position| position.matches(&config_key, &owner, package_id, stake_index));
        ledger::plan_claim(&ctx.accounts.staking_config, position, now)?
    };

    let staking_config = &ctx.accounts.staking_config;
    let stake_mint_key = staking_config.stake_mint;
    let reward_mint_key = staking_config.reward_mint;
    let seeds = &[
        STAKING_CONFIG_SEED,
        stake_mint_key.as_ref(),
        reward_mint_key.as_ref(),
        &[staking_config.bump],
    ];
    let signer_seeds = &[&seeds[..]];

    transfer_from_vault_to_user(
        ctx.accounts.staking_config.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.owner_reward_token.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
        signer_seeds,
    )?;

    let position = ctx
        .accounts
        .stake_position
        .as_deref_mut()
        .ok_or(StakingError::NoStake)?;
    ledger::apply_claim(&mut ctx.accounts.staking_config, position, amount, now)?;

    msg!(
        "Claimed {} from package {} (index {})",
        amount,
        package_id,
        stake_index
    );
    msg!(
        "Claimed so far: {} of {}",
        position.reward_claimed,
        position.reward_total
    );

    emit!(Claimed {
        owner,
        package_id,
        stake_index,
        amount,
    });

    Ok(())
}
