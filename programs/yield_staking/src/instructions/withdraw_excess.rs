//! Excess reward withdrawal.
//!
//! Lets the admin recover reward-vault surplus above the required reserve.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::ExcessRewardWithdrawn;
use crate::ledger;
use crate::state::StakingConfig;
use crate::utils::transfer_from_vault_to_user;

#[derive(Accounts)]
pub struct WithdrawExcessReward<'info> {
    #[account(
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
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = reward_mint @ StakingError::MintMismatch,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Admin's destination account for the surplus.
    #[account(
        mut,
        constraint = authority_token_account.mint == reward_mint.key() @ StakingError::MintMismatch,
        constraint = authority_token_account.owner == authority.key() @ StakingError::Unauthorized
    )]
    pub authority_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Withdraw `amount` of surplus reward to the admin.
///
/// For a shared-asset vault the reserve covers locked principal as well as
/// reward debt, so principal can never be taken as surplus.
pub fn handler(ctx: Context<WithdrawExcessReward>, amount: u64) -> Result<()> {
    let held = ctx.accounts.reward_vault.amount;
    ledger::plan_excess_withdrawal(&ctx.accounts.staking_config, held, amount)?;

    let staking_config = &ctx.accounts.staking_config;
    let stake_mint_key = staking_config.stake_mint;
    let reward_mint_key = staking_config.reward_mint;
    let bump = staking_config.bump;
    let seeds = &[
        STAKING_CONFIG_SEED,
        stake_mint_key.as_ref(),
        reward_mint_key.as_ref(),
        &[bump],
    ];
    let signer_seeds = &[&seeds[..]];

    transfer_from_vault_to_user(
        ctx.accounts.staking_config.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.authority_token_account.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
        signer_seeds,
    )?;

    let staking_config = &mut ctx.accounts.staking_config;
    staking_config.last_updated = Clock::get()?.unix_timestamp;

    msg!("Excess reward withdrawn: {}", amount);
    msg!("Required reserve: {}", staking_config.required_reserve()?);

    emit!(ExcessRewardWithdrawn {
        admin: ctx.accounts.authority.key(),
        amount,
    });

    Ok(())
}
