//! Withdraw instruction handler.
//!
//! Closes an unlocked position, returning principal plus all unclaimed reward.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Withdrawn;
use crate::ledger;
use crate::state::{Package, PositionStatus, StakePosition, StakingConfig, UserTotals};
use crate::utils::transfer_from_vault_to_user;

/// Accounts required for withdrawing a position.
///
/// The reward-side accounts are only read when the reward asset differs
/// from the stake asset.
#[derive(Accounts)]
pub struct Withdraw<'info> {
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = stake_mint @ StakingError::MintMismatch,
        has_one = stake_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    #[account(mut)]
    pub package: Option<Account<'info, Package>>,

    #[account(mut)]
    pub user_totals: Option<Box<Account<'info, UserTotals>>>,

    #[account(mut)]
    pub stake_position: Option<Box<Account<'info, StakePosition>>>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        constraint = owner_stake_token.mint == stake_mint.key() @ StakingError::MintMismatch,
        constraint = owner_stake_token.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(address = staking_config.reward_mint @ StakingError::MintMismatch)]
    pub reward_mint: Option<Box<InterfaceAccount<'info, Mint>>>,

    #[account(
        mut,
        constraint = owner_reward_token.mint == staking_config.reward_mint @ StakingError::MintMismatch,
        constraint = owner_reward_token.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_reward_token: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    #[account(
        mut,
        address = staking_config.reward_vault @ StakingError::VaultMismatch
    )]
    pub reward_vault: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Withdraw position (`package_id`, `stake_index`) once it has unlocked.
pub fn handler(ctx: Context<Withdraw>, package_id: u8, stake_index: u32) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config_key = ctx.accounts.staking_config.key();
    let owner = ctx.accounts.owner.key();

    let settlement = {
        let position = ctx
            .accounts
            .stake_position
            .as_deref()
            .map(|position| &**position)
            .filter(|position| position.matches(&config_key, &owner, package_id, stake_index));
        ledger::plan_withdraw(&ctx.accounts.staking_config, position, now)?
    };

    let staking_config = &ctx.accounts.staking_config;
    let payout = ledger::payout_plan(staking_config, settlement.principal, settlement.reward)?;
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
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.owner_stake_token.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        payout.from_stake_vault,
        ctx.accounts.stake_mint.decimals,
        signer_seeds,
    )?;

    if payout.from_reward_vault > 0 {
        let reward_mint = ctx
            .accounts
            .reward_mint
            .as_ref()
            .ok_or(StakingError::RewardVaultMissing)?;
        let reward_vault = ctx
            .accounts
            .reward_vault
            .as_ref()
            .ok_or(StakingError::RewardVaultMissing)?;
        let owner_reward_token = ctx
            .accounts
            .owner_reward_token
            .as_ref()
            .ok_or(StakingError::RewardVaultMissing)?;
        transfer_from_vault_to_user(
            ctx.accounts.staking_config.to_account_info(),
            reward_vault.to_account_info(),
            owner_reward_token.to_account_info(),
            reward_mint.to_account_info(),
            ctx.accounts.token_program.to_account_info(),
            payout.from_reward_vault,
            reward_mint.decimals,
            signer_seeds,
        )?;
    }

    let package = ctx
        .accounts
        .package
        .as_deref_mut()
        .filter(|package| package.belongs_to(&config_key, package_id))
        .ok_or(StakingError::PositionMismatch)?;
    let user_totals = ctx
        .accounts
        .user_totals
        .as_deref_mut()
        .map(|user_totals| &mut **user_totals)
        .filter(|user_totals| user_totals.belongs_to(&config_key, &owner))
        .ok_or(StakingError::PositionMismatch)?;
    let position = ctx
        .accounts
        .stake_position
        .as_deref_mut()
        .ok_or(StakingError::NoStake)?;

    let settled = ledger::apply_close(
        &mut ctx.accounts.staking_config,
        package,
        user_totals,
        position,
        PositionStatus::Withdrawn,
        now,
    )?;

    msg!(
        "Withdrew package {} (index {}): principal {}, reward {}",
        package_id,
        stake_index,
        settled.principal,
        settled.reward
    );
    msg!("Total locked: {}", ctx.accounts.staking_config.total_locked);

    emit!(Withdrawn {
        owner,
        package_id,
        stake_index,
        principal: settled.principal,
        reward: settled.reward,
    });

    Ok(())
}
