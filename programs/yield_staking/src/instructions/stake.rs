//! Stake instruction handler.
//!
//! Opens a new time-locked position under a package.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::Staked;
use crate::ledger;
use crate::state::{Package, StakeCounter, StakePosition, StakingConfig, UserTotals};
use crate::utils::transfer_from_user_to_vault;

/// Accounts required for staking.
#[derive(Accounts)]
#[instruction(amount: u128, package_id: u8)]
pub struct Stake<'info> {
    /// The owner of the new position.
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = stake_mint @ StakingError::MintMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    /// The target package. Omitted when `package_id` was never configured.
    #[account(mut)]
    pub package: Option<Account<'info, Package>>,

    /// Owner's principal across all packages (created on first stake).
    #[account(
        init_if_needed,
        payer = owner,
        space = UserTotals::LEN,
        seeds = [USER_TOTALS_SEED, staking_config.key().as_ref(), owner.key().as_ref()],
        bump
    )]
    pub user_totals: Box<Account<'info, UserTotals>>,

    /// Next stake index for (owner, package).
    #[account(
        init_if_needed,
        payer = owner,
        space = StakeCounter::LEN,
        seeds = [
            STAKE_COUNTER_SEED,
            staking_config.key().as_ref(),
            owner.key().as_ref(),
            package_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_counter: Box<Account<'info, StakeCounter>>,

    #[account(
        init,
        payer = owner,
        space = StakePosition::LEN,
        seeds = [
            STAKE_POSITION_SEED,
            staking_config.key().as_ref(),
            owner.key().as_ref(),
            package_id.to_le_bytes().as_ref(),
            stake_counter.count.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub stake_position: Box<Account<'info, StakePosition>>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        constraint = owner_stake_token.mint == stake_mint.key() @ StakingError::MintMismatch,
        constraint = owner_stake_token.owner == owner.key() @ StakingError::Unauthorized
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(
        mut,
        address = staking_config.stake_vault @ StakingError::VaultMismatch
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    /// Required when the reward asset differs from the stake asset.
    #[account(address = staking_config.reward_vault @ StakingError::VaultMismatch)]
    pub reward_vault: Option<Box<InterfaceAccount<'info, TokenAccount>>>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Stake `amount` into package `package_id`.
///
/// Reward for the whole lock period is fixed now from the package terms and
/// must be covered by the reward vault before the position is recorded.
pub fn handler(ctx: Context<Stake>, amount: u128, package_id: u8) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config_key = ctx.accounts.staking_config.key();
    let owner = ctx.accounts.owner.key();

    let terms = {
        let package = ctx
            .accounts
            .package
            .as_deref()
            .filter(|package| package.belongs_to(&config_key, package_id));
        ledger::plan_open(
            &ctx.accounts.staking_config,
            package,
            ctx.accounts.user_totals.total_staked,
            ctx.accounts.stake_counter.count,
            amount,
            now,
        )?
    };

    let balance_before = ctx.accounts.stake_vault.amount;
    transfer_from_user_to_vault(
        ctx.accounts.owner.to_account_info(),
        ctx.accounts.owner_stake_token.to_account_info(),
        ctx.accounts.stake_vault.to_account_info(),
        ctx.accounts.stake_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        terms.principal,
        ctx.accounts.stake_mint.decimals,
    )?;
    ctx.accounts.stake_vault.reload()?;
    ledger::ensure_received(terms.principal, balance_before, ctx.accounts.stake_vault.amount)?;

    let held_reward_balance = ctx.accounts.staking_config.held_reward_balance(
        ctx.accounts.stake_vault.amount,
        ctx.accounts.reward_vault.as_ref().map(|vault| vault.amount),
    )?;
    ledger::ensure_reward_liquidity(&ctx.accounts.staking_config, &terms, held_reward_balance)?;

    let user_totals = &mut ctx.accounts.user_totals;
    if user_totals.owner == Pubkey::default() {
        user_totals.config = config_key;
        user_totals.owner = owner;
        user_totals.bump = ctx.bumps.user_totals;
    }
    let stake_counter = &mut ctx.accounts.stake_counter;
    if stake_counter.owner == Pubkey::default() {
        stake_counter.config = config_key;
        stake_counter.owner = owner;
        stake_counter.package_id = package_id;
        stake_counter.bump = ctx.bumps.stake_counter;
    }
    ctx.accounts.stake_position.bump = ctx.bumps.stake_position;

    let package = ctx
        .accounts
        .package
        .as_deref_mut()
        .ok_or(StakingError::InvalidPackage)?;
    ledger::apply_open(
        &mut ctx.accounts.staking_config,
        package,
        &mut ctx.accounts.user_totals,
        &mut ctx.accounts.stake_counter,
        &mut ctx.accounts.stake_position,
        config_key,
        owner,
        &terms,
    )?;

    msg!(
        "Staked {} in package {} (index {})",
        terms.principal,
        package_id,
        terms.stake_index
    );
    msg!("Reward snapshot: {}", terms.reward_total);
    msg!("Unlocks at: {}", terms.unlock_timestamp);
    msg!("Total locked: {}", ctx.accounts.staking_config.total_locked);

    emit!(Staked {
        owner,
        package_id,
        stake_index: terms.stake_index,
        amount: terms.principal,
        reward_total: terms.reward_total,
        unlock_timestamp: terms.unlock_timestamp,
    });

    Ok(())
}
