/// Emergency withdraw instruction handler.
///
/// Forced exit of a position while the engine is paused.
///
/// ## Security Guarantees
/// - Only callable while paused
/// - Caller must be the admin or hold an operator grant
/// - Principal always goes to a token account owned by the position owner
/// - Unclaimed reward is forfeited and released from the reward debt

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::EmergencyWithdrawn;
use crate::ledger;
use crate::state::{Package, PositionStatus, RoleGrant, StakePosition, StakingConfig, UserTotals};
use crate::utils::transfer_from_vault_to_user;

#[derive(Accounts)]
#[instruction(owner: Pubkey)]
pub struct EmergencyWithdraw<'info> {
    /// SECURITY: Must be signer AND hold the operator capability.
    #[account(
        constraint = is_authorized(
            &staking_config,
            &staking_config.key(),
            role_grant.as_deref(),
            &operator.key(),
            Role::Operator
        ) @ StakingError::Unauthorized
    )]
    pub operator: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = stake_mint @ StakingError::MintMismatch,
        has_one = stake_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    /// Operator grant. Not needed when the admin signs.
    pub role_grant: Option<Account<'info, RoleGrant>>,

    #[account(mut)]
    pub package: Option<Account<'info, Package>>,

    #[account(mut)]
    pub user_totals: Option<Box<Account<'info, UserTotals>>>,

    #[account(mut)]
    pub stake_position: Option<Box<Account<'info, StakePosition>>>,

    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Receives the principal. Must belong to the position owner.
    #[account(
        mut,
        constraint = owner_stake_token.mint == stake_mint.key() @ StakingError::MintMismatch,
        constraint = owner_stake_token.owner == owner @ StakingError::PositionMismatch
    )]
    pub owner_stake_token: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Return the principal of `owner`'s position (`package_id`, `stake_index`)
/// while paused, forfeiting its unclaimed reward.
pub fn handler(
    ctx: Context<EmergencyWithdraw>,
    owner: Pubkey,
    package_id: u8,
    stake_index: u32,
) -> Result<()> {
    let clock = Clock::get()?;
    let now = clock.unix_timestamp;
    let config_key = ctx.accounts.staking_config.key();

    let settlement = {
        let position = ctx
            .accounts
            .stake_position
            .as_deref()
            .map(|position| &**position)
            .filter(|position| position.matches(&config_key, &owner, package_id, stake_index));
        ledger::plan_emergency_withdraw(&ctx.accounts.staking_config, position)?
    };

    let staking_config = &ctx.accounts.staking_config;
    let payout = ledger::payout_plan(staking_config, settlement.principal, 0)?;
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
        PositionStatus::EmergencyWithdrawn,
        now,
    )?;

    msg!("EMERGENCY WITHDRAW by {}", ctx.accounts.operator.key());
    msg!(
        "Owner {} package {} (index {}): principal {}, forfeited {}",
        owner,
        package_id,
        stake_index,
        settled.principal,
        settled.reward
    );

    emit!(EmergencyWithdrawn {
        owner,
        package_id,
        stake_index,
        principal: settled.principal,
        forfeited_reward: settled.reward,
        operator: ctx.accounts.operator.key(),
    });

    Ok(())
}
