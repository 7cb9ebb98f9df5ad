//! Read-only instructions returning data through the return-data buffer.

use anchor_lang::prelude::*;
use anchor_spl::token_interface::TokenAccount;

use crate::constants::*;
use crate::error::StakingError;
use crate::state::{StakePosition, StakingConfig};

/// Ledger aggregates and the solvency figures derived from them.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EngineTotals {
    pub total_locked: u64,
    pub total_reward_debt: u64,
    pub required_reserve: u64,
    pub held_reward_balance: u64,
    pub excess: u64,
    pub paused: bool,
}

impl EngineTotals {
    pub fn from_config(config: &StakingConfig, held_reward_balance: u64) -> Result<Self> {
        Ok(Self {
            total_locked: config.total_locked,
            total_reward_debt: config.total_reward_debt,
            required_reserve: config.required_reserve()?,
            held_reward_balance,
            excess: config.excess_reward(held_reward_balance)?,
            paused: config.paused,
        })
    }
}

#[derive(Accounts)]
pub struct GetClaimableRewards<'info> {
    #[account(
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    pub stake_position: Option<Box<Account<'info, StakePosition>>>,
}

/// Claimable reward of one position now; zero when absent or closed.
pub fn get_claimable_rewards_handler(
    ctx: Context<GetClaimableRewards>,
    owner: Pubkey,
    package_id: u8,
    stake_index: u32,
) -> Result<u64> {
    let config_key = ctx.accounts.staking_config.key();
    let now = Clock::get()?.unix_timestamp;

    match ctx
        .accounts
        .stake_position
        .as_deref()
        .filter(|position| position.matches(&config_key, &owner, package_id, stake_index))
    {
        Some(position) => position.claimable_at(now),
        None => Ok(0),
    }
}

#[derive(Accounts)]
pub struct GetEngineTotals<'info> {
    #[account(
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,
}

pub fn get_engine_totals_handler(ctx: Context<GetEngineTotals>) -> Result<EngineTotals> {
    EngineTotals::from_config(&ctx.accounts.staking_config, ctx.accounts.reward_vault.amount)
}
