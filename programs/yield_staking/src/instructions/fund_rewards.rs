/// Fund rewards instruction handler.
///
/// Handles depositing reward tokens into the reward vault.
///
/// ## Security Guarantees
/// - Vault must be the config's recorded reward vault
/// - Mint validation prevents wrong token deposits
/// - Anyone can fund (no admin restriction)

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::constants::*;
use crate::error::StakingError;
use crate::events::RewardsFunded;
use crate::state::StakingConfig;
use crate::utils::transfer_from_user_to_vault;

/// Accounts required for funding rewards.
#[derive(Accounts)]
pub struct FundRewards<'info> {
    /// The funder (anyone can fund - no admin restriction).
    pub funder: Signer<'info>,

    #[account(
        mut,
        seeds = [STAKING_CONFIG_SEED, staking_config.stake_mint.as_ref(), staking_config.reward_mint.as_ref()],
        bump = staking_config.bump,
        has_one = reward_mint @ StakingError::MintMismatch,
        has_one = reward_vault @ StakingError::VaultMismatch
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        mut,
        constraint = funder_token_account.mint == reward_mint.key() @ StakingError::MintMismatch,
        constraint = funder_token_account.owner == funder.key() @ StakingError::Unauthorized
    )]
    pub funder_token_account: Box<InterfaceAccount<'info, TokenAccount>>,

    #[account(mut)]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub token_program: Interface<'info, TokenInterface>,
}

/// Deposit reward tokens. The amount reported is what the vault actually
/// received.
pub fn handler(ctx: Context<FundRewards>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::ZeroAmount);

    let balance_before = ctx.accounts.reward_vault.amount;
    transfer_from_user_to_vault(
        ctx.accounts.funder.to_account_info(),
        ctx.accounts.funder_token_account.to_account_info(),
        ctx.accounts.reward_vault.to_account_info(),
        ctx.accounts.reward_mint.to_account_info(),
        ctx.accounts.token_program.to_account_info(),
        amount,
        ctx.accounts.reward_mint.decimals,
    )?;
    ctx.accounts.reward_vault.reload()?;

    let received = ctx
        .accounts
        .reward_vault
        .amount
        .checked_sub(balance_before)
        .ok_or(StakingError::TransferAmountMismatch)?;

    let staking_config = &mut ctx.accounts.staking_config;
    staking_config.last_updated = Clock::get()?.unix_timestamp;

    msg!("Reward vault funded with {} tokens", received);
    msg!("Reward vault balance: {}", ctx.accounts.reward_vault.amount);
    msg!("Outstanding reward debt: {}", staking_config.total_reward_debt);

    emit!(RewardsFunded {
        funder: ctx.accounts.funder.key(),
        amount: received,
    });

    Ok(())
}
