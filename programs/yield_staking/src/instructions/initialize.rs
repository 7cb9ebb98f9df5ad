/// Initialize instruction handlers.
///
/// Creates a staking config for a (stake mint, reward mint) pair and the
/// vaults it custodies.
///
/// ## Security Guarantees
/// - Vaults are PDAs with the config PDA as token authority
/// - Mints are locked into config state permanently
/// - When both mints are equal, principal and rewards share one vault

use anchor_lang::prelude::*;
use anchor_spl::token_interface::{Mint, TokenAccount, TokenInterface};

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::EngineInitialized;
use crate::state::StakingConfig;

/// Accounts required for engine initialization.
#[derive(Accounts)]
pub struct Initialize<'info> {
    /// Becomes the admin stored in config state.
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The config account to be created.
    /// SECURITY: PDA over both mints ensures one config per asset pair.
    #[account(
        init,
        payer = authority,
        space = StakingConfig::LEN,
        seeds = [STAKING_CONFIG_SEED, stake_mint.key().as_ref(), reward_mint.key().as_ref()],
        bump
    )]
    pub staking_config: Box<Account<'info, StakingConfig>>,

    /// Mint of the asset users lock.
    pub stake_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Mint of the asset rewards are paid in. May equal `stake_mint`.
    #[account(
        constraint = *reward_mint.to_account_info().owner == token_program.key() @ StakingError::MintMismatch
    )]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    /// Vault holding staked principal (and rewards, for a shared asset).
    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED, staking_config.key().as_ref(), stake_mint.key().as_ref()],
        bump,
        token::mint = stake_mint,
        token::authority = staking_config
    )]
    pub stake_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>,

    pub rent: Sysvar<'info, Rent>,
}

/// Initialize a new staking engine.
///
/// # Arguments
/// * `ctx` - Initialize accounts context
/// * `min_stake_amount` - Smallest principal a position may open with
pub fn handler(ctx: Context<Initialize>, min_stake_amount: u64) -> Result<()> {
    require!(min_stake_amount > 0, StakingError::ZeroAmount);

    let config_key = ctx.accounts.staking_config.key();
    let stake_mint = ctx.accounts.stake_mint.key();
    let reward_mint = ctx.accounts.reward_mint.key();
    let stake_vault = ctx.accounts.stake_vault.key();

    // A distinct reward asset gets its own vault via `initialize_reward_vault`.
    let reward_vault = if stake_mint == reward_mint {
        stake_vault
    } else {
        Pubkey::find_program_address(
            &[VAULT_SEED, config_key.as_ref(), reward_mint.as_ref()],
            ctx.program_id,
        )
        .0
    };

    let staking_config = &mut ctx.accounts.staking_config;
    let clock = Clock::get()?;

    staking_config.admin = ctx.accounts.authority.key();
    staking_config.stake_mint = stake_mint;
    staking_config.reward_mint = reward_mint;
    staking_config.stake_vault = stake_vault;
    staking_config.reward_vault = reward_vault;
    staking_config.paused = false;
    staking_config.min_stake_amount = min_stake_amount;
    staking_config.max_stake_per_user = 0;
    staking_config.max_total_staked_per_package = 0;
    staking_config.min_apy = DEFAULT_MIN_APY;
    staking_config.max_apy = DEFAULT_MAX_APY;
    staking_config.min_lock_period = DEFAULT_MIN_LOCK_PERIOD;
    staking_config.max_lock_period = DEFAULT_MAX_LOCK_PERIOD;
    staking_config.total_locked = 0;
    staking_config.total_reward_debt = 0;
    staking_config.last_updated = clock.unix_timestamp;
    staking_config.bump = ctx.bumps.staking_config;

    msg!("Yield staking engine initialized");
    msg!("Admin: {}", staking_config.admin);
    msg!("Stake mint: {}, reward mint: {}", stake_mint, reward_mint);
    msg!("Shared vault: {}", staking_config.same_asset());
    msg!("Minimum stake: {}", min_stake_amount);

    emit!(EngineInitialized {
        config: config_key,
        admin: staking_config.admin,
        stake_mint,
        reward_mint,
        stake_vault,
        reward_vault,
        min_stake_amount,
    });

    Ok(())
}

/// Accounts required to create the vault of a distinct reward asset.
#[derive(Accounts)]
pub struct InitializeRewardVault<'info> {
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

    #[account(address = staking_config.reward_mint @ StakingError::MintMismatch)]
    pub reward_mint: Box<InterfaceAccount<'info, Mint>>,

    #[account(
        init,
        payer = authority,
        seeds = [VAULT_SEED, staking_config.key().as_ref(), reward_mint.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = staking_config
    )]
    pub reward_vault: Box<InterfaceAccount<'info, TokenAccount>>,

    pub system_program: Program<'info, System>,

    pub token_program: Interface<'info, TokenInterface>,

    pub rent: Sysvar<'info, Rent>,
}

/// Create the reward vault for a config whose reward mint differs from its
/// stake mint.
pub fn initialize_reward_vault_handler(ctx: Context<InitializeRewardVault>) -> Result<()> {
    let staking_config = &ctx.accounts.staking_config;

    require!(!staking_config.same_asset(), StakingError::SameAssetVault);
    require_keys_eq!(
        ctx.accounts.reward_vault.key(),
        staking_config.reward_vault,
        StakingError::VaultMismatch
    );

    msg!("Reward vault created: {}", ctx.accounts.reward_vault.key());

    Ok(())
}
