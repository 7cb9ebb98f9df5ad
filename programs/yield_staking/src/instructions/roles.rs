//! Role grant management.

use anchor_lang::prelude::*;

use crate::access::{is_authorized, Role};
use crate::constants::*;
use crate::error::StakingError;
use crate::events::{RoleGranted, RoleRevoked};
use crate::state::{RoleGrant, StakingConfig};

#[derive(Accounts)]
#[instruction(member: Pubkey, role: u8)]
pub struct GrantRole<'info> {
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

    #[account(
        init,
        payer = authority,
        space = RoleGrant::LEN,
        seeds = [ROLE_GRANT_SEED, staking_config.key().as_ref(), &[role], member.as_ref()],
        bump
    )]
    pub role_grant: Account<'info, RoleGrant>,

    pub system_program: Program<'info, System>,
}

pub fn grant_role_handler(ctx: Context<GrantRole>, member: Pubkey, role: u8) -> Result<()> {
    let granted = Role::from_id(role)
        .filter(|role| role.is_grantable())
        .ok_or(StakingError::InvalidRole)?;
    require!(member != Pubkey::default(), StakingError::Unauthorized);

    let role_grant = &mut ctx.accounts.role_grant;
    role_grant.config = ctx.accounts.staking_config.key();
    role_grant.member = member;
    role_grant.role = granted.id();
    role_grant.granted_at = Clock::get()?.unix_timestamp;
    role_grant.bump = ctx.bumps.role_grant;

    msg!("Granted {:?} to {}", granted, member);

    emit!(RoleGranted { member, role });

    Ok(())
}

#[derive(Accounts)]
pub struct RevokeRole<'info> {
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

    /// Closed on revoke; rent returns to the admin.
    #[account(
        mut,
        close = authority,
        seeds = [
            ROLE_GRANT_SEED,
            staking_config.key().as_ref(),
            &[role_grant.role],
            role_grant.member.as_ref()
        ],
        bump = role_grant.bump,
        constraint = role_grant.config == staking_config.key() @ StakingError::Unauthorized
    )]
    pub role_grant: Account<'info, RoleGrant>,
}

pub fn revoke_role_handler(ctx: Context<RevokeRole>) -> Result<()> {
    let member = ctx.accounts.role_grant.member;
    let role = ctx.accounts.role_grant.role;

    msg!("Revoked role {} from {}", role, member);

    emit!(RoleRevoked { member, role });

    Ok(())
}
