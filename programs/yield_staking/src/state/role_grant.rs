use anchor_lang::prelude::*;

/// Assignment of a role to one member of a config.
///
/// The account's existence is the grant; revoking closes it.
#[account]
#[derive(Default, Debug)]
pub struct RoleGrant {
    pub config: Pubkey,
    pub member: Pubkey,
    pub role: u8,
    pub granted_at: i64,
    pub bump: u8,
}

impl RoleGrant {
    pub const LEN: usize = 8 + 32 + 32 + 1 + 8 + 1;
}
