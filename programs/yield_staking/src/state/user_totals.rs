use anchor_lang::prelude::*;

#[account]
#[derive(Default, Debug)]
pub struct UserTotals {
    pub config: Pubkey,
    pub owner: Pubkey,
    /// Sum of principal over the owner's open positions, across packages.
    pub total_staked: u64,
    pub bump: u8,
}

impl UserTotals {
    pub const LEN: usize = 8 + 32 + 32 + 8 + 1;

    pub fn belongs_to(&self, config: &Pubkey, owner: &Pubkey) -> bool {
        self.config == *config && self.owner == *owner
    }
}
