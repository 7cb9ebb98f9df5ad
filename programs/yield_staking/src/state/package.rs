use anchor_lang::prelude::*;

/// An admin-defined reward tier.
///
/// Terms here only apply to positions opened after the latest update; every
/// position carries its own snapshot.
#[account]
#[derive(Default, Debug)]
pub struct Package {
    pub config: Pubkey,
    pub id: u8,

    pub lock_period: i64,
    pub apy: u16,
    pub enabled: bool,

    /// Sum of principal over open positions in this package.
    pub total_staked: u64,

    pub bump: u8,
}

impl Package {
    pub const LEN: usize = 8 + 32 + 1 + 8 + 2 + 1 + 8 + 1;

    pub fn accepts_stakes(&self) -> bool {
        self.enabled
    }

    pub fn belongs_to(&self, config: &Pubkey, id: u8) -> bool {
        self.config == *config && self.id == id
    }
}
