use anchor_lang::prelude::*;

/// Per-(owner, package) stake index generator.
///
/// `count` is the index the next position will receive and never decreases,
/// so indices are not reused after a position closes.
#[account]
#[derive(Default, Debug)]
pub struct StakeCounter {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub package_id: u8,
    pub count: u32,
    pub bump: u8,
}

impl StakeCounter {
    pub const LEN: usize = 8 + 32 + 32 + 1 + 4 + 1;
}
