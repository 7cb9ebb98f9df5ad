use anchor_lang::prelude::*;

use crate::math::accrued_reward;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionStatus {
    #[default]
    Open,
    Withdrawn,
    EmergencyWithdrawn,
}

/// One owner's stake under one package.
///
/// Principal, reward and lock terms are fixed at open; only `reward_claimed`,
/// `balance` and `status` change afterwards.
#[account]
#[derive(Default, Debug)]
pub struct StakePosition {
    pub config: Pubkey,
    pub owner: Pubkey,
    pub package_id: u8,
    pub stake_index: u32,

    pub principal: u64,
    pub reward_total: u64,
    pub reward_claimed: u64,

    pub lock_period: i64,
    pub start_timestamp: i64,
    pub unlock_timestamp: i64,

    /// Equals `principal` while open, zero once closed.
    pub balance: u64,
    pub status: PositionStatus,

    pub bump: u8,
}

impl StakePosition {
    pub const LEN: usize = 8 + 32 + 32 + 1 + 4 + (8 * 3) + (8 * 3) + 8 + 1 + 1;

    pub fn is_open(&self) -> bool {
        self.balance > 0 && self.status == PositionStatus::Open
    }

    pub fn is_unlocked(&self, now: i64) -> bool {
        now >= self.unlock_timestamp
    }

    pub fn remaining_reward(&self) -> u64 {
        self.reward_total.saturating_sub(self.reward_claimed)
    }

    /// Reward that could be claimed at `now`; zero for closed positions.
    pub fn claimable_at(&self, now: i64) -> Result<u64> {
        if !self.is_open() {
            return Ok(0);
        }
        let elapsed = now.saturating_sub(self.start_timestamp);
        let earned = accrued_reward(self.reward_total, self.lock_period, elapsed)?;
        Ok(earned.saturating_sub(self.reward_claimed))
    }

    pub fn matches(&self, config: &Pubkey, owner: &Pubkey, package_id: u8, stake_index: u32) -> bool {
        self.config == *config
            && self.owner == *owner
            && self.package_id == package_id
            && self.stake_index == stake_index
    }
}
