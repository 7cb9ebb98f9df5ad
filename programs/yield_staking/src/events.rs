use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Events: emitted for off-chain indexers that project the ledger into a read
// model. Replays are expected; consumers key on (signature, event index).
// ──────────────────────────────────────────────────────────────────────────────
//

/// Emitted once when a config and its stake vault are created.
#[event]
pub struct EngineInitialized {
    pub config: Pubkey,
    pub admin: Pubkey,
    pub stake_mint: Pubkey,
    pub reward_mint: Pubkey,
    pub stake_vault: Pubkey,
    pub reward_vault: Pubkey,
    pub min_stake_amount: u64,
}

/// Emitted on every package create or overwrite. Carries the full new terms.
#[event]
pub struct PackageUpdated {
    pub id: u8,
    pub lock_period: i64,
    pub apy: u16,
    pub enabled: bool,
}

/// Emitted when a position is opened.
///
/// `reward_total` is the snapshot, so consumers can rebuild the reward
/// schedule without re-deriving it from package terms.
#[event]
pub struct Staked {
    pub owner: Pubkey,
    pub package_id: u8,
    pub stake_index: u32,
    pub amount: u64,
    pub reward_total: u64,
    pub unlock_timestamp: i64,
}

#[event]
pub struct Claimed {
    pub owner: Pubkey,
    pub package_id: u8,
    pub stake_index: u32,
    pub amount: u64,
}

/// Normal exit after unlock: principal plus all unclaimed reward.
#[event]
pub struct Withdrawn {
    pub owner: Pubkey,
    pub package_id: u8,
    pub stake_index: u32,
    pub principal: u64,
    pub reward: u64,
}

/// Forced exit while paused: principal only, unclaimed reward forfeited.
#[event]
pub struct EmergencyWithdrawn {
    pub owner: Pubkey,
    pub package_id: u8,
    pub stake_index: u32,
    pub principal: u64,
    pub forfeited_reward: u64,
    pub operator: Pubkey,
}

#[event]
pub struct ExcessRewardWithdrawn {
    pub admin: Pubkey,
    pub amount: u64,
}

#[event]
pub struct RewardsFunded {
    pub funder: Pubkey,
    pub amount: u64,
}

#[event]
pub struct Paused {
    pub admin: Pubkey,
}

#[event]
pub struct Unpaused {
    pub admin: Pubkey,
}

/// Emitted after any stake-limit setter; carries all current limits.
#[event]
pub struct LimitsUpdated {
    pub min_stake_amount: u64,
    pub max_stake_per_user: u64,
    pub max_total_staked_per_package: u64,
    pub min_apy: u16,
    pub max_apy: u16,
    pub min_lock_period: i64,
    pub max_lock_period: i64,
}

#[event]
pub struct RoleGranted {
    pub member: Pubkey,
    pub role: u8,
}

#[event]
pub struct RoleRevoked {
    pub member: Pubkey,
    pub role: u8,
}

#[event]
pub struct AuthorityTransferred {
    pub previous_admin: Pubkey,
    pub new_admin: Pubkey,
}
