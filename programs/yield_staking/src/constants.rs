//! Program constants for the Yield Staking program.
//!
//! This module defines all constant values used throughout the staking program,
//! including PDA seeds, time periods, and the default and absolute bounds of
//! the package registry.

/// Seed for deriving the staking config PDA
pub const STAKING_CONFIG_SEED: &[u8] = b"staking_config";

/// Seed for deriving token vault PDAs (one per mint held by a config)
pub const VAULT_SEED: &[u8] = b"vault";

/// Seed for deriving package PDAs
pub const PACKAGE_SEED: &[u8] = b"package";

/// Seed for deriving per-owner totals PDAs
pub const USER_TOTALS_SEED: &[u8] = b"user_totals";

/// Seed for deriving per-(owner, package) stake counter PDAs
pub const STAKE_COUNTER_SEED: &[u8] = b"stake_counter";

/// Seed for deriving stake position PDAs
pub const STAKE_POSITION_SEED: &[u8] = b"stake_position";

/// Seed for deriving role grant PDAs
pub const ROLE_GRANT_SEED: &[u8] = b"role_grant";

/// Number of seconds in a day
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Number of seconds in a year (365 days)
pub const SECONDS_PER_YEAR: u64 = 365 * 86_400;

/// Basis points denominator (100% = 10000 basis points)
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;

/// Lowest APY any package may ever carry (0.01%)
pub const ABSOLUTE_MIN_APY: u16 = 1;

/// Highest APY any package may ever carry (100%)
pub const ABSOLUTE_MAX_APY: u16 = 10_000;

/// Shortest lock period any package may ever carry
pub const ABSOLUTE_MIN_LOCK_PERIOD: i64 = 1;

/// Longest lock period any package may ever carry (10 years).
/// Keeps `u64 amount * apy * lock` inside u128.
pub const ABSOLUTE_MAX_LOCK_PERIOD: i64 = 10 * 365 * SECONDS_PER_DAY;

/// Default lower APY bound applied at initialization
pub const DEFAULT_MIN_APY: u16 = ABSOLUTE_MIN_APY;

/// Default upper APY bound applied at initialization
pub const DEFAULT_MAX_APY: u16 = ABSOLUTE_MAX_APY;

/// Default shortest lock period applied at initialization
pub const DEFAULT_MIN_LOCK_PERIOD: i64 = ABSOLUTE_MIN_LOCK_PERIOD;

/// Default longest lock period applied at initialization (5 years)
pub const DEFAULT_MAX_LOCK_PERIOD: i64 = 5 * 365 * SECONDS_PER_DAY;

/// Role identifiers stored in role grants
pub mod role {
    /// Full control over configuration, pause and surplus withdrawal
    pub const ADMIN: u8 = 0;
    /// May force emergency exits on behalf of position owners while paused
    pub const OPERATOR: u8 = 1;
}
