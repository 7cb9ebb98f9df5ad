//! Error types for the Yield Staking program.
//!
//! This module defines all custom error codes that can be returned by the program.
//! Each error has a unique code and descriptive message.

use anchor_lang::prelude::*;

/// Custom error codes for the Yield Staking program.
///
/// Error codes start at 6000 (Anchor's custom error offset).
#[error_code]
pub enum StakingError {
    // ========== Lifecycle Errors ==========

    /// [6000] The engine is paused; only emergency withdrawals are allowed.
    #[msg("Staking engine is paused")]
    EnginePaused,

    /// [6001] Emergency withdrawal requires the engine to be paused.
    #[msg("Staking engine is not paused")]
    NotPaused,

    /// [6002] Pause requested while already paused.
    #[msg("Staking engine is already paused")]
    AlreadyPaused,

    // ========== Stake Admission Errors ==========

    /// [6003] Package was never configured or is disabled.
    #[msg("Invalid package: not configured or disabled")]
    InvalidPackage,

    /// [6004] Stake amount is below the engine-wide minimum.
    #[msg("Stake amount is below the minimum")]
    BelowMinimum,

    /// [6005] Stake amount does not fit the ledger's 64-bit amount width.
    #[msg("Stake amount too large")]
    AmountTooLarge,

    /// [6006] Stake would push the owner's total above the per-user cap.
    #[msg("Per-user stake cap exceeded")]
    UserCapExceeded,

    /// [6007] Stake would push the package total above the per-package cap.
    #[msg("Per-package stake cap exceeded")]
    PackageCapExceeded,

    /// [6008] The owner's stake index space for this package is exhausted.
    #[msg("Stake id overflow")]
    StakeIdOverflow,

    /// [6009] The vault received a different amount than declared.
    #[msg("Received token amount differs from declared amount")]
    TransferAmountMismatch,

    /// [6010] Amount must be greater than zero.
    #[msg("Amount must be greater than zero")]
    ZeroAmount,

    // ========== Position Errors ==========

    /// [6011] Position does not exist or has already been closed.
    #[msg("No stake")]
    NoStake,

    /// [6012] No reward has accrued since the last claim.
    #[msg("Nothing to claim")]
    NothingToClaim,

    /// [6013] The position's lock period has not ended.
    #[msg("Stake is still locked")]
    StakeLocked,

    // ========== Solvency Errors ==========

    /// [6014] The reward vault cannot cover outstanding reward liabilities.
    #[msg("Insufficient reward liquidity")]
    InsufficientRewardLiquidity,

    /// [6015] Requested surplus withdrawal exceeds the available excess.
    #[msg("Amount exceeds excess reward balance")]
    ExceedsExcess,

    // ========== Registry/Configuration Errors ==========

    /// [6016] APY outside the configured bounds.
    #[msg("APY outside configured bounds")]
    InvalidApy,

    /// [6017] Lock period outside the configured bounds.
    #[msg("Lock period outside configured bounds")]
    InvalidLockPeriod,

    /// [6018] Bounds are inverted or exceed the absolute limits.
    #[msg("Invalid bounds: min must not exceed max and both must be within absolute limits")]
    InvalidBounds,

    // ========== Math/Overflow Errors ==========

    /// [6019] Arithmetic overflow occurred during calculation.
    #[msg("Arithmetic overflow occurred during calculation")]
    MathOverflow,

    /// [6020] Clock reported a time before the position started.
    #[msg("Invalid timestamp detected")]
    InvalidTimestamp,

    // ========== Authorization Errors ==========

    /// [6021] Caller lacks the role required for this instruction.
    #[msg("Unauthorized: caller lacks the required role")]
    Unauthorized,

    /// [6022] Role identifier is not known.
    #[msg("Unknown role")]
    InvalidRole,

    // ========== Account Validation Errors ==========

    /// [6023] The provided mint does not match the config.
    #[msg("Token mint mismatch - wrong token for this engine")]
    MintMismatch,

    /// [6024] The provided vault does not match the config.
    #[msg("Vault address mismatch")]
    VaultMismatch,

    /// [6025] Separate reward vault required but not supplied or not created.
    #[msg("Reward vault missing")]
    RewardVaultMissing,

    /// [6026] Stake and reward assets are identical; they share one vault.
    #[msg("Stake and reward assets share a single vault")]
    SameAssetVault,

    /// [6027] Stake position does not belong to the given owner or package.
    #[msg("Stake position does not match owner or package")]
    PositionMismatch,
}
