//! Instruction handlers for the yield staking program.
//!
//! This module contains all instruction implementations.

pub mod admin;
pub mod claim_rewards;
pub mod emergency_withdraw;
pub mod fund_rewards;
pub mod initialize;
pub mod roles;
pub mod set_package;
pub mod stake;
pub mod views;
pub mod withdraw;
pub mod withdraw_excess;

pub use admin::*;
pub use claim_rewards::*;
pub use emergency_withdraw::*;
pub use fund_rewards::*;
pub use initialize::*;
pub use roles::*;
pub use set_package::*;
pub use stake::*;
pub use views::*;
pub use withdraw::*;
pub use withdraw_excess::*;
