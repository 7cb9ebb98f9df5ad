//! State structures for the Yield Staking program.
//!
//! This module defines all account structures used to store program state.

pub mod package;
pub mod role_grant;
pub mod stake_counter;
pub mod stake_position;
pub mod staking_config;
pub mod user_totals;

pub use package::*;
pub use role_grant::*;
pub use stake_counter::*;
pub use stake_position::*;
pub use staking_config::*;
pub use user_totals::*;
