//! Role-based capability checks.
//!
//! The admin is the key stored on the config and implicitly holds every
//! role. Other roles are held through `RoleGrant` accounts.

use anchor_lang::prelude::*;

use crate::constants::role;
use crate::state::{RoleGrant, StakingConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Admin,
    Operator,
}

impl Role {
    pub fn id(self) -> u8 {
        match self {
            Role::Admin => role::ADMIN,
            Role::Operator => role::OPERATOR,
        }
    }

    pub fn from_id(id: u8) -> Option<Role> {
        match id {
            role::ADMIN => Some(Role::Admin),
            role::OPERATOR => Some(Role::Operator),
            _ => None,
        }
    }

    /// Whether the role can be handed out through a `RoleGrant`.
    pub fn is_grantable(self) -> bool {
        matches!(self, Role::Operator)
    }
}

/// Whether `caller` may act with `required` on the config at `config_key`.
///
/// Fails closed: a missing, foreign or mismatched grant never authorizes.
pub fn is_authorized(
    config: &StakingConfig,
    config_key: &Pubkey,
    grant: Option<&RoleGrant>,
    caller: &Pubkey,
    required: Role,
) -> bool {
    if *caller == config.admin && *caller != Pubkey::default() {
        return true;
    }
    if !required.is_grantable() {
        return false;
    }
    grant.map_or(false, |grant| {
        grant.config == *config_key && grant.member == *caller && grant.role == required.id()
    })
}
