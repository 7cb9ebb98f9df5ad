//! In-memory engine driving the ledger the way the instruction handlers do.
//!
//! Accounts live in maps keyed like their PDAs and token vaults are plain
//! balances. Every operation runs against a draft copy that is committed only
//! on success, matching instruction atomicity.

#![allow(dead_code)]

use std::collections::BTreeMap;

use anchor_lang::prelude::*;
use yield_staking::access::{is_authorized, Role};
use yield_staking::constants::*;
use yield_staking::error::StakingError;
use yield_staking::instructions::EngineTotals;
use yield_staking::ledger::{self, Payout, Settlement};
use yield_staking::state::{
    Package, PositionStatus, RoleGrant, StakeCounter, StakePosition, StakingConfig, UserTotals,
};

pub const T0: i64 = 1_700_000_000;

pub type PositionKey = (Pubkey, u8, u32);

pub fn err(error: StakingError) -> anchor_lang::error::Error {
    error.into()
}

#[derive(Clone)]
pub struct Engine {
    pub config_key: Pubkey,
    pub config: StakingConfig,
    pub packages: BTreeMap<u8, Package>,
    pub users: BTreeMap<Pubkey, UserTotals>,
    pub counters: BTreeMap<(Pubkey, u8), StakeCounter>,
    pub positions: BTreeMap<PositionKey, StakePosition>,
    pub grants: BTreeMap<Pubkey, RoleGrant>,
    pub stake_vault: u64,
    /// Unused when both assets are the same mint.
    pub reward_vault: u64,
    /// Withheld by the token program on every inbound transfer.
    pub transfer_fee: u64,
    pub rewards_paid: BTreeMap<PositionKey, u64>,
}

impl Engine {
    pub fn new(same_asset: bool, min_stake_amount: u64) -> Self {
        let stake_mint = Pubkey::new_unique();
        let reward_mint = if same_asset {
            stake_mint
        } else {
            Pubkey::new_unique()
        };
        let config = StakingConfig {
            admin: Pubkey::new_unique(),
            stake_mint,
            reward_mint,
            min_stake_amount,
            min_apy: DEFAULT_MIN_APY,
            max_apy: DEFAULT_MAX_APY,
            min_lock_period: DEFAULT_MIN_LOCK_PERIOD,
            max_lock_period: DEFAULT_MAX_LOCK_PERIOD,
            last_updated: T0,
            ..Default::default()
        };
        Self {
            config_key: Pubkey::new_unique(),
            config,
            packages: BTreeMap::new(),
            users: BTreeMap::new(),
            counters: BTreeMap::new(),
            positions: BTreeMap::new(),
            grants: BTreeMap::new(),
            stake_vault: 0,
            reward_vault: 0,
            transfer_fee: 0,
            rewards_paid: BTreeMap::new(),
        }
    }

    pub fn admin(&self) -> Pubkey {
        self.config.admin
    }

    fn atomic<T>(&mut self, op: impl FnOnce(&mut Engine) -> Result<T>) -> Result<T> {
        let mut draft = self.clone();
        let out = op(&mut draft)?;
        *self = draft;
        Ok(out)
    }

    fn require_admin(&self, caller: &Pubkey) -> Result<()> {
        require!(
            is_authorized(&self.config, &self.config_key, None, caller, Role::Admin),
            StakingError::Unauthorized
        );
        Ok(())
    }

    pub fn held_reward_balance(&self) -> Result<u64> {
        self.config
            .held_reward_balance(self.stake_vault, Some(self.reward_vault))
    }

    fn pay(&mut self, principal: u64, reward: u64) -> Result<()> {
        let Payout {
            from_stake_vault,
            from_reward_vault,
        } = ledger::payout_plan(&self.config, principal, reward)?;
        self.stake_vault = self
            .stake_vault
            .checked_sub(from_stake_vault)
            .ok_or(StakingError::InsufficientRewardLiquidity)?;
        self.reward_vault = self
            .reward_vault
            .checked_sub(from_reward_vault)
            .ok_or(StakingError::InsufficientRewardLiquidity)?;
        Ok(())
    }

    pub fn set_package(
        &mut self,
        caller: Pubkey,
        id: u8,
        lock_period: i64,
        apy: u16,
        enabled: bool,
    ) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            let config_key = e.config_key;
            let package = e.packages.entry(id).or_default();
            ledger::apply_package_update(&e.config, package, config_key, id, lock_period, apy, enabled)
        })
    }

    pub fn fund(&mut self, amount: u64) {
        let received = amount - self.transfer_fee.min(amount);
        if self.config.same_asset() {
            self.stake_vault += received;
        } else {
            self.reward_vault += received;
        }
    }

    pub fn stake(&mut self, owner: Pubkey, amount: u128, package_id: u8, now: i64) -> Result<u32> {
        self.atomic(|e| {
            let user_total = e.users.get(&owner).map_or(0, |user| user.total_staked);
            let count = e
                .counters
                .get(&(owner, package_id))
                .map_or(0, |counter| counter.count);
            let terms = ledger::plan_open(
                &e.config,
                e.packages
                    .get(&package_id)
                    .filter(|package| package.belongs_to(&e.config_key, package_id)),
                user_total,
                count,
                amount,
                now,
            )?;

            let before = e.stake_vault;
            e.stake_vault = before + (terms.principal - e.transfer_fee.min(terms.principal));
            ledger::ensure_received(terms.principal, before, e.stake_vault)?;
            let held = e.held_reward_balance()?;
            ledger::ensure_reward_liquidity(&e.config, &terms, held)?;

            let config_key = e.config_key;
            let package = e
                .packages
                .get_mut(&package_id)
                .ok_or(StakingError::InvalidPackage)?;
            let user = e.users.entry(owner).or_insert_with(|| UserTotals {
                config: config_key,
                owner,
                ..Default::default()
            });
            let counter = e
                .counters
                .entry((owner, package_id))
                .or_insert_with(|| StakeCounter {
                    config: config_key,
                    owner,
                    package_id,
                    ..Default::default()
                });
            let mut position = StakePosition::default();
            ledger::apply_open(
                &mut e.config,
                package,
                user,
                counter,
                &mut position,
                config_key,
                owner,
                &terms,
            )?;
            e.positions.insert((owner, package_id, terms.stake_index), position);
            Ok(terms.stake_index)
        })
    }

    pub fn claim(&mut self, owner: Pubkey, package_id: u8, stake_index: u32, now: i64) -> Result<u64> {
        self.atomic(|e| {
            let key = (owner, package_id, stake_index);
            let amount = ledger::plan_claim(&e.config, e.positions.get(&key), now)?;
            e.pay(0, amount)?;
            let position = e.positions.get_mut(&key).ok_or(StakingError::NoStake)?;
            ledger::apply_claim(&mut e.config, position, amount, now)?;
            *e.rewards_paid.entry(key).or_default() += amount;
            Ok(amount)
        })
    }

    pub fn withdraw(
        &mut self,
        owner: Pubkey,
        package_id: u8,
        stake_index: u32,
        now: i64,
    ) -> Result<Settlement> {
        self.atomic(|e| {
            let key = (owner, package_id, stake_index);
            let planned = ledger::plan_withdraw(&e.config, e.positions.get(&key), now)?;
            e.pay(planned.principal, planned.reward)?;
            let settled = e.close(key, PositionStatus::Withdrawn, now)?;
            *e.rewards_paid.entry(key).or_default() += settled.reward;
            Ok(settled)
        })
    }

    pub fn emergency_withdraw(
        &mut self,
        operator: Pubkey,
        owner: Pubkey,
        package_id: u8,
        stake_index: u32,
        now: i64,
    ) -> Result<Settlement> {
        self.atomic(|e| {
            require!(
                is_authorized(
                    &e.config,
                    &e.config_key,
                    e.grants.get(&operator),
                    &operator,
                    Role::Operator
                ),
                StakingError::Unauthorized
            );
            let key = (owner, package_id, stake_index);
            let planned = ledger::plan_emergency_withdraw(&e.config, e.positions.get(&key))?;
            e.pay(planned.principal, 0)?;
            e.close(key, PositionStatus::EmergencyWithdrawn, now)
        })
    }

    fn close(&mut self, key: PositionKey, status: PositionStatus, now: i64) -> Result<Settlement> {
        let (owner, package_id, _) = key;
        let config_key = self.config_key;
        let package = self
            .packages
            .get_mut(&package_id)
            .filter(|package| package.belongs_to(&config_key, package_id))
            .ok_or(StakingError::PositionMismatch)?;
        let user = self
            .users
            .get_mut(&owner)
            .filter(|user| user.belongs_to(&config_key, &owner))
            .ok_or(StakingError::PositionMismatch)?;
        let position = self.positions.get_mut(&key).ok_or(StakingError::NoStake)?;
        ledger::apply_close(&mut self.config, package, user, position, status, now)
    }

    pub fn withdraw_excess_reward(&mut self, caller: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            let held = e.held_reward_balance()?;
            ledger::plan_excess_withdrawal(&e.config, held, amount)?;
            e.pay(0, amount)
        })
    }

    pub fn pause(&mut self, caller: Pubkey, now: i64) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            ledger::apply_pause(&mut e.config, true, now)
        })
    }

    pub fn unpause(&mut self, caller: Pubkey, now: i64) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            ledger::apply_pause(&mut e.config, false, now)
        })
    }

    pub fn set_min_stake_amount(&mut self, caller: Pubkey, amount: u64) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            require!(amount > 0, StakingError::ZeroAmount);
            e.config.min_stake_amount = amount;
            Ok(())
        })
    }

    pub fn grant_role(&mut self, caller: Pubkey, member: Pubkey, role: u8) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            let granted = Role::from_id(role)
                .filter(|role| role.is_grantable())
                .ok_or(StakingError::InvalidRole)?;
            require!(member != Pubkey::default(), StakingError::Unauthorized);
            let grant = RoleGrant {
                config: e.config_key,
                member,
                role: granted.id(),
                granted_at: T0,
                bump: 0,
            };
            e.grants.insert(member, grant);
            Ok(())
        })
    }

    pub fn revoke_role(&mut self, caller: Pubkey, member: Pubkey) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            e.grants.remove(&member).ok_or(StakingError::InvalidRole)?;
            Ok(())
        })
    }

    pub fn transfer_authority(&mut self, caller: Pubkey, new_admin: Pubkey) -> Result<()> {
        self.atomic(|e| {
            e.require_admin(&caller)?;
            require!(new_admin != Pubkey::default(), StakingError::Unauthorized);
            e.config.admin = new_admin;
            Ok(())
        })
    }

    pub fn claimable(&self, owner: Pubkey, package_id: u8, stake_index: u32, now: i64) -> u64 {
        self.positions
            .get(&(owner, package_id, stake_index))
            .map_or(Ok(0), |position| position.claimable_at(now))
            .unwrap_or(0)
    }

    pub fn totals(&self) -> EngineTotals {
        EngineTotals::from_config(&self.config, self.held_reward_balance().unwrap()).unwrap()
    }

    pub fn position(&self, owner: Pubkey, package_id: u8, stake_index: u32) -> &StakePosition {
        &self.positions[&(owner, package_id, stake_index)]
    }

    /// Panics unless every stored aggregate equals its value re-derived
    /// from the position set.
    pub fn assert_aggregates_consistent(&self) {
        let open: Vec<&StakePosition> = self.positions.values().filter(|p| p.is_open()).collect();

        let locked: u64 = open.iter().map(|p| p.principal).sum();
        let debt: u64 = open.iter().map(|p| p.remaining_reward()).sum();
        assert_eq!(self.config.total_locked, locked, "total_locked");
        assert_eq!(self.config.total_reward_debt, debt, "total_reward_debt");

        for (owner, user) in &self.users {
            let staked: u64 = open.iter().filter(|p| p.owner == *owner).map(|p| p.principal).sum();
            assert_eq!(user.total_staked, staked, "user total for {owner}");
        }
        for (id, package) in &self.packages {
            let staked: u64 = open.iter().filter(|p| p.package_id == *id).map(|p| p.principal).sum();
            assert_eq!(package.total_staked, staked, "package total for {id}");
        }
        for position in self.positions.values().filter(|p| !p.is_open()) {
            assert_eq!(position.balance, 0);
        }
    }

    /// Panics if the held balance does not cover the required reserve.
    pub fn assert_solvent(&self) {
        let totals = self.totals();
        assert!(
            totals.held_reward_balance >= totals.required_reserve,
            "held {} < required {}",
            totals.held_reward_balance,
            totals.required_reserve
        );
        if !self.config.same_asset() {
            assert!(self.stake_vault >= self.config.total_locked);
        }
    }
}
