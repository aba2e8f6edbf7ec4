//! Stake ledger transitions.
//!
//! Handlers snapshot the balances they read, plan the whole transition here
//! and only then move tokens and write accounts. A planning error leaves every
//! account untouched.

use crate::error::StakingError;
use crate::reward::{reward, RewardPolicy};
use crate::state::StakeInfo;
use anchor_lang::prelude::*;

/// How a repeated `stake` treats the accrual clock of an open position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestakePolicy {
    /// Restart accrual for the whole position at the time of the new stake.
    ResetClock,
    /// Move the start time to the amount-weighted average of the old start
    /// and now, so linear accrual earned so far is kept.
    Blend,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakePlan {
    pub staked_amount: u64,
    pub stake_start: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    /// Everything held in escrow, returned to the owner.
    pub principal: u64,
    pub reward: u64,
    pub elapsed: i64,
}

pub fn plan_stake(
    current: Option<&StakeInfo>,
    escrow_balance: u64,
    wallet_balance: u64,
    amount: u64,
    now: i64,
    policy: RestakePolicy,
) -> Result<StakePlan> {
    require!(amount > 0, StakingError::InvalidAmount);
    require!(wallet_balance >= amount, StakingError::InsufficientFunds);

    let Some(info) = current else {
        return Ok(StakePlan {
            staked_amount: amount,
            stake_start: now,
        });
    };

    require!(
        escrow_balance >= info.staked_amount,
        StakingError::EscrowMismatch
    );
    let staked_amount = info
        .staked_amount
        .checked_add(amount)
        .ok_or(StakingError::MathOverflow)?;

    let stake_start = match policy {
        RestakePolicy::ResetClock => now,
        RestakePolicy::Blend => blended_start(info.stake_start, info.staked_amount, now, amount)?,
    };

    Ok(StakePlan {
        staked_amount,
        stake_start,
    })
}

pub fn plan_destake(
    info: &StakeInfo,
    escrow_balance: u64,
    vault_balance: u64,
    now: i64,
    policy: &RewardPolicy,
) -> Result<Settlement> {
    require!(info.staked_amount > 0, StakingError::NoActiveStake);
    require!(
        escrow_balance >= info.staked_amount,
        StakingError::EscrowMismatch
    );

    let (elapsed, reward) = accrued_reward(info, now, policy)?;
    require!(reward <= vault_balance, StakingError::VaultUnderfunded);

    Ok(Settlement {
        principal: escrow_balance,
        reward,
        elapsed,
    })
}

/// Seconds accrued by `info` at `now` and the reward they earn. A clock behind
/// the stake start accrues nothing.
pub fn accrued_reward(info: &StakeInfo, now: i64, policy: &RewardPolicy) -> Result<(i64, u64)> {
    let elapsed = now.saturating_sub(info.stake_start).max(0);
    Ok((elapsed, reward(info.staked_amount, elapsed, policy)?))
}

// Rounded up, so a blended position never starts earlier than it earned.
fn blended_start(old_start: i64, old_amount: u64, now: i64, amount: u64) -> Result<i64> {
    let total = old_amount as i128 + amount as i128;
    let weighted = (old_start as i128)
        .checked_mul(old_amount as i128)
        .zip((now as i128).checked_mul(amount as i128))
        .and_then(|(a, b)| a.checked_add(b))
        .ok_or(StakingError::MathOverflow)?;

    let mut start = weighted / total;
    if weighted % total > 0 {
        start += 1;
    }
    i64::try_from(start).map_err(|_| StakingError::MathOverflow.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::REWARD_POLICY;

    const T0: i64 = 1_700_000_000;
    const DAY: i64 = 24 * 60 * 60;

    fn record(staked_amount: u64, stake_start: i64) -> StakeInfo {
        StakeInfo {
            owner: Pubkey::new_unique(),
            staked_amount,
            stake_start,
            bump: 255,
        }
    }

    fn apply(info: &StakeInfo, plan: StakePlan) -> StakeInfo {
        StakeInfo {
            staked_amount: plan.staked_amount,
            stake_start: plan.stake_start,
            ..info.clone()
        }
    }

    #[test]
    fn first_stake_opens_position_now() {
        let plan = plan_stake(None, 0, 100_000_000_000, 1, T0, RestakePolicy::Blend).unwrap();
        assert_eq!(
            plan,
            StakePlan {
                staked_amount: 1,
                stake_start: T0
            }
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = plan_stake(None, 0, 10, 0, T0, RestakePolicy::Blend).unwrap_err();
        assert_eq!(err, StakingError::InvalidAmount.into());
    }

    #[test]
    fn wallet_must_cover_amount() {
        let err = plan_stake(None, 0, 9, 10, T0, RestakePolicy::Blend).unwrap_err();
        assert_eq!(err, StakingError::InsufficientFunds.into());
    }

    #[test]
    fn repeated_stakes_accumulate() {
        let wallet = 1_000;
        let first = plan_stake(None, 0, wallet, 300, T0, RestakePolicy::Blend).unwrap();
        let info = apply(&record(0, 0), first);
        let second = plan_stake(
            Some(&info),
            info.staked_amount,
            wallet - 300,
            200,
            T0 + DAY,
            RestakePolicy::Blend,
        )
        .unwrap();
        assert_eq!(second.staked_amount, 500);
    }

    #[test]
    fn reset_policy_restarts_the_clock() {
        let info = record(300, T0);
        let plan =
            plan_stake(Some(&info), 300, 1_000, 200, T0 + DAY, RestakePolicy::ResetClock).unwrap();
        assert_eq!(plan.stake_start, T0 + DAY);
    }

    #[test]
    fn blend_policy_weights_start_by_amount() {
        let info = record(300, T0);
        let plan =
            plan_stake(Some(&info), 300, 1_000, 100, T0 + 4 * DAY, RestakePolicy::Blend).unwrap();
        assert_eq!(plan.stake_start, T0 + DAY);
    }

    #[test]
    fn blend_rounds_start_up() {
        let info = record(2, T0);
        let plan = plan_stake(Some(&info), 2, 10, 1, T0 + 1, RestakePolicy::Blend).unwrap();
        assert_eq!(plan.stake_start, T0 + 1);
    }

    #[test]
    fn blend_keeps_accrued_reward() {
        let amount = 365_000_000_000;
        let info = record(amount, T0);
        let restake_at = T0 + 10 * DAY;
        let earned = reward(amount, 10 * DAY, &REWARD_POLICY).unwrap();

        let plan =
            plan_stake(Some(&info), amount, amount, amount, restake_at, RestakePolicy::Blend)
                .unwrap();
        let blended = apply(&info, plan);
        let settle = plan_destake(&blended, 2 * amount, u64::MAX, restake_at, &REWARD_POLICY)
            .unwrap();
        assert_eq!(settle.reward, earned);
    }

    #[test]
    fn short_escrow_blocks_restake() {
        let info = record(500, T0);
        let err = plan_stake(Some(&info), 499, 1_000, 1, T0, RestakePolicy::Blend).unwrap_err();
        assert_eq!(err, StakingError::EscrowMismatch.into());
    }

    #[test]
    fn restake_overflow_is_rejected() {
        let info = record(u64::MAX, T0);
        let err =
            plan_stake(Some(&info), u64::MAX, 1, 1, T0, RestakePolicy::ResetClock).unwrap_err();
        assert_eq!(err, StakingError::MathOverflow.into());
    }

    #[test]
    fn destake_returns_principal_and_reward() {
        let amount = 365_000_000_000;
        let info = record(amount, T0);
        let settle = plan_destake(&info, amount, 1_000_000_000, T0 + DAY, &REWARD_POLICY).unwrap();
        assert_eq!(
            settle,
            Settlement {
                principal: amount,
                reward: 100_000_000,
                elapsed: DAY,
            }
        );
    }

    #[test]
    fn destake_of_one_token_unit() {
        let info = record(1, T0);
        let settle = plan_destake(&info, 1, 1_000_000_000, T0 + 30, &REWARD_POLICY).unwrap();
        assert_eq!(settle.principal, 1);
        assert_eq!(settle.reward, 0);
    }

    #[test]
    fn underfunded_vault_is_surfaced() {
        let amount = 365_000_000_000;
        let info = record(amount, T0);
        let err = plan_destake(&info, amount, 99_999_999, T0 + DAY, &REWARD_POLICY).unwrap_err();
        assert_eq!(err, StakingError::VaultUnderfunded.into());
    }

    #[test]
    fn short_escrow_blocks_destake() {
        let info = record(10, T0);
        let err = plan_destake(&info, 9, u64::MAX, T0 + DAY, &REWARD_POLICY).unwrap_err();
        assert_eq!(err, StakingError::EscrowMismatch.into());
    }

    #[test]
    fn escrow_surplus_goes_back_to_owner() {
        let info = record(10, T0);
        let settle = plan_destake(&info, 15, u64::MAX, T0, &REWARD_POLICY).unwrap();
        assert_eq!(settle.principal, 15);
        assert_eq!(settle.reward, 0);
    }

    #[test]
    fn preview_matches_settlement() {
        let amount = 365_000_000_000;
        let info = record(amount, T0);
        let now = T0 + 7 * DAY + 13;
        let (elapsed, preview) = accrued_reward(&info, now, &REWARD_POLICY).unwrap();
        let settle = plan_destake(&info, amount, u64::MAX, now, &REWARD_POLICY).unwrap();
        assert_eq!(elapsed, settle.elapsed);
        assert_eq!(preview, settle.reward);
    }

    #[test]
    fn clock_behind_start_pays_no_reward() {
        let info = record(365_000_000_000, T0);
        let settle = plan_destake(&info, 365_000_000_000, 0, T0 - DAY, &REWARD_POLICY).unwrap();
        assert_eq!(settle.elapsed, 0);
        assert_eq!(settle.reward, 0);
    }
}
