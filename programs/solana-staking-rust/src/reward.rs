use crate::error::StakingError;
use anchor_lang::prelude::*;

/// Linear accrual: `rate_bps / bps_denominator` of the principal per
/// `period_seconds` staked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardPolicy {
    pub rate_bps: u64,
    pub bps_denominator: u64,
    pub period_seconds: u64,
}

/// Reward owed for `staked_amount` held for `elapsed_seconds`, rounded down.
/// Negative elapsed time (clock skew) accrues nothing.
pub fn reward(staked_amount: u64, elapsed_seconds: i64, policy: &RewardPolicy) -> Result<u64> {
    let elapsed = u128::try_from(elapsed_seconds).unwrap_or(0);
    let denominator = (policy.bps_denominator as u128)
        .checked_mul(policy.period_seconds as u128)
        .filter(|d| *d > 0)
        .ok_or(StakingError::MathOverflow)?;

    let accrued = (staked_amount as u128)
        .checked_mul(policy.rate_bps as u128)
        .and_then(|v| v.checked_mul(elapsed))
        .ok_or(StakingError::MathOverflow)?
        / denominator;

    u64::try_from(accrued).map_err(|_| StakingError::MathOverflow.into())
}
