use anchor_lang::prelude::*;

use crate::ledger::RestakePolicy;
use crate::reward::RewardPolicy;

/// Annual reward rate paid on staked principal, in basis points.
pub const REWARD_RATE_BPS: u64 = 1_000;
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const SECONDS_PER_YEAR: u64 = 365 * 24 * 60 * 60;

pub const REWARD_POLICY: RewardPolicy = RewardPolicy {
    rate_bps: REWARD_RATE_BPS,
    bps_denominator: BPS_DENOMINATOR,
    period_seconds: SECONDS_PER_YEAR,
};

#[cfg(not(feature = "restake-reset"))]
pub const RESTAKE_POLICY: RestakePolicy = RestakePolicy::Blend;
#[cfg(feature = "restake-reset")]
pub const RESTAKE_POLICY: RestakePolicy = RestakePolicy::ResetClock;

/// Per-owner stake record, stored at `["stake_info", owner]`.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct StakeInfo {
    pub owner: Pubkey,
    pub staked_amount: u64,
    pub stake_start: i64, // unix seconds
    pub bump: u8,
}

impl StakeInfo {
    pub const LEN: usize = 8 + 32 + 8 + 8 + 1;
}
