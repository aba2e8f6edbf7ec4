pub mod account_structs;
/// # solana staking rust - Token Staking Ledger
///
/// ## Business Process Flow
///
/// 1. Initial Setup:
///    - The upgrade authority initializes the reward vault, once; its mint
///      becomes the only mint the program stakes
///    - The vault is a token account at the `["vault"]` PDA, its own authority
///    - Reward tokens are sent to the vault (`fund_vault` or a direct mint)
///
/// 2. Staking:
///    - User stakes an amount of the mint from their own token account
///    - Principal moves into a per-user escrow at `["token", user]`
///    - A stake record at `["stake_info", user]` keeps the amount and start time
///    - Staking again grows the position; the accrual clock follows the
///      configured re-stake policy
///
/// 3. Destaking:
///    - The reward accrued since the stake start is computed linearly
///    - Principal comes back from escrow, reward comes from the vault
///    - Escrow and stake record are closed, their rent refunded to the user
///
/// Every program-owned address is re-derived on each call and compared to the
/// accounts supplied. Each instruction plans its whole state change before the
/// first token transfer, and Solana's transaction model makes it atomic.
pub mod custody;
pub mod derivation;
pub mod error;
pub mod events;
pub mod guard;
pub mod ledger;
pub mod processor;
pub mod reward;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;

declare_id!("63uB2o4jHubS5RJUWYt8QwAp74RqzBrt4Eci3rzgL7sC");

#[program]
pub mod solana_staking_rust {
    use super::*;

    /// Creates the reward vault for `mint` at the `["vault"]` PDA:
    /// - Only the program's upgrade authority may call it
    /// - Fails with `AlreadyInitialized` when called a second time
    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        processor::initialize(ctx)
    }

    /// Locks `amount` of the signer's tokens in escrow:
    /// - Creates the stake record and escrow on the first stake
    /// - Adds to the existing position afterwards
    pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
        processor::stake(ctx, amount)
    }

    /// Settles the signer's position:
    /// - Returns the escrowed principal
    /// - Pays the accrued reward out of the vault
    /// - Closes the escrow and the stake record
    pub fn destake(ctx: Context<Destake>) -> Result<()> {
        processor::destake(ctx)
    }

    /// Moves `amount` from the signer's token account into the reward vault.
    pub fn fund_vault(ctx: Context<FundVault>, amount: u64) -> Result<()> {
        processor::fund_vault(ctx, amount)
    }

    /// Reward `owner` would receive by destaking now.
    pub fn pending_reward(ctx: Context<PendingReward>) -> Result<u64> {
        processor::pending_reward(ctx)
    }
}
