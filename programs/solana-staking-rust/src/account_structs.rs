use crate::error::*;
use crate::guard::program_data_address;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

// Derived accounts are taken unchecked: the handlers re-derive their addresses
// and tell a missing account apart from a foreign one.

#[derive(Accounts)]
pub struct Initialize<'info> {
    /// CHECK: Vault token account at ["vault"], address re-derived and the
    /// account created by the handler
    #[account(mut)]
    pub vault_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,

    /// CHECK: This is the program data account that contains the update authority
    #[account(
        constraint = program_data.key() == program_data_address(&crate::id()) @ StakingError::InvalidProgramData
    )]
    pub program_data: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct Stake<'info> {
    /// CHECK: Stake record at ["stake_info", signer], re-derived by the handler
    #[account(mut)]
    pub stake_info_account: UncheckedAccount<'info>,

    /// CHECK: Escrow token account at ["token", signer], re-derived by the handler
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = user_token_account.mint == mint.key() @ StakingError::InvalidAccount,
        constraint = user_token_account.owner == signer.key() @ StakingError::InvalidAccount
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// CHECK: Vault token account at ["vault"], re-derived by the handler; its
    /// mint is the only mint that can be staked
    pub vault_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Destake<'info> {
    /// CHECK: Stake record at ["stake_info", signer], re-derived by the handler
    #[account(mut)]
    pub stake_info_account: UncheckedAccount<'info>,

    /// CHECK: Escrow token account at ["token", signer], re-derived by the handler
    #[account(mut)]
    pub stake_account: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = user_token_account.mint == mint.key() @ StakingError::InvalidAccount,
        constraint = user_token_account.owner == signer.key() @ StakingError::InvalidAccount
    )]
    pub user_token_account: Account<'info, TokenAccount>,

    /// CHECK: Vault token account at ["vault"], re-derived by the handler
    #[account(mut)]
    pub vault_account: UncheckedAccount<'info>,

    #[account(mut)]
    pub signer: Signer<'info>,

    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct FundVault<'info> {
    /// CHECK: Vault token account at ["vault"], re-derived by the handler
    #[account(mut)]
    pub vault_account: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = funder_token_account.mint == mint.key() @ StakingError::InvalidAccount,
        constraint = funder_token_account.owner == signer.key() @ StakingError::InvalidAccount
    )]
    pub funder_token_account: Account<'info, TokenAccount>,

    pub signer: Signer<'info>,

    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct PendingReward<'info> {
    /// CHECK: Stake record at ["stake_info", owner], re-derived by the handler
    pub stake_info_account: UncheckedAccount<'info>,

    /// CHECK: Only used as a derivation seed
    pub owner: UncheckedAccount<'info>,
}
