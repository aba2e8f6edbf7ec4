use anchor_lang::prelude::*;

#[event]
pub struct VaultInitialized {
    pub payer: Pubkey,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct Staked {
    pub user: Pubkey,
    pub amount: u64,
    pub total_staked: u64,
    pub stake_start: i64,
    pub mint: Pubkey,
}

#[event]
pub struct Destaked {
    pub user: Pubkey,
    pub principal: u64,
    pub reward: u64,
    pub elapsed: i64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}

#[event]
pub struct VaultFunded {
    pub funder: Pubkey,
    pub amount: u64,
    pub mint: Pubkey,
    pub vault: Pubkey,
}
