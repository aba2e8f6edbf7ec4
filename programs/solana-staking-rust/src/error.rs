use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Account does not match its expected derivation or relationship")]
    InvalidAccount,
    #[msg("Insufficient token balance")]
    InsufficientFunds,
    #[msg("Invalid amount")]
    InvalidAmount,
    #[msg("No active stake for this owner")]
    NoActiveStake,
    #[msg("Vault already initialized")]
    AlreadyInitialized,
    #[msg("Vault balance cannot cover the reward")]
    VaultUnderfunded,
    #[msg("Vault not initialized")]
    VaultNotInitialized,
    #[msg("Escrow balance does not match the staked amount")]
    EscrowMismatch,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("ProgramData account did not match expected PDA.")]
    InvalidProgramData,
    #[msg("Program has no upgrade authority (set to None).")]
    NoUpgradeAuthority,
    #[msg("Signer is not the upgrade authority.")]
    InvalidUpgradeAuthority,
}
