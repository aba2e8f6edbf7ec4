use crate::error::StakingError;
use anchor_lang::prelude::*;

#[allow(deprecated)]
use anchor_lang::solana_program::bpf_loader_upgradeable::{self, UpgradeableLoaderState};

/// Address of the loader's ProgramData account for `program_id`.
#[allow(deprecated)]
pub fn program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}

/// Only the program's upgrade authority may create the vault, so nobody can
/// front-run the deployment with a mint of their own.
#[allow(deprecated)]
pub fn validate_program_update_authority(
    program_data_account: &UncheckedAccount,
    authority: &Signer,
) -> Result<()> {
    let program_data = program_data_account
        .try_borrow_data()
        .map_err(|_| StakingError::InvalidProgramData)?;

    let loader_state = bincode::deserialize::<UpgradeableLoaderState>(&program_data)
        .map_err(|_| StakingError::InvalidProgramData)?;

    match loader_state {
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address: Some(update_authority),
            ..
        } => {
            require_keys_eq!(
                authority.key(),
                update_authority,
                StakingError::InvalidUpgradeAuthority
            );
            Ok(())
        }
        UpgradeableLoaderState::ProgramData {
            upgrade_authority_address: None,
            ..
        } => Err(StakingError::NoUpgradeAuthority.into()),
        _ => Err(StakingError::InvalidProgramData.into()),
    }
}
