//! Program-derived addresses for the vault and the per-owner accounts.
//!
//! Every handler re-derives the addresses it touches and compares them with
//! the accounts the caller supplied; nothing is looked up or cached.

use crate::error::StakingError;
use anchor_lang::prelude::*;

pub const VAULT_SEED: &[u8] = b"vault";
pub const STAKE_INFO_SEED: &[u8] = b"stake_info";
pub const ESCROW_SEED: &[u8] = b"token";

pub fn vault_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[VAULT_SEED], program_id)
}

pub fn stake_info_address(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[STAKE_INFO_SEED, owner.as_ref()], program_id)
}

pub fn escrow_address(program_id: &Pubkey, owner: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED, owner.as_ref()], program_id)
}

/// Returns the bump of `expected` when `supplied` is that address.
pub fn expect_derived(supplied: &Pubkey, expected: (Pubkey, u8)) -> Result<u8> {
    let (address, bump) = expected;
    require_keys_eq!(*supplied, address, StakingError::InvalidAccount);
    Ok(bump)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivations_are_deterministic() {
        let owner = Pubkey::new_unique();
        assert_eq!(
            stake_info_address(&crate::ID, &owner),
            stake_info_address(&crate::ID, &owner)
        );
        assert_eq!(vault_address(&crate::ID), vault_address(&crate::ID));
    }

    #[test]
    fn stake_info_and_escrow_never_collide() {
        let owner = Pubkey::new_unique();
        let (info, _) = stake_info_address(&crate::ID, &owner);
        let (escrow, _) = escrow_address(&crate::ID, &owner);
        let (vault, _) = vault_address(&crate::ID);
        assert_ne!(info, escrow);
        assert_ne!(info, vault);
        assert_ne!(escrow, vault);
    }

    #[test]
    fn owners_get_distinct_accounts() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        assert_ne!(
            stake_info_address(&crate::ID, &alice).0,
            stake_info_address(&crate::ID, &bob).0
        );
        assert_ne!(
            escrow_address(&crate::ID, &alice).0,
            escrow_address(&crate::ID, &bob).0
        );
    }

    #[test]
    fn derived_addresses_are_off_curve() {
        let owner = Pubkey::new_unique();
        assert!(!vault_address(&crate::ID).0.is_on_curve());
        assert!(!stake_info_address(&crate::ID, &owner).0.is_on_curve());
        assert!(!escrow_address(&crate::ID, &owner).0.is_on_curve());
    }

    #[test]
    fn expect_derived_returns_bump_on_match() {
        let owner = Pubkey::new_unique();
        let expected = escrow_address(&crate::ID, &owner);
        assert_eq!(expect_derived(&expected.0, expected).unwrap(), expected.1);
    }

    #[test]
    fn expect_derived_rejects_foreign_address() {
        let owner = Pubkey::new_unique();
        let expected = stake_info_address(&crate::ID, &owner);
        let err = expect_derived(&Pubkey::new_unique(), expected).unwrap_err();
        assert_eq!(err, StakingError::InvalidAccount.into());
    }
}
