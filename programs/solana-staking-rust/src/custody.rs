use crate::error::StakingError;
use crate::state::StakeInfo;
use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Allocate, Assign, CreateAccount};
use anchor_spl::token::{self, InitializeAccount3, TokenAccount};

/// True while `info` is still a bare system account without data.
pub fn is_uninitialized(info: &AccountInfo) -> bool {
    info.owner == &system_program::ID && info.data_is_empty()
}

/// Creates a program-derived account owned by `owner`.
///
/// Anyone can send lamports to a derived address before it is created, which
/// makes `create_account` fail. A pre-funded address is topped up, allocated
/// and assigned instead.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    space: usize,
    owner: &Pubkey,
    seeds: &[&[u8]],
    system_program: &AccountInfo<'info>,
) -> Result<()> {
    let required = Rent::get()?.minimum_balance(space);
    let current = target.lamports();
    let signer = &[seeds];

    if current == 0 {
        return system_program::create_account(
            CpiContext::new_with_signer(
                system_program.clone(),
                CreateAccount {
                    from: payer.clone(),
                    to: target.clone(),
                },
                signer,
            ),
            required,
            space as u64,
            owner,
        );
    }

    let top_up = required.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }
    system_program::allocate(
        CpiContext::new_with_signer(
            system_program.clone(),
            Allocate {
                account_to_allocate: target.clone(),
            },
            signer,
        ),
        space as u64,
    )?;
    system_program::assign(
        CpiContext::new_with_signer(
            system_program.clone(),
            Assign {
                account_to_assign: target.clone(),
            },
            signer,
        ),
        owner,
    )
}

/// Creates a token account at a derived address that is its own authority,
/// so only this program can sign transfers out of it.
pub fn create_token_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    mint: &AccountInfo<'info>,
    seeds: &[&[u8]],
    token_program: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
) -> Result<()> {
    create_pda_account(
        payer,
        target,
        TokenAccount::LEN,
        token_program.key,
        seeds,
        system_program,
    )?;
    token::initialize_account3(CpiContext::new(
        token_program.clone(),
        InitializeAccount3 {
            account: target.clone(),
            mint: mint.clone(),
            authority: target.clone(),
        },
    ))
}

/// Reads a token account, requiring it to hold `mint`.
pub fn token_account(info: &AccountInfo, mint: &Pubkey) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, token::ID, StakingError::InvalidAccount);
    let data = info.try_borrow_data()?;
    let account = TokenAccount::try_deserialize(&mut &data[..])?;
    require_keys_eq!(account.mint, *mint, StakingError::InvalidAccount);
    Ok(account)
}

pub fn load_stake_info(info: &AccountInfo) -> Result<Option<StakeInfo>> {
    if is_uninitialized(info) {
        return Ok(None);
    }
    require_keys_eq!(*info.owner, crate::ID, StakingError::InvalidAccount);
    let data = info.try_borrow_data()?;
    Ok(Some(StakeInfo::try_deserialize(&mut &data[..])?))
}

pub fn store_stake_info(info: &AccountInfo, record: &StakeInfo) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}

/// Closes a stake record, refunding its rent to `destination`.
pub fn close_stake_info<'info>(
    info: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
) -> Result<()> {
    let refund = info.lamports();
    let balance = destination
        .lamports()
        .checked_add(refund)
        .ok_or(StakingError::MathOverflow)?;
    **destination.try_borrow_mut_lamports()? = balance;
    **info.try_borrow_mut_lamports()? = 0;

    info.assign(&system_program::ID);
    info.resize(0)?;
    Ok(())
}
