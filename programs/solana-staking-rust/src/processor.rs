use crate::account_structs::*;
use crate::custody;
use crate::derivation::{
    escrow_address, expect_derived, stake_info_address, vault_address, ESCROW_SEED,
    STAKE_INFO_SEED, VAULT_SEED,
};
use crate::error::*;
use crate::events::*;
use crate::guard::validate_program_update_authority;
use crate::ledger;
use crate::state::{StakeInfo, RESTAKE_POLICY, REWARD_POLICY};
use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, TransferChecked};

pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
    validate_program_update_authority(&ctx.accounts.program_data, &ctx.accounts.signer)?;

    let vault = ctx.accounts.vault_account.to_account_info();
    let bump = expect_derived(vault.key, vault_address(ctx.program_id))?;
    require!(
        custody::is_uninitialized(&vault),
        StakingError::AlreadyInitialized
    );

    let seeds: &[&[u8]] = &[VAULT_SEED, &[bump]];
    custody::create_token_account(
        &ctx.accounts.signer.to_account_info(),
        &vault,
        &ctx.accounts.mint.to_account_info(),
        seeds,
        &ctx.accounts.token_program.to_account_info(),
        &ctx.accounts.system_program.to_account_info(),
    )?;

    msg!(
        "Vault {} initialized for mint {}",
        vault.key,
        ctx.accounts.mint.key()
    );

    emit!(VaultInitialized {
        payer: ctx.accounts.signer.key(),
        mint: ctx.accounts.mint.key(),
        vault: vault.key(),
    });

    Ok(())
}

pub fn stake(ctx: Context<Stake>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::InvalidAmount);

    let owner = ctx.accounts.signer.key();
    let mint = ctx.accounts.mint.key();
    let stake_info = ctx.accounts.stake_info_account.to_account_info();
    let escrow = ctx.accounts.stake_account.to_account_info();
    let vault = ctx.accounts.vault_account.to_account_info();

    let info_bump = expect_derived(stake_info.key, stake_info_address(ctx.program_id, &owner))?;
    let escrow_bump = expect_derived(escrow.key, escrow_address(ctx.program_id, &owner))?;
    expect_derived(vault.key, vault_address(ctx.program_id))?;

    // Only the vault's mint can be paid out on destake.
    require!(
        !custody::is_uninitialized(&vault),
        StakingError::VaultNotInitialized
    );
    custody::token_account(&vault, &mint)?;

    let current = custody::load_stake_info(&stake_info)?;
    if let Some(info) = &current {
        require_keys_eq!(info.owner, owner, StakingError::InvalidAccount);
    }
    let escrow_exists = !custody::is_uninitialized(&escrow);
    let escrow_balance = if escrow_exists {
        custody::token_account(&escrow, &mint)?.amount
    } else {
        0
    };

    let now = Clock::get()?.unix_timestamp;
    let plan = ledger::plan_stake(
        current.as_ref(),
        escrow_balance,
        ctx.accounts.user_token_account.amount,
        amount,
        now,
        RESTAKE_POLICY,
    )?;

    let signer = ctx.accounts.signer.to_account_info();
    let system_program = ctx.accounts.system_program.to_account_info();
    let token_program = ctx.accounts.token_program.to_account_info();

    if current.is_none() {
        let seeds: &[&[u8]] = &[STAKE_INFO_SEED, owner.as_ref(), &[info_bump]];
        custody::create_pda_account(
            &signer,
            &stake_info,
            StakeInfo::LEN,
            ctx.program_id,
            seeds,
            &system_program,
        )?;
    }
    if !escrow_exists {
        let seeds: &[&[u8]] = &[ESCROW_SEED, owner.as_ref(), &[escrow_bump]];
        custody::create_token_account(
            &signer,
            &escrow,
            &ctx.accounts.mint.to_account_info(),
            seeds,
            &token_program,
            &system_program,
        )?;
    }

    let cpi_accounts = TransferChecked {
        from: ctx.accounts.user_token_account.to_account_info(),
        mint: ctx.accounts.mint.to_account_info(),
        to: escrow.clone(),
        authority: signer,
    };
    token::transfer_checked(
        CpiContext::new(token_program, cpi_accounts),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    custody::store_stake_info(
        &stake_info,
        &StakeInfo {
            owner,
            staked_amount: plan.staked_amount,
            stake_start: plan.stake_start,
            bump: info_bump,
        },
    )?;

    msg!(
        "Staked {} for {}, position {} since {}",
        amount,
        owner,
        plan.staked_amount,
        plan.stake_start
    );

    emit!(Staked {
        user: owner,
        amount,
        total_staked: plan.staked_amount,
        stake_start: plan.stake_start,
        mint,
    });

    Ok(())
}

pub fn destake(ctx: Context<Destake>) -> Result<()> {
    let owner = ctx.accounts.signer.key();
    let mint = ctx.accounts.mint.key();
    let stake_info = ctx.accounts.stake_info_account.to_account_info();
    let escrow = ctx.accounts.stake_account.to_account_info();
    let vault = ctx.accounts.vault_account.to_account_info();

    expect_derived(stake_info.key, stake_info_address(ctx.program_id, &owner))?;
    let escrow_bump = expect_derived(escrow.key, escrow_address(ctx.program_id, &owner))?;
    let vault_bump = expect_derived(vault.key, vault_address(ctx.program_id))?;

    let record = custody::load_stake_info(&stake_info)?.ok_or(StakingError::NoActiveStake)?;
    require_keys_eq!(record.owner, owner, StakingError::InvalidAccount);
    require!(
        !custody::is_uninitialized(&vault),
        StakingError::VaultNotInitialized
    );
    let vault_balance = custody::token_account(&vault, &mint)?.amount;
    let escrow_balance = custody::token_account(&escrow, &mint)?.amount;

    let now = Clock::get()?.unix_timestamp;
    let settlement =
        ledger::plan_destake(&record, escrow_balance, vault_balance, now, &REWARD_POLICY)?;

    let token_program = ctx.accounts.token_program.to_account_info();
    let escrow_seeds: &[&[u8]] = &[ESCROW_SEED, owner.as_ref(), &[escrow_bump]];
    let escrow_signer = &[escrow_seeds];

    let cpi_accounts = TransferChecked {
        from: escrow.clone(),
        mint: ctx.accounts.mint.to_account_info(),
        to: ctx.accounts.user_token_account.to_account_info(),
        authority: escrow.clone(),
    };
    token::transfer_checked(
        CpiContext::new_with_signer(token_program.clone(), cpi_accounts, escrow_signer),
        settlement.principal,
        ctx.accounts.mint.decimals,
    )?;

    if settlement.reward > 0 {
        let vault_seeds: &[&[u8]] = &[VAULT_SEED, &[vault_bump]];
        let vault_signer = &[vault_seeds];
        let cpi_accounts = TransferChecked {
            from: vault.clone(),
            mint: ctx.accounts.mint.to_account_info(),
            to: ctx.accounts.user_token_account.to_account_info(),
            authority: vault.clone(),
        };
        token::transfer_checked(
            CpiContext::new_with_signer(token_program.clone(), cpi_accounts, vault_signer),
            settlement.reward,
            ctx.accounts.mint.decimals,
        )?;
    }

    let signer = ctx.accounts.signer.to_account_info();
    token::close_account(CpiContext::new_with_signer(
        token_program,
        CloseAccount {
            account: escrow.clone(),
            destination: signer.clone(),
            authority: escrow,
        },
        escrow_signer,
    ))?;
    custody::close_stake_info(&stake_info, &signer)?;

    msg!(
        "Destaked {} for {}: principal {}, reward {} after {}s",
        record.staked_amount,
        owner,
        settlement.principal,
        settlement.reward,
        settlement.elapsed
    );

    emit!(Destaked {
        user: owner,
        principal: settlement.principal,
        reward: settlement.reward,
        elapsed: settlement.elapsed,
        mint,
        vault: vault.key(),
    });

    Ok(())
}

pub fn fund_vault(ctx: Context<FundVault>, amount: u64) -> Result<()> {
    require!(amount > 0, StakingError::InvalidAmount);

    let vault = ctx.accounts.vault_account.to_account_info();
    expect_derived(vault.key, vault_address(ctx.program_id))?;
    require!(
        !custody::is_uninitialized(&vault),
        StakingError::VaultNotInitialized
    );
    custody::token_account(&vault, &ctx.accounts.mint.key())?;
    require!(
        ctx.accounts.funder_token_account.amount >= amount,
        StakingError::InsufficientFunds
    );

    let cpi_accounts = TransferChecked {
        from: ctx.accounts.funder_token_account.to_account_info(),
        mint: ctx.accounts.mint.to_account_info(),
        to: vault.clone(),
        authority: ctx.accounts.signer.to_account_info(),
    };
    token::transfer_checked(
        CpiContext::new(ctx.accounts.token_program.to_account_info(), cpi_accounts),
        amount,
        ctx.accounts.mint.decimals,
    )?;

    emit!(VaultFunded {
        funder: ctx.accounts.signer.key(),
        amount,
        mint: ctx.accounts.mint.key(),
        vault: vault.key(),
    });

    Ok(())
}

pub fn pending_reward(ctx: Context<PendingReward>) -> Result<u64> {
    let owner = ctx.accounts.owner.key();
    let stake_info = ctx.accounts.stake_info_account.to_account_info();
    expect_derived(stake_info.key, stake_info_address(ctx.program_id, &owner))?;

    let record = custody::load_stake_info(&stake_info)?.ok_or(StakingError::NoActiveStake)?;
    let now = Clock::get()?.unix_timestamp;
    let (_, pending) = ledger::accrued_reward(&record, now, &REWARD_POLICY)?;

    msg!(
        "Pending reward for {}: {} on {} staked",
        owner,
        pending,
        record.staked_amount
    );
    Ok(pending)
}
