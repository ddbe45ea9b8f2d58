use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;
use crate::state::*;

// ACCOUNTS - Instruction account validation structs

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = admin,
        space = 8 + PoolState::INIT_SPACE,
        seeds = [POOL_STATE_SEED],
        bump
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(
        init,
        payer = admin,
        space = 8 + ShareLedger::INIT_SPACE,
        seeds = [SHARE_LEDGER_SEED],
        bump
    )]
    pub share_ledger: Box<Account<'info, ShareLedger>>,

    #[account(
        init,
        payer = admin,
        space = 8 + ProviderRegistry::INIT_SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Box<Account<'info, ProviderRegistry>>,

    /// CHECK: PDA that holds the pool's buffered lamports
    #[account(seeds = [POOL_AUTHORITY_SEED], bump)]
    pub pool_authority: SystemAccount<'info>,

    /// CHECK: Oracle authority, stored by key
    pub oracle: AccountInfo<'info>,

    /// CHECK: Treasury fee recipient, stored by key
    pub treasury: AccountInfo<'info>,

    /// CHECK: Insurance fund fee recipient, stored by key
    pub insurance: AccountInfo<'info>,

    #[account(mut)]
    pub admin: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Deposit<'info> {
    #[account(mut, seeds = [POOL_STATE_SEED], bump)]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(mut, seeds = [SHARE_LEDGER_SEED], bump)]
    pub share_ledger: Box<Account<'info, ShareLedger>>,

    #[account(mut, seeds = [REGISTRY_SEED], bump)]
    pub registry: Box<Account<'info, ProviderRegistry>>,

    /// CHECK: PDA that receives the deposited lamports
    #[account(mut, seeds = [POOL_AUTHORITY_SEED], bump = pool_state.authority_bump)]
    pub pool_authority: SystemAccount<'info>,

    #[account(mut)]
    pub depositor: Signer<'info>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct SubmitReport<'info> {
    #[account(mut, seeds = [POOL_STATE_SEED], bump)]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(mut, seeds = [SHARE_LEDGER_SEED], bump)]
    pub share_ledger: Box<Account<'info, ShareLedger>>,

    #[account(seeds = [REGISTRY_SEED], bump)]
    pub registry: Box<Account<'info, ProviderRegistry>>,

    #[account(constraint = oracle.key() == pool_state.oracle @ ErrorCode::UnauthorizedAccess)]
    pub oracle: Signer<'info>,
}

#[derive(Accounts)]
pub struct AdminControl<'info> {
    #[account(
        mut,
        seeds = [POOL_STATE_SEED],
        bump,
        constraint = admin.key() == pool_state.admin @ ErrorCode::UnauthorizedAccess
    )]
    pub pool_state: Box<Account<'info, PoolState>>,
    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct AdminRegistry<'info> {
    #[account(
        seeds = [POOL_STATE_SEED],
        bump,
        constraint = admin.key() == pool_state.admin @ ErrorCode::UnauthorizedAccess
    )]
    pub pool_state: Box<Account<'info, PoolState>>,

    #[account(mut, seeds = [REGISTRY_SEED], bump)]
    pub registry: Box<Account<'info, ProviderRegistry>>,

    pub admin: Signer<'info>,
}

#[derive(Accounts)]
pub struct AddCredentials<'info> {
    #[account(mut, seeds = [REGISTRY_SEED], bump)]
    pub registry: Box<Account<'info, ProviderRegistry>>,

    /// Must match the provider's registered address; checked in the handler
    pub submitter: Signer<'info>,
}

#[derive(Accounts)]
pub struct SetOracle<'info> {
    #[account(
        mut,
        seeds = [POOL_STATE_SEED],
        bump,
        constraint = admin.key() == pool_state.admin @ ErrorCode::UnauthorizedAccess
    )]
    pub pool_state: Box<Account<'info, PoolState>>,
    pub admin: Signer<'info>,
    /// CHECK: New oracle authority, stored by key
    pub new_oracle: AccountInfo<'info>,
}

#[derive(Accounts)]
pub struct TransferAdmin<'info> {
    #[account(
        mut,
        seeds = [POOL_STATE_SEED],
        bump,
        constraint = admin.key() == pool_state.admin @ ErrorCode::UnauthorizedAccess
    )]
    pub pool_state: Box<Account<'info, PoolState>>,
    pub admin: Signer<'info>,
    /// CHECK: New admin authority, stored by key
    pub new_admin: AccountInfo<'info>,
}
