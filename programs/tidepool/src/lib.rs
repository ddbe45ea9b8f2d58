use anchor_lang::prelude::*;
use anchor_lang::system_program::{self, Transfer};

pub mod constants;
pub mod contexts;
pub mod errors;
pub mod events;
pub mod helpers;
pub mod state;

#[cfg(test)]
mod formal_verification;

use constants::*;
use contexts::*;
use errors::ErrorCode;
use events::*;
use helpers::{dispatch, math};
use state::FeeDistribution;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod tidepool {
    use super::*;

    /// Create the pool ledger, share ledger and provider registry.
    pub fn initialize(
        ctx: Context<Initialize>,
        fee_bps: u16,
        treasury_bps: u16,
        insurance_bps: u16,
        providers_bps: u16,
    ) -> Result<()> {
        require!(fee_bps <= TOTAL_BASIS_POINTS, ErrorCode::InvalidParameter);
        let distribution = FeeDistribution {
            treasury_bps,
            insurance_bps,
            providers_bps,
        };
        distribution.validate()?;

        let clock = Clock::get()?;
        let pool = &mut ctx.accounts.pool_state;

        pool.admin = ctx.accounts.admin.key();
        pool.oracle = ctx.accounts.oracle.key();
        pool.treasury = ctx.accounts.treasury.key();
        pool.insurance = ctx.accounts.insurance.key();
        pool.withdrawal_credentials = [0u8; 32];
        pool.buffered_capital = 0;
        pool.deposited_capital = 0;
        pool.remote_capital = 0;
        pool.deposit_unit = DEPOSIT_UNIT;
        pool.fee_bps = fee_bps;
        pool.fee_distribution = distribution;
        pool.last_report_epoch = None;
        pool.is_active = true;
        pool.authority_bump = ctx.bumps.pool_authority;
        pool.initialized_at = clock.unix_timestamp;
        pool.last_report_timestamp = 0;
        pool.deposit_count = 0;
        pool.units_dispatched = 0;
        pool.total_fee_shares_minted = 0;

        ctx.accounts.share_ledger.total_shares = 0;
        ctx.accounts.share_ledger.balances = Vec::new();
        ctx.accounts.registry.providers = Vec::new();

        emit!(PoolInitialized {
            admin: pool.admin,
            oracle: pool.oracle,
            treasury: pool.treasury,
            insurance: pool.insurance,
            fee_bps,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Accept a deposit: move lamports into the pool authority, mint
    /// shares against the pre-deposit price, then run the greedy
    /// allocation loop. Returns the shares minted to the depositor.
    pub fn deposit(ctx: Context<Deposit>, amount: u64) -> Result<u64> {
        let pool = &mut ctx.accounts.pool_state;
        require!(pool.is_active, ErrorCode::PoolNotActive);
        require!(amount > 0, ErrorCode::InvalidParameter);

        let ledger = &mut ctx.accounts.share_ledger;
        let registry = &mut ctx.accounts.registry;
        let clock = Clock::get()?;

        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.depositor.to_account_info(),
                    to: ctx.accounts.pool_authority.to_account_info(),
                },
            ),
            amount,
        )?;

        // Price is computed before the deposit enters the buffer, so the
        // depositor does not buy against their own capital.
        let shares = math::shares_for_deposit(amount, ledger.total_shares, pool.total_controlled());
        ledger.mint(ctx.accounts.depositor.key(), shares)?;

        pool.buffered_capital = pool
            .buffered_capital
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;
        pool.deposit_count = pool.deposit_count.saturating_add(1);

        let records = dispatch::run_allocation(pool, registry)?;
        for record in &records {
            emit!(ValidatorAllocated {
                provider_id: record.provider_id,
                pubkey: record.pubkey,
                signature: record.signature,
                amount: record.amount,
                withdrawal_credentials: pool.withdrawal_credentials,
                timestamp: clock.unix_timestamp,
            });
        }

        #[cfg(feature = "verbose")]
        msg!(
            "deposit: amount={}, shares={}, units_dispatched={}, buffered={}",
            amount,
            shares,
            records.len(),
            pool.buffered_capital
        );

        emit!(Deposited {
            payer: ctx.accounts.depositor.key(),
            amount,
            shares_minted: shares,
            units_dispatched: records.len() as u64,
            timestamp: clock.unix_timestamp,
        });

        Ok(shares)
    }

    /// Process an oracle report of the deposited capital's remote value.
    ///
    /// A gain mints fee shares to treasury, insurance and providers; a
    /// loss is absorbed by all holders through the price formula, with no
    /// shares minted or burned.
    pub fn submit_report(ctx: Context<SubmitReport>, epoch: u64, remote_capital: u64) -> Result<()> {
        let pool = &mut ctx.accounts.pool_state;
        pool.check_epoch(epoch)?;

        let ledger = &mut ctx.accounts.share_ledger;
        let registry = &ctx.accounts.registry;
        let clock = Clock::get()?;

        let previous_remote = pool.remote_capital;
        pool.remote_capital = remote_capital;
        pool.last_report_epoch = Some(epoch);
        pool.last_report_timestamp = clock.unix_timestamp;

        let mut fee_shares_minted: u64 = 0;
        if remote_capital > previous_remote {
            let reward = remote_capital - previous_remote;
            let total_fee = math::fee_on_reward(reward, pool.fee_bps);
            let minted =
                math::fee_shares_to_mint(total_fee, ledger.total_shares, pool.total_controlled())?;

            if minted > 0 {
                let (treasury_shares, insurance_shares, provider_shares) =
                    math::split_fee_shares(minted, &pool.fee_distribution)?;

                ledger.mint(pool.treasury, treasury_shares)?;
                ledger.mint(pool.insurance, insurance_shares)?;

                let stakes = registry.active_stakes();
                if stakes.is_empty() {
                    // No provider has stake in use; the provider bucket
                    // falls back to the treasury.
                    ledger.mint(pool.treasury, provider_shares)?;
                } else {
                    for (recipient, shares) in
                        math::split_provider_shares(provider_shares, &stakes)?
                    {
                        ledger.mint(recipient, shares)?;
                    }
                }

                fee_shares_minted = minted;
                pool.total_fee_shares_minted =
                    pool.total_fee_shares_minted.saturating_add(minted);
            }
        }

        #[cfg(feature = "verbose")]
        msg!(
            "report: epoch={}, remote {} -> {}, fee_shares={}",
            epoch,
            previous_remote,
            remote_capital,
            fee_shares_minted
        );

        emit!(ReportProcessed {
            epoch,
            previous_remote,
            new_remote: remote_capital,
            fee_shares_minted,
            timestamp: clock.unix_timestamp,
        });

        Ok(())
    }

    /// Register a validator operator. Returns the assigned provider id.
    pub fn add_provider(
        ctx: Context<AdminRegistry>,
        name: String,
        provider_address: Pubkey,
        validator_limit: u64,
    ) -> Result<u64> {
        let id = ctx
            .accounts
            .registry
            .add_provider(name.clone(), provider_address, validator_limit)?;

        emit!(ProviderAdded {
            provider_id: id,
            name,
            address: provider_address,
            validator_limit,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(id)
    }

    /// Append validator credentials to a provider's queue. The submitter
    /// must be the provider's registered address.
    pub fn add_credentials(
        ctx: Context<AddCredentials>,
        provider_id: u64,
        count: u64,
        pubkeys: Vec<u8>,
        signatures: Vec<u8>,
    ) -> Result<()> {
        let registry = &mut ctx.accounts.registry;
        registry.add_credentials(
            provider_id,
            &ctx.accounts.submitter.key(),
            count,
            &pubkeys,
            &signatures,
        )?;

        let (total_keys, _) = registry.credential_counts(provider_id)?;
        emit!(CredentialsAdded {
            provider_id,
            count,
            total_keys,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Activate or deactivate a provider.
    pub fn set_provider_active(
        ctx: Context<AdminRegistry>,
        provider_id: u64,
        active: bool,
    ) -> Result<()> {
        ctx.accounts
            .registry
            .set_provider_active(provider_id, active)?;

        emit!(ProviderStatusChanged {
            provider_id,
            active,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Update the protocol fee taken from rewards.
    pub fn set_fee(ctx: Context<AdminControl>, fee_bps: u16) -> Result<()> {
        require!(fee_bps <= TOTAL_BASIS_POINTS, ErrorCode::InvalidParameter);
        ctx.accounts.pool_state.fee_bps = fee_bps;

        emit!(FeeUpdated {
            fee_bps,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Update the fee split; the three cuts must sum to 10000 bps.
    pub fn set_fee_distribution(
        ctx: Context<AdminControl>,
        treasury_bps: u16,
        insurance_bps: u16,
        providers_bps: u16,
    ) -> Result<()> {
        let distribution = FeeDistribution {
            treasury_bps,
            insurance_bps,
            providers_bps,
        };
        distribution.validate()?;
        ctx.accounts.pool_state.fee_distribution = distribution;

        emit!(FeeDistributionUpdated {
            treasury_bps,
            insurance_bps,
            providers_bps,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Set the withdrawal credentials stamped on future allocation records.
    pub fn set_withdrawal_credentials(
        ctx: Context<AdminControl>,
        withdrawal_credentials: [u8; 32],
    ) -> Result<()> {
        ctx.accounts.pool_state.withdrawal_credentials = withdrawal_credentials;

        emit!(WithdrawalCredentialsSet {
            withdrawal_credentials,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Replace the oracle authority.
    pub fn set_oracle(ctx: Context<SetOracle>) -> Result<()> {
        let pool = &mut ctx.accounts.pool_state;
        let old_oracle = pool.oracle;
        pool.oracle = ctx.accounts.new_oracle.key();

        emit!(OracleChanged {
            old_oracle,
            new_oracle: pool.oracle,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Hand the admin authority to a new key.
    pub fn transfer_admin(ctx: Context<TransferAdmin>) -> Result<()> {
        let pool = &mut ctx.accounts.pool_state;
        let old_admin = pool.admin;
        pool.admin = ctx.accounts.new_admin.key();

        emit!(AdminTransferred {
            old_admin,
            new_admin: pool.admin,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }

    /// Stop accepting deposits. Reports are still processed.
    pub fn pause(ctx: Context<AdminControl>) -> Result<()> {
        ctx.accounts.pool_state.is_active = false;
        emit!(StatusChanged {
            is_active: false,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }

    /// Resume accepting deposits.
    pub fn resume(ctx: Context<AdminControl>) -> Result<()> {
        ctx.accounts.pool_state.is_active = true;
        emit!(StatusChanged {
            is_active: true,
            timestamp: Clock::get()?.unix_timestamp,
        });
        Ok(())
    }
}
