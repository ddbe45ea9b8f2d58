use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// How minted fee shares are split between recipients.
///
/// The three shares are expressed in basis points and must sum to exactly
/// `TOTAL_BASIS_POINTS`.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeDistribution {
    pub treasury_bps: u16,
    pub insurance_bps: u16,
    pub providers_bps: u16,
}

impl FeeDistribution {
    pub fn validate(&self) -> Result<()> {
        let sum = self.treasury_bps as u32 + self.insurance_bps as u32 + self.providers_bps as u32;
        require!(sum == TOTAL_BASIS_POINTS as u32, ErrorCode::InvalidParameter);
        Ok(())
    }
}

/// Global pool ledger: single source of truth for buffered, deposited and
/// remote capital.
///
/// Only one PoolState account exists per program instance. All three
/// capital figures are lamport-denominated. `buffered_capital` moves both
/// ways (up on deposit, down on dispatch); `deposited_capital` only grows;
/// `remote_capital` tracks `deposited_capital` 1:1 between oracle reports
/// and is overwritten by each accepted report.
#[account]
#[derive(InitSpace)]
pub struct PoolState {
    /// Current admin authority
    pub admin: Pubkey,

    /// Oracle authority allowed to submit remote-balance reports
    pub oracle: Pubkey,

    /// Treasury fee recipient (share holder key)
    pub treasury: Pubkey,

    /// Insurance fund fee recipient (share holder key)
    pub insurance: Pubkey,

    /// Withdrawal credentials stamped on every allocation record
    pub withdrawal_credentials: [u8; 32],

    /// Capital held by the pool, not yet allocated to any validator
    pub buffered_capital: u64,

    /// Nominal capital handed to validators (sum of dispatched units)
    pub deposited_capital: u64,

    /// Last reported value of the deposited capital
    pub remote_capital: u64,

    /// Capital per allocation unit
    pub deposit_unit: u64,

    /// Protocol fee on rewards, in basis points
    pub fee_bps: u16,

    /// Fee split between treasury, insurance and providers
    pub fee_distribution: FeeDistribution,

    /// Epoch of the last accepted report; None until the first report
    pub last_report_epoch: Option<u64>,

    /// Whether deposits are accepted
    pub is_active: bool,

    /// PDA bump for the pool authority
    pub authority_bump: u8,

    /// Timestamp when the pool was initialized
    pub initialized_at: i64,

    /// Timestamp of the last accepted report
    pub last_report_timestamp: i64,

    /// Number of deposits processed (lifetime)
    pub deposit_count: u64,

    /// Number of allocation units dispatched (lifetime)
    pub units_dispatched: u64,

    /// Fee shares minted across all rebases (lifetime)
    pub total_fee_shares_minted: u64,
}

impl PoolState {
    /// Value basis for share pricing: buffered plus last-reported remote
    /// capital. Before any report, remote equals deposited, so this is
    /// buffered + deposited.
    pub fn total_controlled(&self) -> u64 {
        self.buffered_capital.saturating_add(self.remote_capital)
    }

    /// (deposited, remote) pair, mirroring the on-chain stake statistics
    pub fn stake_stat(&self) -> (u64, u64) {
        (self.deposited_capital, self.remote_capital)
    }

    pub fn fee(&self) -> u16 {
        self.fee_bps
    }

    pub fn fee_distribution(&self) -> FeeDistribution {
        self.fee_distribution
    }

    /// Enforce strictly increasing report epochs. The first report accepts
    /// any epoch.
    pub fn check_epoch(&self, epoch: u64) -> Result<()> {
        if let Some(last) = self.last_report_epoch {
            require!(epoch > last, ErrorCode::InvalidParameter);
        }
        Ok(())
    }
}
