use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// One holder's share balance
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug)]
pub struct HolderBalance {
    pub holder: Pubkey,
    pub shares: u64,
}

/// Internal ledger of pool ownership shares.
///
/// Shares are the unit of proportional ownership of the pool's total
/// controlled capital; the share price is implicit and never stored.
/// Invariant: sum of all holder balances equals `total_shares`.
#[account]
#[derive(InitSpace)]
pub struct ShareLedger {
    /// Total shares outstanding
    pub total_shares: u64,

    /// Per-holder balances; a holder appears at most once
    #[max_len(MAX_HOLDERS)]
    pub balances: Vec<HolderBalance>,
}

impl ShareLedger {
    /// Mint `amount` shares to `holder`. Minting zero is a no-op and never
    /// creates a ledger entry.
    pub fn mint(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let new_total = self
            .total_shares
            .checked_add(amount)
            .ok_or(ErrorCode::MathOverflow)?;

        if let Some(entry) = self.balances.iter_mut().find(|b| b.holder == holder) {
            entry.shares = entry
                .shares
                .checked_add(amount)
                .ok_or(ErrorCode::MathOverflow)?;
        } else {
            require!(self.balances.len() < MAX_HOLDERS, ErrorCode::LedgerFull);
            self.balances.push(HolderBalance { holder, shares: amount });
        }
        self.total_shares = new_total;
        Ok(())
    }

    /// Burn `amount` shares from `holder`.
    pub fn burn(&mut self, holder: Pubkey, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let entry = self
            .balances
            .iter_mut()
            .find(|b| b.holder == holder)
            .ok_or(ErrorCode::InsufficientShares)?;
        require!(entry.shares >= amount, ErrorCode::InsufficientShares);
        entry.shares -= amount;
        // total_shares >= entry.shares by the sum invariant
        self.total_shares -= amount;
        Ok(())
    }

    pub fn balance_of(&self, holder: &Pubkey) -> u64 {
        self.balances
            .iter()
            .find(|b| b.holder == *holder)
            .map(|b| b.shares)
            .unwrap_or(0)
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}
