use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::state::{PoolState, ProviderRegistry};

/// One dispatched allocation unit, emitted for the external
/// validator-registration collaborator.
#[derive(Clone, Copy, Debug)]
pub struct AllocationRecord {
    pub provider_id: u64,
    pub pubkey: [u8; 48],
    pub signature: [u8; 96],
    pub amount: u64,
}

/// Greedy best-effort dispatch: convert buffered capital into whole
/// allocation units while both a full unit and an eligible credential are
/// available. Remaining buffered capital below one unit, or capital with
/// no credential to back it, stays buffered; a later deposit re-triggers
/// the loop. Remote capital tracks deposited 1:1 until the next report.
pub fn run_allocation(
    pool: &mut PoolState,
    registry: &mut ProviderRegistry,
) -> Result<Vec<AllocationRecord>> {
    let unit = pool.deposit_unit;
    let mut records = Vec::new();

    while pool.buffered_capital >= unit {
        let Some((provider_idx, key_idx)) = registry.next_available() else {
            break;
        };
        let credential = registry.mark_used(provider_idx, key_idx)?;
        let provider_id = registry.providers[provider_idx].id;

        pool.buffered_capital -= unit;
        pool.deposited_capital = pool
            .deposited_capital
            .checked_add(unit)
            .ok_or(ErrorCode::MathOverflow)?;
        pool.remote_capital = pool
            .remote_capital
            .checked_add(unit)
            .ok_or(ErrorCode::MathOverflow)?;
        pool.units_dispatched = pool.units_dispatched.saturating_add(1);

        records.push(AllocationRecord {
            provider_id,
            pubkey: credential.pubkey,
            signature: credential.signature,
            amount: unit,
        });
    }
    Ok(records)
}
