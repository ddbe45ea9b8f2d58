use anchor_lang::prelude::*;

use crate::constants::TOTAL_BASIS_POINTS;
use crate::errors::ErrorCode;
use crate::state::FeeDistribution;

/// Shares minted for a deposit of `amount` lamports.
///
/// Price is total controlled capital over shares outstanding, integer
/// division, defaulting to 1:1 when no shares exist. A price that rounds
/// to zero (pool value collapsed below one lamport per share) is floored
/// at 1 so the division stays defined.
pub fn shares_for_deposit(amount: u64, total_shares: u64, total_controlled: u64) -> u64 {
    if total_shares == 0 {
        return amount;
    }
    let price = (total_controlled / total_shares).max(1);
    amount / price
}

/// Fee owed on a reward, in lamports: reward * fee_bps / 10000, truncating.
pub fn fee_on_reward(reward: u64, fee_bps: u16) -> u64 {
    let fee = reward as u128 * fee_bps as u128 / TOTAL_BASIS_POINTS as u128;
    // bps <= 10000, so fee <= reward and fits in u64
    fee as u64
}

/// Shares to mint so that the minted stake is worth exactly `total_fee`
/// lamports at the post-mint price.
///
/// Derived from M * (T / (S + M)) = total_fee, rearranged to
/// M = total_fee * S / (T - total_fee). Multiply happens in u128 before
/// the divide. A fee equal to the entire pool value has no finite
/// solution and is rejected.
pub fn fee_shares_to_mint(total_fee: u64, total_shares: u64, total_controlled: u64) -> Result<u64> {
    if total_fee == 0 || total_shares == 0 {
        return Ok(0);
    }
    let denominator = total_controlled
        .checked_sub(total_fee)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(denominator > 0, ErrorCode::MathOverflow);

    let numerator = (total_fee as u128)
        .checked_mul(total_shares as u128)
        .ok_or(ErrorCode::MathOverflow)?;
    let minted = numerator / denominator as u128;
    u64::try_from(minted).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Split `minted` fee shares into (treasury, insurance, providers).
///
/// Treasury and insurance take their floored basis-point cuts; the
/// providers bucket absorbs the rounding remainder so no share is lost.
pub fn split_fee_shares(minted: u64, distribution: &FeeDistribution) -> Result<(u64, u64, u64)> {
    let bps = TOTAL_BASIS_POINTS as u128;
    let treasury = (minted as u128 * distribution.treasury_bps as u128 / bps) as u64;
    let insurance = (minted as u128 * distribution.insurance_bps as u128 / bps) as u64;
    let providers = minted
        .checked_sub(treasury)
        .and_then(|rest| rest.checked_sub(insurance))
        .ok_or(ErrorCode::MathOverflow)?;
    Ok((treasury, insurance, providers))
}

/// Divide the provider bucket among providers weighted by effective stake.
///
/// `stakes` is (id, recipient, weight) in ascending id order. Each entry
/// gets its floored proportional cut; the integer remainder is handed out
/// one share at a time, lowest id first, so the amounts always sum to
/// `total` exactly.
pub fn split_provider_shares(
    total: u64,
    stakes: &[(u64, Pubkey, u64)],
) -> Result<Vec<(Pubkey, u64)>> {
    let weight_sum: u128 = stakes.iter().map(|(_, _, w)| *w as u128).sum();
    if total == 0 || weight_sum == 0 {
        return Ok(Vec::new());
    }

    let mut allocations: Vec<(Pubkey, u64)> = Vec::with_capacity(stakes.len());
    let mut allocated: u64 = 0;
    for (_, recipient, weight) in stakes {
        let cut = (total as u128)
            .checked_mul(*weight as u128)
            .ok_or(ErrorCode::MathOverflow)?
            / weight_sum;
        let cut = cut as u64;
        allocations.push((*recipient, cut));
        allocated = allocated.checked_add(cut).ok_or(ErrorCode::MathOverflow)?;
    }

    let mut remainder = total - allocated;
    for allocation in allocations.iter_mut() {
        if remainder == 0 {
            break;
        }
        allocation.1 += 1;
        remainder -= 1;
    }
    Ok(allocations)
}
