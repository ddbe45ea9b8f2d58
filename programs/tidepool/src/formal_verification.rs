// ============================================================================
// PROPERTY-BASED TESTS & INVARIANTS
// ============================================================================
//
// Invariant checks over the pure state types, driven by deterministic
// pseudo-random operation sequences. Run with:
// cargo test --lib formal_verification
//
// 1. Conservation of value across deposits and dispatch
// 2. Share ledger sum invariant
// 3. Registry limit and FIFO invariants
// 4. Fee minting bounds and exactness
// 5. Share price monotonicity under rebase
// ============================================================================

use anchor_lang::prelude::Pubkey;

use crate::constants::*;
use crate::helpers::{dispatch, math};
use crate::state::{Credential, FeeDistribution, PoolState, Provider, ProviderRegistry, ShareLedger};

/// Small deterministic generator so sequences are reproducible.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 16
    }

    fn below(&mut self, bound: u64) -> u64 {
        self.next() % bound
    }
}

fn fresh_pool() -> PoolState {
    PoolState {
        admin: Pubkey::new_unique(),
        oracle: Pubkey::new_unique(),
        treasury: Pubkey::new_unique(),
        insurance: Pubkey::new_unique(),
        withdrawal_credentials: [0u8; 32],
        buffered_capital: 0,
        deposited_capital: 0,
        remote_capital: 0,
        deposit_unit: DEPOSIT_UNIT,
        fee_bps: DEFAULT_FEE_BPS,
        fee_distribution: FeeDistribution {
            treasury_bps: 3000,
            insurance_bps: 2000,
            providers_bps: 5000,
        },
        last_report_epoch: None,
        is_active: true,
        authority_bump: 255,
        initialized_at: 0,
        last_report_timestamp: 0,
        deposit_count: 0,
        units_dispatched: 0,
        total_fee_shares_minted: 0,
    }
}

fn registry_with(providers: &[(usize, u64)]) -> ProviderRegistry {
    let mut registry = ProviderRegistry { providers: Vec::new() };
    for (i, (keys, limit)) in providers.iter().enumerate() {
        let mut credential_keys = Vec::new();
        for k in 0..*keys {
            credential_keys.push(Credential {
                pubkey: [(i * 16 + k) as u8; 48],
                signature: [(i * 16 + k) as u8; 96],
                used: false,
            });
        }
        registry.providers.push(Provider {
            id: i as u64,
            name: format!("op-{i}"),
            address: Pubkey::new_unique(),
            active: true,
            validator_limit: *limit,
            used_count: 0,
            keys: credential_keys,
        });
    }
    registry
}

fn ledger_sum(ledger: &ShareLedger) -> u64 {
    ledger.balances.iter().map(|b| b.shares).sum()
}

// ========================================================================
// 1. CONSERVATION
// ========================================================================

mod conservation {
    use super::*;

    /// With no reports, buffered + deposited always equals the sum of all
    /// deposit amounts, whatever the credential supply looks like.
    #[test]
    fn deposits_conserve_capital() {
        let mut rng = Lcg(42);
        for _ in 0..50 {
            let mut pool = fresh_pool();
            let mut ledger = ShareLedger { total_shares: 0, balances: Vec::new() };
            let mut registry = registry_with(&[(3, 3), (2, 1), (5, 5)]);
            let mut total_in: u64 = 0;

            for _ in 0..20 {
                let amount = rng.below(60 * LAMPORTS_PER_SOL) + 1;
                let shares =
                    math::shares_for_deposit(amount, ledger.total_shares, pool.total_controlled());
                ledger.mint(Pubkey::new_unique(), shares).unwrap();
                pool.buffered_capital += amount;
                total_in += amount;
                dispatch::run_allocation(&mut pool, &mut registry).unwrap();

                assert_eq!(
                    pool.buffered_capital + pool.deposited_capital,
                    total_in,
                    "capital leaked or appeared"
                );
                // remote tracks deposited 1:1 until the first report
                assert_eq!(pool.remote_capital, pool.deposited_capital);
            }
        }
    }

    /// The dispatch loop alone never changes buffered + deposited.
    #[test]
    fn dispatch_moves_value_without_creating_it() {
        let mut rng = Lcg(7);
        for _ in 0..100 {
            let mut pool = fresh_pool();
            let mut registry = registry_with(&[(4, 4), (4, 2)]);
            pool.buffered_capital = rng.below(10 * DEPOSIT_UNIT);

            let before = pool.buffered_capital + pool.deposited_capital;
            let records = dispatch::run_allocation(&mut pool, &mut registry).unwrap();
            assert_eq!(pool.buffered_capital + pool.deposited_capital, before);
            assert_eq!(
                pool.deposited_capital,
                records.len() as u64 * DEPOSIT_UNIT,
                "each record accounts for exactly one unit"
            );
            // leftover buffer is either below one unit or unbacked by credentials
            if pool.buffered_capital >= DEPOSIT_UNIT {
                assert!(registry.next_available().is_none());
            }
        }
    }
}

// ========================================================================
// 2. SHARE LEDGER
// ========================================================================

mod ledger_invariants {
    use super::*;

    /// sum(balances) == total_shares through arbitrary mint/burn mixes,
    /// including rejected operations.
    #[test]
    fn sum_of_balances_always_equals_total() {
        let mut rng = Lcg(1234);
        let mut ledger = ShareLedger { total_shares: 0, balances: Vec::new() };
        let holders: Vec<Pubkey> = (0..8).map(|_| Pubkey::new_unique()).collect();

        for _ in 0..500 {
            let holder = holders[rng.below(holders.len() as u64) as usize];
            let amount = rng.below(1_000_000);
            if rng.below(3) == 0 {
                // burns may legitimately fail on balance; either way the
                // invariant must hold
                let _ = ledger.burn(holder, amount);
            } else {
                ledger.mint(holder, amount).unwrap();
            }
            assert_eq!(ledger_sum(&ledger), ledger.total_shares);
        }
    }
}

// ========================================================================
// 3. REGISTRY
// ========================================================================

mod registry_invariants {
    use super::*;

    /// used_count never exceeds validator_limit, and used credentials are
    /// always a prefix of each provider's queue (FIFO consumption).
    #[test]
    fn limits_and_fifo_hold_under_drain() {
        let mut pool = fresh_pool();
        let mut registry = registry_with(&[(5, 3), (2, 2), (4, 1), (3, 3)]);
        pool.buffered_capital = 20 * DEPOSIT_UNIT;

        dispatch::run_allocation(&mut pool, &mut registry).unwrap();

        for provider in &registry.providers {
            assert!(provider.used_count <= provider.validator_limit);
            let used: Vec<bool> = provider.keys.iter().map(|k| k.used).collect();
            let first_unused = used.iter().position(|u| !*u).unwrap_or(used.len());
            assert!(
                used[first_unused..].iter().all(|u| !*u),
                "used credentials must form a prefix: {used:?}"
            );
            assert_eq!(
                provider.used_count,
                used.iter().filter(|u| **u).count() as u64
            );
        }
        // limits: 3 + 2 + 1 + 3 usable credentials in total
        assert_eq!(pool.units_dispatched, 9);
    }

    /// Allocation order is total over provider ids: a provider only
    /// receives work when every lower-id provider is ineligible.
    #[test]
    fn lower_ids_are_served_first() {
        let mut registry = registry_with(&[(2, 2), (2, 2), (2, 2)]);
        let mut order = Vec::new();
        while let Some((pi, ki)) = registry.next_available() {
            registry.mark_used(pi, ki).unwrap();
            order.push(registry.providers[pi].id);
        }
        assert_eq!(order, vec![0, 0, 1, 1, 2, 2]);
    }
}

// ========================================================================
// 4. FEE MINTING
// ========================================================================

mod fee_invariants {
    use super::*;

    /// The value of minted fee shares at the post-mint price never
    /// exceeds the nominal fee, and the shortfall is below one share's
    /// value.
    #[test]
    fn minted_fee_value_bounded_by_fee() {
        let mut rng = Lcg(99);
        for _ in 0..1000 {
            let shares = rng.below(1_000_000_000_000) + 1;
            let controlled = shares + rng.below(1_000_000_000_000);
            let reward = rng.below(controlled / 2) + 1;
            let fee_bps = (rng.below(10_001)) as u16;

            let total_fee = math::fee_on_reward(reward, fee_bps);
            assert!(total_fee <= reward);
            if total_fee >= controlled {
                continue;
            }
            let minted = match math::fee_shares_to_mint(total_fee, shares, controlled) {
                Ok(m) => m,
                Err(_) => continue,
            };
            let value =
                (minted as u128 * controlled as u128 / (shares as u128 + minted as u128)) as u64;
            assert!(value <= total_fee, "fee recipients must not be overpaid");

            let price_ceil = controlled / shares + 1;
            assert!(
                total_fee - value <= price_ceil,
                "shortfall {} above one share's value {}",
                total_fee - value,
                price_ceil
            );
        }
    }

    /// Splitting the fee across recipients conserves the minted total
    /// exactly for arbitrary distributions and provider weights.
    #[test]
    fn distribution_conserves_minted_shares() {
        let mut rng = Lcg(31337);
        for _ in 0..500 {
            let treasury_bps = rng.below(10_001) as u16;
            let insurance_bps = rng.below((10_001 - treasury_bps as u64).max(1)) as u16;
            let providers_bps = TOTAL_BASIS_POINTS - treasury_bps - insurance_bps;
            let distribution = FeeDistribution { treasury_bps, insurance_bps, providers_bps };

            let minted = rng.below(1_000_000_000);
            let (t, i, p) = math::split_fee_shares(minted, &distribution).unwrap();
            assert_eq!(t + i + p, minted);

            let stakes: Vec<(u64, Pubkey, u64)> = (0..(rng.below(5) + 1))
                .map(|id| (id, Pubkey::new_unique(), rng.below(10) + 1))
                .collect();
            let allocations = math::split_provider_shares(p, &stakes).unwrap();
            let allocated: u64 = allocations.iter().map(|(_, s)| s).sum();
            assert_eq!(allocated, p, "provider split must be exact");
        }
    }
}

// ========================================================================
// 5. SHARE PRICE
// ========================================================================

mod price_invariants {
    use super::*;

    /// A gain report never decreases the share price, fee minting
    /// included. Prices are compared as cross products to avoid rounding.
    #[test]
    fn gain_report_never_decreases_price() {
        let mut rng = Lcg(2024);
        for _ in 0..200 {
            let mut pool = fresh_pool();
            let mut ledger = ShareLedger { total_shares: 0, balances: Vec::new() };
            let mut registry = registry_with(&[(2, 2), (2, 2)]);

            let amount = rng.below(100 * LAMPORTS_PER_SOL) + DEPOSIT_UNIT;
            let shares = math::shares_for_deposit(amount, 0, 0);
            ledger.mint(Pubkey::new_unique(), shares).unwrap();
            pool.buffered_capital = amount;
            dispatch::run_allocation(&mut pool, &mut registry).unwrap();

            let s0 = ledger.total_shares as u128;
            let t0 = pool.total_controlled() as u128;

            // reward up to 10% of remote
            let reward = rng.below(pool.remote_capital / 10 + 1);
            let new_remote = pool.remote_capital + reward;
            let previous = pool.remote_capital;
            pool.remote_capital = new_remote;
            if new_remote > previous {
                let total_fee = math::fee_on_reward(new_remote - previous, pool.fee_bps);
                let minted =
                    math::fee_shares_to_mint(total_fee, ledger.total_shares, pool.total_controlled())
                        .unwrap();
                ledger.mint(pool.treasury, minted).unwrap();
            }

            let s1 = ledger.total_shares as u128;
            let t1 = pool.total_controlled() as u128;
            // t1/s1 >= t0/s0
            assert!(
                t1 * s0 >= t0 * s1,
                "price decreased: {t0}/{s0} -> {t1}/{s1}"
            );
        }
    }
}
