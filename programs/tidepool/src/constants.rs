// ══════════════════════════════════════════════════════════════════════════════
// CAPITAL DENOMINATION
// ══════════════════════════════════════════════════════════════════════════════

/// Lamports per SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Capital required to activate one validator credential (32 SOL)
///
/// A deposit unit is indivisible: the dispatcher only moves whole units
/// from the buffer to the deposited balance.
pub const DEPOSIT_UNIT: u64 = 32 * LAMPORTS_PER_SOL;

// ══════════════════════════════════════════════════════════════════════════════
// FEE CONFIGURATION
// ══════════════════════════════════════════════════════════════════════════════

/// Basis point denominator (100% = 10000 bps)
pub const TOTAL_BASIS_POINTS: u16 = 10_000;

/// Default protocol fee taken from staking rewards (10%)
pub const DEFAULT_FEE_BPS: u16 = 1_000;

// ══════════════════════════════════════════════════════════════════════════════
// CREDENTIAL LAYOUT
// ══════════════════════════════════════════════════════════════════════════════

/// BLS12-381 validator public key length
pub const VALIDATOR_PUBKEY_LEN: usize = 48;

/// BLS12-381 deposit signature length
pub const VALIDATOR_SIGNATURE_LEN: usize = 96;

// ══════════════════════════════════════════════════════════════════════════════
// CAPACITY LIMITS (account space is allocated up front)
// ══════════════════════════════════════════════════════════════════════════════

/// Maximum registered providers
pub const MAX_PROVIDERS: usize = 8;

/// Maximum credentials per provider queue
pub const MAX_KEYS_PER_PROVIDER: usize = 8;

/// Maximum provider name length in bytes
pub const MAX_PROVIDER_NAME_LEN: usize = 32;

/// Maximum distinct share holders tracked by the ledger
pub const MAX_HOLDERS: usize = 64;

// ══════════════════════════════════════════════════════════════════════════════
// PDA SEEDS
// ══════════════════════════════════════════════════════════════════════════════

/// Pool state PDA seed
pub const POOL_STATE_SEED: &[u8] = b"pool_v1";

/// Pool authority PDA seed (holds buffered lamports)
pub const POOL_AUTHORITY_SEED: &[u8] = b"pool_auth_v1";

/// Share ledger PDA seed
pub const SHARE_LEDGER_SEED: &[u8] = b"shares_v1";

/// Provider registry PDA seed
pub const REGISTRY_SEED: &[u8] = b"registry_v1";
