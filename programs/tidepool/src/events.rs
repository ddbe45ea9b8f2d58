use anchor_lang::prelude::*;

// ══════════════════════════════════════════════════════════════════════════════
// INITIALIZATION EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when the pool is initialized
#[event]
pub struct PoolInitialized {
    pub admin: Pubkey,
    pub oracle: Pubkey,
    pub treasury: Pubkey,
    pub insurance: Pubkey,
    pub fee_bps: u16,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// DEPOSIT / ALLOCATION EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted for every deposit, after the dispatch loop has run
#[event]
pub struct Deposited {
    pub payer: Pubkey,
    pub amount: u64,
    pub shares_minted: u64,
    pub units_dispatched: u64,
    pub timestamp: i64,
}

/// Allocation record consumed by the external validator-registration
/// collaborator. One event per dispatched unit.
#[event]
pub struct ValidatorAllocated {
    pub provider_id: u64,
    pub pubkey: [u8; 48],
    pub signature: [u8; 96],
    pub amount: u64,
    pub withdrawal_credentials: [u8; 32],
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// REBASE EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when an oracle report is accepted
#[event]
pub struct ReportProcessed {
    pub epoch: u64,
    pub previous_remote: u64,
    pub new_remote: u64,
    pub fee_shares_minted: u64,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// REGISTRY EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when a provider is registered
#[event]
pub struct ProviderAdded {
    pub provider_id: u64,
    pub name: String,
    pub address: Pubkey,
    pub validator_limit: u64,
    pub timestamp: i64,
}

/// Emitted when credentials are appended to a provider queue
#[event]
pub struct CredentialsAdded {
    pub provider_id: u64,
    pub count: u64,
    pub total_keys: u64,
    pub timestamp: i64,
}

/// Emitted when a provider is activated or deactivated
#[event]
pub struct ProviderStatusChanged {
    pub provider_id: u64,
    pub active: bool,
    pub timestamp: i64,
}

// ══════════════════════════════════════════════════════════════════════════════
// ADMIN EVENTS
// ══════════════════════════════════════════════════════════════════════════════

/// Emitted when the protocol fee changes
#[event]
pub struct FeeUpdated {
    pub fee_bps: u16,
    pub timestamp: i64,
}

/// Emitted when the fee distribution changes
#[event]
pub struct FeeDistributionUpdated {
    pub treasury_bps: u16,
    pub insurance_bps: u16,
    pub providers_bps: u16,
    pub timestamp: i64,
}

/// Emitted when withdrawal credentials are set
#[event]
pub struct WithdrawalCredentialsSet {
    pub withdrawal_credentials: [u8; 32],
    pub timestamp: i64,
}

/// Emitted when the oracle authority changes
#[event]
pub struct OracleChanged {
    pub old_oracle: Pubkey,
    pub new_oracle: Pubkey,
    pub timestamp: i64,
}

/// Emitted when admin authority is transferred
#[event]
pub struct AdminTransferred {
    pub old_admin: Pubkey,
    pub new_admin: Pubkey,
    pub timestamp: i64,
}

/// Emitted when the pool is paused or resumed
#[event]
pub struct StatusChanged {
    pub is_active: bool,
    pub timestamp: i64,
}
