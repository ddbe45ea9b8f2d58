use anchor_lang::prelude::*;

/// Tidepool error codes
///
/// Validation always precedes state writes; a failed instruction leaves
/// every account untouched.
#[error_code]
pub enum ErrorCode {
    #[msg("Pool not active")]
    PoolNotActive,

    #[msg("Unauthorized")]
    UnauthorizedAccess,

    #[msg("Invalid parameter")]
    InvalidParameter,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Provider registry full")]
    RegistryFull,

    #[msg("Provider credential queue full")]
    ProviderKeysFull,

    #[msg("Share ledger holder capacity reached")]
    LedgerFull,

    #[msg("Insufficient share balance")]
    InsufficientShares,
}
