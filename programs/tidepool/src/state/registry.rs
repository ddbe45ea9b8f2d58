use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::ErrorCode;

/// One validator credential: a BLS pubkey plus the matching deposit
/// signature, consumable exactly once.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Copy, Debug)]
pub struct Credential {
    pub pubkey: [u8; 48],
    pub signature: [u8; 96],
    pub used: bool,
}

/// A registered validator operator and its credential queue.
///
/// Credentials are consumed in the order they were registered (FIFO per
/// provider); `used_count` never exceeds `validator_limit`.
#[derive(AnchorSerialize, AnchorDeserialize, InitSpace, Clone, Debug)]
pub struct Provider {
    /// Sequential id, assigned from 0 at registration
    pub id: u64,

    /// Human-readable operator name
    #[max_len(MAX_PROVIDER_NAME_LEN)]
    pub name: String,

    /// Address allowed to submit credentials for this provider; also the
    /// holder key that receives the provider's fee shares
    pub address: Pubkey,

    /// Inactive providers are skipped by allocation and fee weighting
    pub active: bool,

    /// Maximum credentials this provider may have in use
    pub validator_limit: u64,

    /// Currently-used credential count (the provider's effective stake)
    pub used_count: u64,

    /// Credential queue, oldest first
    #[max_len(MAX_KEYS_PER_PROVIDER)]
    pub keys: Vec<Credential>,
}

impl Provider {
    /// Whether the allocation scan may consume a credential from this
    /// provider right now.
    pub fn eligible(&self) -> bool {
        self.active && self.used_count < self.validator_limit
    }

    /// Index of the oldest unused credential, if any
    fn first_unused(&self) -> Option<usize> {
        self.keys.iter().position(|k| !k.used)
    }
}

/// Registry of validator operators and their credential queues.
///
/// Provider ids are vector indices; providers are never deleted.
#[account]
#[derive(InitSpace)]
pub struct ProviderRegistry {
    #[max_len(MAX_PROVIDERS)]
    pub providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Register a new provider and return its id.
    pub fn add_provider(&mut self, name: String, address: Pubkey, validator_limit: u64) -> Result<u64> {
        require!(
            !name.is_empty() && name.len() <= MAX_PROVIDER_NAME_LEN,
            ErrorCode::InvalidParameter
        );
        require!(self.providers.len() < MAX_PROVIDERS, ErrorCode::RegistryFull);

        let id = self.providers.len() as u64;
        self.providers.push(Provider {
            id,
            name,
            address,
            active: true,
            validator_limit,
            used_count: 0,
            keys: Vec::new(),
        });
        Ok(id)
    }

    /// Append `count` credentials to a provider's queue.
    ///
    /// `submitter` must be the provider's registered address; the blobs must
    /// be exactly `count` concatenated pubkeys / signatures.
    pub fn add_credentials(
        &mut self,
        provider_id: u64,
        submitter: &Pubkey,
        count: u64,
        pubkey_blob: &[u8],
        signature_blob: &[u8],
    ) -> Result<()> {
        require!(count > 0, ErrorCode::InvalidParameter);
        let n = count as usize;
        require!(
            pubkey_blob.len() == n * VALIDATOR_PUBKEY_LEN,
            ErrorCode::InvalidParameter
        );
        require!(
            signature_blob.len() == n * VALIDATOR_SIGNATURE_LEN,
            ErrorCode::InvalidParameter
        );

        let provider = self
            .providers
            .get_mut(provider_id as usize)
            .ok_or(ErrorCode::InvalidParameter)?;
        require!(provider.address == *submitter, ErrorCode::InvalidParameter);
        require!(
            provider.keys.len() + n <= MAX_KEYS_PER_PROVIDER,
            ErrorCode::ProviderKeysFull
        );

        for i in 0..n {
            let mut pubkey = [0u8; VALIDATOR_PUBKEY_LEN];
            pubkey.copy_from_slice(&pubkey_blob[i * VALIDATOR_PUBKEY_LEN..(i + 1) * VALIDATOR_PUBKEY_LEN]);
            let mut signature = [0u8; VALIDATOR_SIGNATURE_LEN];
            signature.copy_from_slice(
                &signature_blob[i * VALIDATOR_SIGNATURE_LEN..(i + 1) * VALIDATOR_SIGNATURE_LEN],
            );
            provider.keys.push(Credential {
                pubkey,
                signature,
                used: false,
            });
        }
        Ok(())
    }

    /// Allocation policy: scan providers in ascending id order, skipping
    /// inactive providers and providers at their limit, and return the
    /// first qualifying provider's oldest unused credential. The same
    /// provider keeps being selected until its queue or limit is exhausted.
    pub fn next_available(&self) -> Option<(usize, usize)> {
        for (pi, provider) in self.providers.iter().enumerate() {
            if !provider.eligible() {
                continue;
            }
            if let Some(ki) = provider.first_unused() {
                return Some((pi, ki));
            }
        }
        None
    }

    /// Consume one credential and return a copy of it.
    pub fn mark_used(&mut self, provider_idx: usize, key_idx: usize) -> Result<Credential> {
        let provider = self
            .providers
            .get_mut(provider_idx)
            .ok_or(ErrorCode::InvalidParameter)?;
        let key = provider
            .keys
            .get_mut(key_idx)
            .ok_or(ErrorCode::InvalidParameter)?;
        require!(!key.used, ErrorCode::InvalidParameter);
        require!(
            provider.used_count < provider.validator_limit,
            ErrorCode::InvalidParameter
        );
        key.used = true;
        provider.used_count += 1;
        Ok(*key)
    }

    /// Toggle a provider's active flag.
    pub fn set_provider_active(&mut self, provider_id: u64, active: bool) -> Result<()> {
        let provider = self
            .providers
            .get_mut(provider_id as usize)
            .ok_or(ErrorCode::InvalidParameter)?;
        provider.active = active;
        Ok(())
    }

    pub fn total_providers(&self) -> u64 {
        self.providers.len() as u64
    }

    /// (total, used) credential counts for a provider
    pub fn credential_counts(&self, provider_id: u64) -> Result<(u64, u64)> {
        let provider = self
            .providers
            .get(provider_id as usize)
            .ok_or(ErrorCode::InvalidParameter)?;
        Ok((provider.keys.len() as u64, provider.used_count))
    }

    /// Fee-weighting inputs: (id, recipient address, effective stake) for
    /// every active provider with at least one credential in use.
    pub fn active_stakes(&self) -> Vec<(u64, Pubkey, u64)> {
        self.providers
            .iter()
            .filter(|p| p.active && p.used_count > 0)
            .map(|p| (p.id, p.address, p.used_count))
            .collect()
    }
}
