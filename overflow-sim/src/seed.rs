//! Per-trial random streams derived from a single run seed.
use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use crate::error::SimError;

/// Seed for trial `index` within the `domain` stream of `run_seed`.
///
/// Streams are independent of worker count and scheduling: the same
/// `(run_seed, domain, index)` always yields the same seed.
///
/// # Errors
///
/// Returns `SimError::Seed` if the MAC rejects the key.
pub fn derive_trial_seed(run_seed: u64, domain: &[u8], index: u64) -> Result<u64, SimError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(&run_seed.to_le_bytes())
        .map_err(|err| SimError::Seed(err.to_string()))?;
    mac.update(domain);
    mac.update(&index.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0_u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    Ok(u64::from_le_bytes(seed_bytes))
}

/// Fresh generator for one trial.
///
/// # Errors
///
/// Propagates [`derive_trial_seed`] failures.
pub fn trial_rng(run_seed: u64, domain: &[u8], index: u64) -> Result<ChaCha20Rng, SimError> {
    derive_trial_seed(run_seed, domain, index).map(ChaCha20Rng::seed_from_u64)
}
