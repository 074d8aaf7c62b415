//! The boundary between the power engine and an encryption backend.

use std::collections::{BTreeMap, HashMap};

use serde::{Serialize, Deserialize};

/// Encrypted powers keyed by exponent.
pub type EncryptedPowers<C> = HashMap<u32, C>;

/// Anything able to pack a slot vector into a ciphertext at a given level.
///
/// The engine never inspects the ciphertext and never handles keys; it only
/// decides which vector goes to which level. Implementations may draw fresh
/// randomness per call, but decryption under the matching key must recover
/// `values` exactly.
pub trait PowerEncryptor {
    /// Opaque ciphertext handle.
    type Ciphertext;
    /// Backend failure, surfaced to the caller unmodified.
    type Error: std::error::Error;

    /// Encrypts `values` at `level`.
    fn encrypt_at_level(&self, values: &[u64], level: usize) -> Result<Self::Ciphertext, Self::Error>;
}

impl<E: PowerEncryptor + ?Sized> PowerEncryptor for &E {
    type Ciphertext = E::Ciphertext;
    type Error = E::Error;

    fn encrypt_at_level(&self, values: &[u64], level: usize) -> Result<Self::Ciphertext, Self::Error> {
        (**self).encrypt_at_level(values, level)
    }
}

/// Chooses the encryption level of each exported power.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelMap {
    /// Level used for every power without an override.
    #[serde(default)]
    pub default_level: usize,
    /// Per-power levels.
    #[serde(default)]
    pub overrides: BTreeMap<u32, usize>,
}

impl LevelMap {

    /// Every power at the same level.
    pub fn uniform(level: usize) -> Self {
        Self { default_level: level, overrides: BTreeMap::new() }
    }

    /// Builder-style override for one power.
    pub fn set_level(mut self, power: u32, level: usize) -> Self {
        self.overrides.insert(power, level);
        self
    }

    /// The level `power` is encrypted at.
    pub fn level_for(&self, power: u32) -> usize {
        self.overrides.get(&power).copied().unwrap_or(self.default_level)
    }

}
