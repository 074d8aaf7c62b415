use std::sync::Arc;

use log::debug;
use serde::{Serialize, Deserialize};

use crate::{
    util::hash::{self, HashBlock, HASH_ZERO_BLOCK},
    Modulus,
};
use super::{LweError, Result};

/// Identifies the parameters of one level, as a SHA-256 digest.
pub type LevelId = HashBlock;

/// Parameters of the LWE scheme, set builder style.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LweParameters {
    dimension: usize,
    plain_modulus: Modulus,
    coeff_modulus: Vec<Modulus>,
    noise_bound: u64,
}

impl LweParameters {

    /// Empty parameters; every field must be set before creating a context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Length of the secret and of every `a` vector.
    pub fn set_dimension(mut self, dimension: usize) -> Self {
        self.dimension = dimension;
        self
    }

    /// Plaintext modulus `t`.
    pub fn set_plain_modulus(mut self, plain_modulus: Modulus) -> Self {
        self.plain_modulus = plain_modulus;
        self
    }

    /// Modulus chain; index `i` is level `i`.
    pub fn set_coeff_modulus(mut self, coeff_modulus: Vec<Modulus>) -> Self {
        self.coeff_modulus = coeff_modulus;
        self
    }

    /// Noise is drawn uniformly from `[-noise_bound, noise_bound]`.
    pub fn set_noise_bound(mut self, noise_bound: u64) -> Self {
        self.noise_bound = noise_bound;
        self
    }

    #[allow(missing_docs)]
    pub fn dimension(&self) -> usize {self.dimension}
    #[allow(missing_docs)]
    pub fn plain_modulus(&self) -> &Modulus {&self.plain_modulus}
    #[allow(missing_docs)]
    pub fn coeff_modulus(&self) -> &[Modulus] {&self.coeff_modulus}
    #[allow(missing_docs)]
    pub fn noise_bound(&self) -> u64 {self.noise_bound}

}

/// Pre-computation for one level of the chain.
#[derive(Clone, Debug)]
pub struct LevelData {
    level_id: LevelId,
    coeff_modulus: Modulus,
    coeff_div_plain_modulus: u64,
    chain_index: usize,
}

impl LevelData {
    /// Digest of the level parameters.
    pub fn level_id(&self) -> &LevelId {&self.level_id}
    /// Ciphertext modulus `q` of this level.
    pub fn coeff_modulus(&self) -> &Modulus {&self.coeff_modulus}
    /// `Δ = floor(q / t)`.
    pub fn coeff_div_plain_modulus(&self) -> u64 {self.coeff_div_plain_modulus}
    /// Index of this level in the chain.
    pub fn chain_index(&self) -> usize {self.chain_index}
}

/// Validated parameters plus per-level data, shared by keys, encryptors and decryptors.
#[derive(Debug)]
pub struct LweContext {
    parms: LweParameters,
    levels: Vec<LevelData>,
}

impl LweContext {

    /// Validates `parms` and derives the data of every level.
    pub fn new(parms: LweParameters) -> Result<Arc<Self>> {
        if parms.dimension == 0 {
            return Err(LweError::InvalidParameters("Dimension must be positive.".into()));
        }
        if parms.plain_modulus.is_zero() {
            return Err(LweError::InvalidParameters("Plain modulus is not set.".into()));
        }
        if parms.coeff_modulus.is_empty() {
            return Err(LweError::InvalidParameters("Coeff modulus chain is empty.".into()));
        }
        let t = parms.plain_modulus.value();
        let mut levels = Vec::with_capacity(parms.coeff_modulus.len());
        for (chain_index, q) in parms.coeff_modulus.iter().enumerate() {
            let delta = q.value() / t;
            // Decryption is exact when t * (B + t) < q / 2.
            let bound = 4 * (t as u128 + parms.noise_bound as u128);
            if (delta as u128) <= bound {
                return Err(LweError::InvalidParameters(format!(
                    "Coeff modulus {} at level {} is too small for plain modulus {} and noise bound {}.",
                    q, chain_index, t, parms.noise_bound
                )));
            }
            let mut level_id = HASH_ZERO_BLOCK;
            hash::hash(
                &[parms.dimension as u64, t, q.value(), parms.noise_bound, chain_index as u64],
                &mut level_id,
            );
            levels.push(LevelData {
                level_id,
                coeff_modulus: *q,
                coeff_div_plain_modulus: delta,
                chain_index,
            });
        }
        debug!("created LWE context: dimension {}, {} levels", parms.dimension, levels.len());
        Ok(Arc::new(Self { parms, levels }))
    }

    /// The validated parameters.
    pub fn parms(&self) -> &LweParameters {&self.parms}

    /// Number of levels in the chain.
    pub fn level_count(&self) -> usize {self.levels.len()}

    /// The top level index.
    pub fn top_level(&self) -> usize {self.levels.len() - 1}

    /// Data of one level.
    pub fn get_level_data(&self, level: usize) -> Result<&LevelData> {
        self.levels.get(level).ok_or(LweError::InvalidLevel(level))
    }

}
