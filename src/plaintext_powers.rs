//! Computes every power a [PowersDag] asks for over a batch of slot values,
//! then hands the exported ones to a [PowerEncryptor].
//!
//! The powers are exponentiated plaintexts of the receiver's query. They stay
//! inside the engine, are never printed, and are zeroed when it is dropped.

use std::collections::HashMap;

use log::{debug, trace};
use rayon::prelude::*;

use crate::{
    util::batch,
    EncryptedPowers, Modulus, PowerEncryptor, PowerRule, PowersDag, PowersError, PowersNode,
    PowersParams, LevelMap, Result,
};

/// The power table of one query batch.
///
/// Built eagerly at construction, then drained once by [PlaintextPowers::encrypt].
/// ```rust
/// use psu_powers::{Modulus, PlaintextPowers, PowersDag, PowerRule};
/// let dag = PowersDag::new(
///     vec![(2, PowerRule::Square(1)), (3, PowerRule::Multiply(1, 2)), (4, PowerRule::Square(2))],
///     vec![1, 2, 3, 4],
/// ).unwrap();
/// let powers = PlaintextPowers::new(vec![3, 5], &Modulus::new(97), &dag).unwrap();
/// assert_eq!(powers.power(3), Some(&[27, 28][..]));
/// assert_eq!(powers.power(4), Some(&[81, 43][..]));
/// ```
pub struct PlaintextPowers {
    modulus: Modulus,
    slot_count: usize,
    seed: Vec<u64>,
    powers: HashMap<u32, Vec<u64>>,
    outputs: Vec<u32>,
    levels: LevelMap,
}

impl PlaintextPowers {

    /// Computes the power table sequentially in the graph's topological order.
    pub fn new(values: Vec<u64>, modulus: &Modulus, dag: &PowersDag) -> Result<Self> {
        let mut ret = Self::seeded(values, modulus, dag)?;
        for node in dag.iter() {
            if node.power == 1 {
                continue;
            }
            let computed = ret.compute_node(node)?;
            ret.insert(node.power, computed)?;
        }
        ret.log_computed(dag);
        Ok(ret)
    }

    /// Same result as [PlaintextPowers::new], computing the nodes of each
    /// graph layer in parallel.
    pub fn new_par(values: Vec<u64>, modulus: &Modulus, dag: &PowersDag) -> Result<Self> {
        let mut ret = Self::seeded(values, modulus, dag)?;
        for layer in dag.layers() {
            let computed = layer.par_iter()
                .filter(|node| node.power != 1)
                .map(|node| ret.compute_node(node).map(|values| (node.power, values)))
                .collect::<Result<Vec<_>>>()?;
            for (power, values) in computed {
                ret.insert(power, values)?;
            }
        }
        ret.log_computed(dag);
        Ok(ret)
    }

    /// Computes the power table with the plain modulus of `params`.
    ///
    /// The batch may not be longer than the configured slot count, and when
    /// query powers are configured the graph's sources must match them. The
    /// configured level policy is kept for [PlaintextPowers::encrypt_configured].
    pub fn from_params(values: Vec<u64>, params: &PowersParams, dag: &PowersDag) -> Result<Self> {
        params.validate()?;
        if values.len() > params.slot_count() {
            return Err(PowersError::BatchTooLarge { len: values.len(), slot_count: params.slot_count() });
        }
        let sources = dag.source_powers();
        if !params.query_powers().is_empty() && params.query_powers() != &sources {
            return Err(PowersError::SourceMismatch {
                expected: params.query_powers().iter().copied().collect(),
                actual: sources.into_iter().collect(),
            });
        }
        let mut ret = Self::new(values, params.plain_modulus(), dag)?;
        ret.levels = params.levels().clone();
        Ok(ret)
    }

    fn seeded(mut values: Vec<u64>, modulus: &Modulus, dag: &PowersDag) -> Result<Self> {
        if modulus.is_zero() {
            return Err(PowersError::InvalidModulus(0));
        }
        if values.is_empty() {
            return Err(PowersError::EmptyBatch);
        }
        batch::modulo_inplace(&mut values, modulus);
        let slot_count = values.len();
        let mut powers = HashMap::with_capacity(dag.len());
        powers.insert(1, values.clone());
        Ok(Self {
            modulus: *modulus,
            slot_count,
            seed: values,
            powers,
            outputs: dag.outputs().iter().copied().collect(),
            levels: LevelMap::default(),
        })
    }

    fn compute_node(&self, node: &PowersNode) -> Result<Vec<u64>> {
        let mut result = vec![0; self.slot_count];
        match node.rule {
            PowerRule::Source => {
                batch::exponentiate(&self.seed, node.power as u64, &self.modulus, &mut result);
            }
            PowerRule::Square(s) => {
                batch::square(self.source(node.power, s)?, &self.modulus, &mut result);
            }
            PowerRule::Multiply(a, b) if a == b => {
                batch::square(self.source(node.power, a)?, &self.modulus, &mut result);
            }
            PowerRule::Multiply(a, b) => {
                let (a, b) = (self.source(node.power, a)?, self.source(node.power, b)?);
                batch::dyadic_product(a, b, &self.modulus, &mut result);
            }
        }
        trace!("computed power {} via {:?}", node.power, node.rule);
        Ok(result)
    }

    fn source(&self, power: u32, parent: u32) -> Result<&[u64]> {
        self.powers.get(&parent)
            .map(|v| v.as_slice())
            .ok_or(PowersError::MissingSource { power, parent })
    }

    fn insert(&mut self, power: u32, values: Vec<u64>) -> Result<()> {
        if self.powers.contains_key(&power) {
            return Err(PowersError::DuplicatePower(power));
        }
        self.powers.insert(power, values);
        Ok(())
    }

    fn log_computed(&self, dag: &PowersDag) {
        debug!(
            "computed {} powers up to {} (depth {}) over {} slots",
            self.powers.len(), dag.up_to(), dag.depth(), self.slot_count
        );
    }

    /// The modulus all powers are reduced by.
    pub fn modulus(&self) -> &Modulus {&self.modulus}

    /// Number of slots in the batch.
    pub fn slot_count(&self) -> usize {self.slot_count}

    /// Number of powers in the table.
    pub fn len(&self) -> usize {self.powers.len()}

    /// Always false: power 1 is always present.
    pub fn is_empty(&self) -> bool {self.powers.is_empty()}

    /// Computed powers in ascending order.
    pub fn powers(&self) -> Vec<u32> {
        let mut powers: Vec<u32> = self.powers.keys().copied().collect();
        powers.sort_unstable();
        powers
    }

    /// Powers exported by [PlaintextPowers::encrypt], ascending.
    pub fn outputs(&self) -> &[u32] {&self.outputs}

    /// Level policy used by [PlaintextPowers::encrypt_configured]; every power
    /// at level 0 unless built by [PlaintextPowers::from_params].
    pub fn levels(&self) -> &LevelMap {&self.levels}

    /// The slot vector of one power.
    pub fn power(&self, power: u32) -> Option<&[u64]> {
        self.powers.get(&power).map(|v| v.as_slice())
    }

    /// Raises the seed batch to `exponent` directly, without the graph.
    ///
    /// This is the reference for the graph-driven table: for every computed
    /// power `e`, `exponentiate(e)` equals `power(e)`.
    pub fn exponentiate(&self, exponent: u32) -> Result<Vec<u64>> {
        if exponent == 0 {
            return Err(PowersError::ZeroPower);
        }
        let mut result = vec![0; self.slot_count];
        batch::exponentiate(&self.seed, exponent as u64, &self.modulus, &mut result);
        Ok(result)
    }

    /// Encrypts every exported power at its level and discards the plaintext table.
    ///
    /// The first backend error is returned as is.
    pub fn encrypt<E: PowerEncryptor>(mut self, encryptor: &E, levels: &LevelMap) -> std::result::Result<EncryptedPowers<E::Ciphertext>, E::Error> {
        debug!("encrypting {} of {} powers", self.outputs.len(), self.powers.len());
        let mut result = EncryptedPowers::with_capacity(self.outputs.len());
        for &power in &self.outputs {
            // Outputs are nodes of the graph and every node is in the table.
            let values = &self.powers[&power];
            result.insert(power, encryptor.encrypt_at_level(values, levels.level_for(power))?);
        }
        self.clear();
        Ok(result)
    }

    /// Like [PlaintextPowers::encrypt], encrypting the powers in parallel.
    pub fn encrypt_par<E>(mut self, encryptor: &E, levels: &LevelMap) -> std::result::Result<EncryptedPowers<E::Ciphertext>, E::Error>
    where
        E: PowerEncryptor + Sync,
        E::Ciphertext: Send,
        E::Error: Send,
    {
        debug!("encrypting {} of {} powers in parallel", self.outputs.len(), self.powers.len());
        let powers = &self.powers;
        let result = self.outputs.par_iter()
            .map(|&power| {
                // Outputs are nodes of the graph and every node is in the table.
                encryptor.encrypt_at_level(&powers[&power], levels.level_for(power)).map(|c| (power, c))
            })
            .collect::<std::result::Result<EncryptedPowers<_>, _>>()?;
        self.clear();
        Ok(result)
    }

    /// [PlaintextPowers::encrypt] with the level policy the engine was built with.
    pub fn encrypt_configured<E: PowerEncryptor>(mut self, encryptor: &E) -> std::result::Result<EncryptedPowers<E::Ciphertext>, E::Error> {
        let levels = std::mem::take(&mut self.levels);
        self.encrypt(encryptor, &levels)
    }

    fn clear(&mut self) {
        self.seed.fill(0);
        self.powers.values_mut().for_each(|v| v.fill(0));
        self.powers.clear();
    }

}

impl Drop for PlaintextPowers {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for PlaintextPowers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaintextPowers")
            .field("modulus", &self.modulus.value())
            .field("slot_count", &self.slot_count)
            .field("powers", &self.powers())
            .finish()
    }
}
