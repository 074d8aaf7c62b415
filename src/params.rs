use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::{LevelMap, Modulus, PowersError, Result};

/// Parameters shared by every query batch of one protocol run.
///
/// Usually loaded from the protocol configuration as JSON:
/// ```rust
/// # use psu_powers::PowersParams;
/// let params = PowersParams::from_json(r#"{
///     "plain_modulus": 65537,
///     "slot_count": 4096,
///     "query_powers": [1, 3, 11],
///     "levels": { "default_level": 1 }
/// }"#).unwrap();
/// assert_eq!(params.plain_modulus().value(), 65537);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PowersParams {
    plain_modulus: Modulus,
    slot_count: usize,
    #[serde(default)]
    query_powers: BTreeSet<u32>,
    #[serde(default)]
    levels: LevelMap,
}

impl PowersParams {

    /// Creates parameters with no expected query powers and every power at level 0.
    pub fn new(plain_modulus: Modulus, slot_count: usize) -> Result<Self> {
        let params = Self {
            plain_modulus,
            slot_count,
            query_powers: BTreeSet::new(),
            levels: LevelMap::default(),
        };
        params.validate()?;
        Ok(params)
    }

    /// Sets the source powers a compatible graph must have.
    pub fn set_query_powers<I: IntoIterator<Item = u32>>(mut self, query_powers: I) -> Result<Self> {
        self.query_powers = query_powers.into_iter().collect();
        self.validate()?;
        Ok(self)
    }

    /// Sets the level policy used when encrypting.
    pub fn set_levels(mut self, levels: LevelMap) -> Self {
        self.levels = levels;
        self
    }

    /// Parses and validates parameters from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks the invariants [PlaintextPowers](crate::PlaintextPowers) relies on.
    pub fn validate(&self) -> Result<()> {
        if self.plain_modulus.is_zero() {
            return Err(PowersError::InvalidModulus(0));
        }
        if self.slot_count == 0 {
            return Err(PowersError::InvalidParameters("slot_count must be positive".into()));
        }
        if self.query_powers.contains(&0) {
            return Err(PowersError::ZeroPower);
        }
        if !self.query_powers.is_empty() && !self.query_powers.contains(&1) {
            return Err(PowersError::InvalidParameters("query_powers must contain 1".into()));
        }
        Ok(())
    }

    /// Plaintext modulus of the slot values.
    pub fn plain_modulus(&self) -> &Modulus {&self.plain_modulus}

    /// Maximal number of slots in one batch.
    pub fn slot_count(&self) -> usize {self.slot_count}

    /// Expected source powers of the graph; empty when unchecked.
    pub fn query_powers(&self) -> &BTreeSet<u32> {&self.query_powers}

    /// Level policy.
    pub fn levels(&self) -> &LevelMap {&self.levels}

}
