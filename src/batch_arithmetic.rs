use crate::{
    util::batch,
    Modulus, PowersError, Result,
};

/// Element-wise modular arithmetic on slot vectors, bound to one modulus.
///
/// All three operations agree bit for bit: `square(v) == multiply(v, v)` and
/// `exponentiate(v, e)` equals any chain of squares and products reaching `e`.
#[derive(Clone, Copy, Debug)]
pub struct BatchArithmetic {
    modulus: Modulus,
}

impl BatchArithmetic {

    /// Creates a new BatchArithmetic. The zero (unset) modulus is rejected.
    pub fn new(modulus: &Modulus) -> Result<Self> {
        if modulus.is_zero() {
            return Err(PowersError::InvalidModulus(0));
        }
        Ok(Self { modulus: *modulus })
    }

    /// The modulus all results are reduced by.
    pub fn modulus(&self) -> &Modulus {&self.modulus}

    /// `values[i] mod q` for every slot.
    pub fn reduce(&self, values: &[u64]) -> Vec<u64> {
        let mut result = vec![0; values.len()];
        batch::modulo(values, &self.modulus, &mut result);
        result
    }

    /// `values[i]^2 mod q` for every slot.
    pub fn square(&self, values: &[u64]) -> Vec<u64> {
        let mut result = vec![0; values.len()];
        batch::square(values, &self.modulus, &mut result);
        result
    }

    /// `a[i] * b[i] mod q` for every slot.
    ///
    /// # Panics
    /// If `a` and `b` have different lengths.
    pub fn multiply(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        let mut result = vec![0; a.len()];
        batch::dyadic_product(a, b, &self.modulus, &mut result);
        result
    }

    /// `values[i]^exponent mod q` for every slot, by binary exponentiation.
    pub fn exponentiate(&self, values: &[u64], exponent: u32) -> Vec<u64> {
        let mut result = vec![0; values.len()];
        batch::exponentiate(values, exponent as u64, &self.modulus, &mut result);
        result
    }

}
