use std::sync::Arc;

use rand::Rng;

use crate::util::BlakeRNGFactory;
use super::LweContext;

/// A ternary secret vector with coefficients in `{-1, 0, 1}`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretKey {
    data: Vec<i8>,
}

impl SecretKey {

    /// Wraps an existing ternary vector.
    ///
    /// # Panics
    /// If a coefficient is outside `{-1, 0, 1}`.
    pub fn new(data: Vec<i8>) -> Self {
        assert!(data.iter().all(|x| (-1..=1).contains(x)), "[Invalid argument] Secret key must be ternary.");
        Self { data }
    }

    /// The coefficients of the secret.
    pub fn data(&self) -> &[i8] {&self.data}

    /// Length of the secret.
    pub fn len(&self) -> usize {self.data.len()}

    /// Is the secret empty?
    pub fn is_empty(&self) -> bool {self.data.is_empty()}

}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretKey(len = {})", self.data.len())
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.data.fill(0);
    }
}

/// Samples the secret key of a context.
pub struct KeyGenerator {
    context: Arc<LweContext>,
    secret_key: SecretKey,
}

impl KeyGenerator {

    /// Samples a fresh uniform ternary secret.
    pub fn new(context: Arc<LweContext>) -> Self {
        Self::with_factory(context, &BlakeRNGFactory::new())
    }

    /// Samples the secret from `factory`; a seeded factory gives a reproducible key.
    pub fn with_factory(context: Arc<LweContext>, factory: &BlakeRNGFactory) -> Self {
        let mut rng = factory.get_rng();
        let data = (0..context.parms().dimension())
            .map(|_| rng.gen_range(-1i8..=1))
            .collect();
        Self { context, secret_key: SecretKey { data } }
    }

    /// The context used by the generator.
    pub fn context(&self) -> &Arc<LweContext> {&self.context}

    /// The secret key.
    pub fn secret_key(&self) -> &SecretKey {&self.secret_key}

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Modulus, lwe::LweParameters, util::PRNGSeed};

    fn context() -> Arc<LweContext> {
        LweContext::new(LweParameters::new()
            .set_dimension(256)
            .set_plain_modulus(Modulus::new(17))
            .set_coeff_modulus(vec![Modulus::new(1 << 30)])
            .set_noise_bound(2)
        ).unwrap()
    }

    #[test]
    fn test_keygen() {
        let keygen = KeyGenerator::new(context());
        let sk = keygen.secret_key();
        assert_eq!(sk.len(), 256);
        assert!(sk.data().iter().all(|x| (-1..=1).contains(x)));
        // All three values show up in a secret of this length.
        for v in [-1, 0, 1] {
            assert!(sk.data().contains(&v));
        }
        assert_eq!(format!("{:?}", sk), "SecretKey(len = 256)");
    }

    #[test]
    fn test_keygen_seeded() {
        let factory = BlakeRNGFactory::from_seed(PRNGSeed([7; 64]));
        let a = KeyGenerator::with_factory(context(), &factory);
        let b = KeyGenerator::with_factory(context(), &factory);
        assert_eq!(a.secret_key(), b.secret_key());
        assert_ne!(a.secret_key(), KeyGenerator::new(context()).secret_key());
    }

    #[test]
    #[should_panic(expected = "ternary")]
    fn test_secret_key_not_ternary() {
        SecretKey::new(vec![0, 2]);
    }
}
