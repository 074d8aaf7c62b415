use std::sync::{Arc, Mutex, PoisonError};

use log::trace;
use rand::{Rng, RngCore, SeedableRng};

use crate::{
    util::{self, BlakeRNG, BlakeRNGFactory, PRNGSeed},
    Modulus, PowerEncryptor,
};
use super::{LweContext, LweError, LevelData, LevelId, Result, SecretKey};

/// A batch of LWE samples at one level.
///
/// Only the `b` parts are stored; sample `i` uses the `i`-th block of
/// `dimension` values drawn from a [BlakeRNG] seeded with `seed`.
#[derive(Clone, Debug)]
pub struct LweCiphertext {
    level: usize,
    level_id: LevelId,
    seed: PRNGSeed,
    b: Vec<u64>,
}

impl LweCiphertext {
    /// Level index in the modulus chain.
    pub fn level(&self) -> usize {self.level}
    /// Digest of the level parameters it was encrypted under.
    pub fn level_id(&self) -> &LevelId {&self.level_id}
    /// Seed of the `a` vectors.
    pub fn seed(&self) -> &PRNGSeed {&self.seed}
    /// The `b` part of every sample.
    pub fn data(&self) -> &[u64] {&self.b}
    /// Number of slots.
    pub fn len(&self) -> usize {self.b.len()}
    /// Does it hold no slot?
    pub fn is_empty(&self) -> bool {self.b.is_empty()}
}

// Expands the next `a` vector from `rng` and returns `<a, s> mod q`.
fn next_inner_product(rng: &mut BlakeRNG, secret_key: &SecretKey, modulus: &Modulus) -> u64 {
    secret_key.data().iter().fold(0, |acc, &s| {
        let a = rng.gen_range(0..modulus.value());
        match s {
            1 => util::add_u64_mod(acc, a, modulus),
            -1 => util::add_u64_mod(acc, util::negate_u64_mod(a, modulus), modulus),
            _ => acc,
        }
    })
}

fn check_secret_key(context: &LweContext, secret_key: &SecretKey) -> Result<()> {
    if secret_key.len() != context.parms().dimension() {
        return Err(LweError::InvalidParameters(format!(
            "Secret key length {} does not match dimension {}.",
            secret_key.len(), context.parms().dimension()
        )));
    }
    Ok(())
}

/// Encrypts slot vectors under a secret key.
///
/// Every call draws its own seed and noise from one generator that advances
/// across calls, so no two ciphertexts of an encryptor share their `a` vectors.
pub struct Encryptor {
    context: Arc<LweContext>,
    secret_key: Option<SecretKey>,
    random_generator: Mutex<BlakeRNG>,
}

impl Encryptor {

    /// Creates an encryptor without a key; set one with [Encryptor::set_secret_key].
    pub fn new(context: Arc<LweContext>) -> Self {
        Self::with_factory(context, &BlakeRNGFactory::new())
    }

    fn with_factory(context: Arc<LweContext>, factory: &BlakeRNGFactory) -> Self {
        Self { context, secret_key: None, random_generator: Mutex::new(factory.get_rng()) }
    }

    /// Sets the secret key used for encryption.
    pub fn set_secret_key(mut self, secret_key: SecretKey) -> Self {
        self.secret_key = Some(secret_key);
        self
    }

    /// Draws seeds and noise from `factory` instead of fresh OS randomness.
    ///
    /// Two encryptors with the same seeded factory produce the same sequence
    /// of ciphertexts, call by call.
    pub fn set_rng_factory(mut self, factory: BlakeRNGFactory) -> Self {
        self.random_generator = Mutex::new(factory.get_rng());
        self
    }

    // Splits off the generator of one call. A poisoned lock still holds a usable state.
    fn next_rng(&self) -> BlakeRNG {
        let mut seed = PRNGSeed::default();
        self.random_generator.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .fill_bytes(seed.as_mut());
        BlakeRNG::from_seed(seed)
    }

    /// The context of the encryptor.
    pub fn context(&self) -> &Arc<LweContext> {&self.context}

    /// Encrypts `values`, each below the plain modulus, at `level`.
    pub fn encrypt(&self, values: &[u64], level: usize) -> Result<LweCiphertext> {
        let secret_key = self.secret_key.as_ref().ok_or(LweError::MissingSecretKey)?;
        check_secret_key(&self.context, secret_key)?;
        let level_data = self.context.get_level_data(level)?;
        let plain_modulus = self.context.parms().plain_modulus().value();
        if let Some(&value) = values.iter().find(|&&v| v >= plain_modulus) {
            return Err(LweError::PlainOutOfRange { value, plain_modulus });
        }

        let mut rng = self.next_rng();
        let mut seed = PRNGSeed::default();
        rng.fill_bytes(seed.as_mut());
        let mut a_rng = BlakeRNG::from_seed(seed);
        let b = values.iter()
            .map(|&m| encrypt_slot(&mut a_rng, &mut rng, secret_key, level_data, self.context.parms().noise_bound(), m))
            .collect();
        trace!("encrypted {} slots at level {}", values.len(), level);
        Ok(LweCiphertext { level, level_id: *level_data.level_id(), seed, b })
    }

}

fn encrypt_slot(a_rng: &mut BlakeRNG, noise_rng: &mut BlakeRNG, secret_key: &SecretKey, level_data: &LevelData, noise_bound: u64, m: u64) -> u64 {
    let modulus = level_data.coeff_modulus();
    let inner = next_inner_product(a_rng, secret_key, modulus);
    let noise = noise_rng.gen_range(0..=2 * noise_bound);
    // Shift the noise from [0, 2B] to [-B, B].
    let noise = util::add_u64_mod(noise, util::negate_u64_mod(noise_bound, modulus), modulus);
    let scaled = util::multiply_u64_mod(m, level_data.coeff_div_plain_modulus(), modulus);
    util::add_u64_mod(util::add_u64_mod(inner, noise, modulus), scaled, modulus)
}

impl PowerEncryptor for Encryptor {
    type Ciphertext = LweCiphertext;
    type Error = LweError;

    fn encrypt_at_level(&self, values: &[u64], level: usize) -> Result<LweCiphertext> {
        self.encrypt(values, level)
    }
}

/// Recovers slot vectors with the secret key.
pub struct Decryptor {
    context: Arc<LweContext>,
    secret_key: SecretKey,
}

impl Decryptor {

    /// Creates a decryptor for `secret_key`.
    pub fn new(context: Arc<LweContext>, secret_key: SecretKey) -> Self {
        Self { context, secret_key }
    }

    /// Decrypts every slot as `round(t * (b - <a, s>) / q) mod t`.
    pub fn decrypt(&self, encrypted: &LweCiphertext) -> Result<Vec<u64>> {
        check_secret_key(&self.context, &self.secret_key)?;
        let level_data = self.context.get_level_data(encrypted.level())?;
        if level_data.level_id() != encrypted.level_id() {
            return Err(LweError::LevelMismatch(encrypted.level()));
        }
        let modulus = level_data.coeff_modulus();
        let q = modulus.value() as u128;
        let t = self.context.parms().plain_modulus().value() as u128;
        let mut a_rng = BlakeRNG::from_seed(*encrypted.seed());
        let result = encrypted.data().iter().map(|&b| {
            let inner = next_inner_product(&mut a_rng, &self.secret_key, modulus);
            let phase = util::add_u64_mod(b, util::negate_u64_mod(inner, modulus), modulus) as u128;
            (((phase * t + q / 2) / q) % t) as u64
        }).collect();
        Ok(result)
    }

}
