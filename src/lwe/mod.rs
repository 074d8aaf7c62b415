//! A small secret-key LWE scheme with a modulus chain.
//!
//! Each slot of a batch becomes one LWE sample `(a, b = <a, s> + e + Δm)` under
//! the modulus of the requested level. The `a` vectors are not stored: they
//! are expanded from a seed kept in the ciphertext. This is the in-tree
//! [PowerEncryptor](crate::PowerEncryptor) used to test the power engine end
//! to end. The parameters carry no security claim.
//!
//! ```rust
//! use psu_powers::Modulus;
//! use psu_powers::lwe::*;
//! let parms = LweParameters::new()
//!     .set_dimension(64)
//!     .set_plain_modulus(Modulus::new(65537))
//!     .set_coeff_modulus(vec![Modulus::new(0x7fffffd8001)])
//!     .set_noise_bound(16);
//! let context = LweContext::new(parms).unwrap();
//! let keygen = KeyGenerator::new(context.clone());
//! let encryptor = Encryptor::new(context.clone()).set_secret_key(keygen.secret_key().clone());
//! let decryptor = Decryptor::new(context, keygen.secret_key().clone());
//! let cipher = encryptor.encrypt(&[1, 2, 65536], 0).unwrap();
//! assert_eq!(decryptor.decrypt(&cipher).unwrap(), vec![1, 2, 65536]);
//! ```

mod context;
mod key;
mod encryptor;

pub use context::{LweParameters, LweContext, LevelData, LevelId};
pub use key::{KeyGenerator, SecretKey};
pub use encryptor::{Encryptor, Decryptor, LweCiphertext};

use thiserror::Error;

/// Failures of the LWE backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LweError {
    /// The parameters cannot give exact decryption, or are incomplete.
    #[error("[Invalid argument] {0}")]
    InvalidParameters(String),
    /// No level with this index in the modulus chain.
    #[error("[Invalid argument] Level {0} is not in the modulus chain.")]
    InvalidLevel(usize),
    /// A slot value is not reduced modulo the plaintext modulus.
    #[error("[Invalid argument] Value {value} is not below plain modulus {plain_modulus}.")]
    PlainOutOfRange {
        /// The offending value.
        value: u64,
        /// The plaintext modulus.
        plain_modulus: u64,
    },
    /// The encryptor has no secret key set.
    #[error("[Logic error] Secret key is not set.")]
    MissingSecretKey,
    /// The ciphertext was produced under different parameters for its level.
    #[error("[Invalid argument] Ciphertext level {0} does not match the context.")]
    LevelMismatch(usize),
}

/// Result alias of the LWE backend.
pub type Result<T> = std::result::Result<T, LweError>;
