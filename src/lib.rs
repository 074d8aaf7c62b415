//! Sender-side power computation for homomorphic set intersection and union.
//!
//! The receiver of a PSI/PSU query packs its items into slot batches. Before
//! encrypting, each batch must be raised to every exponent the sender's
//! polynomial evaluation needs. Which exponents, and how each is derived from
//! smaller ones, is fixed by a [PowersDag]. [PlaintextPowers] evaluates that
//! graph element-wise modulo the plaintext modulus and then hands the exported
//! powers to any [PowerEncryptor], each at the level chosen by a [LevelMap].
//!
//! ```rust
//! use psu_powers::*;
//! use psu_powers::lwe::*;
//!
//! let t = Modulus::new(65537);
//! let dag = PowersDag::new(
//!     vec![(2, PowerRule::Square(1)), (3, PowerRule::Multiply(1, 2)), (4, PowerRule::Square(2))],
//!     vec![1, 3, 4],
//! ).unwrap();
//! let powers = PlaintextPowers::new(vec![3, 5, 7], &t, &dag).unwrap();
//! assert_eq!(powers.power(4), Some(&[81, 625, 2401][..]));
//!
//! let context = LweContext::new(LweParameters::new()
//!     .set_dimension(64)
//!     .set_plain_modulus(t)
//!     .set_coeff_modulus(vec![Modulus::new(0x7fffffd8001)])
//!     .set_noise_bound(16)
//! ).unwrap();
//! let keygen = KeyGenerator::new(context.clone());
//! let encryptor = Encryptor::new(context.clone()).set_secret_key(keygen.secret_key().clone());
//! let encrypted = powers.encrypt(&encryptor, &LevelMap::default()).unwrap();
//! assert_eq!(encrypted.len(), 3);
//!
//! let decryptor = Decryptor::new(context, keygen.secret_key().clone());
//! assert_eq!(decryptor.decrypt(&encrypted[&3]).unwrap(), vec![27, 125, 343]);
//! ```

#![warn(missing_docs)]

mod modulus;
mod error;
mod powers_dag;
mod batch_arithmetic;
mod encryption;
mod params;
mod plaintext_powers;

pub mod util;
pub mod lwe;

pub use modulus::Modulus;
pub use error::{PowersError, Result};
pub use powers_dag::{PowerRule, PowersNode, PowersDag};
pub use batch_arithmetic::BatchArithmetic;
pub use encryption::{PowerEncryptor, LevelMap, EncryptedPowers};
pub use params::PowersParams;
pub use plaintext_powers::PlaintextPowers;
