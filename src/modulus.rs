use std::cmp::Ordering;

use serde::{Serialize, Deserialize, Deserializer, Serializer, de::{self, Visitor}};

use crate::{
    util,
    PowersError,
};

/// Represent an integer modulus of up to 61 bits.
///
/// An instance of Modulus represents the plaintext modulus under which the
/// slot values of a query batch and all their powers live. The purpose of this
/// struct is to perform and store the pre-computation required by Barrett reduction.
///
/// The zero modulus exists only as an unset placeholder ([Modulus::default]);
/// every operation of this crate rejects it.
#[derive(Debug, Eq, Clone, Copy, Default)]
pub struct Modulus {
    value: u64,
    const_ratio: [u64; 3],
    bit_count: usize,
}

impl Ord for Modulus {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialOrd for Modulus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Modulus {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Modulus {

    /// Create a new Modulus instance with the given value.
    ///
    /// Panics if the value is 1 or wider than 61 bits. Use [Modulus::try_new]
    /// for values coming from callers or configuration.
    pub fn new(value: u64) -> Self {
        if (value >> util::HE_MOD_BIT_COUNT_MAX != 0) || (value == 1) {
            panic!("[Invalid argument] Value can be at most 61-bit and cannot be 1.");
        }
        Self::from_value(value)
    }

    /// Create a new Modulus, rejecting zero, one and values wider than 61 bits.
    pub fn try_new(value: u64) -> Result<Self, PowersError> {
        if value < 2 || (value >> util::HE_MOD_BIT_COUNT_MAX != 0) {
            return Err(PowersError::InvalidModulus(value));
        }
        Ok(Self::from_value(value))
    }

    fn from_value(value: u64) -> Self {
        if value == 0 {
            return Self::default();
        }
        Modulus {
            value,
            const_ratio: util::barrett_ratio_u128(value),
            bit_count: util::get_significant_bit_count(value),
        }
    }

    /// Calculate the Barrett reduction.
    #[inline]
    pub fn reduce(&self, value: u64) -> u64 {
        util::barrett_reduce_u64(value, self)
    }

    /// Calculate the Barrett reduction on [u128].
    #[inline]
    pub fn reduce_u128(&self, value: u128) -> u64 {
        let value = [value as u64, (value >> 64) as u64];
        util::barrett_reduce_u128(&value, self)
    }

    /// Inner property.
    pub fn const_ratio(&self) -> &[u64; 3] {&self.const_ratio}
    /// The [u64] value.
    pub fn value(&self) -> u64 {self.value}
    /// Is the value zero?
    pub fn is_zero(&self) -> bool {self.value == 0}
    /// How many bits are there in the modulus?
    pub fn bit_count(&self) -> usize {self.bit_count}

}

impl std::fmt::Display for Modulus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Modulus ({})", self.value)
    }
}

impl Serialize for Modulus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where S: Serializer
    {
        serializer.serialize_u64(self.value())
    }
}

impl<'de> Deserialize<'de> for Modulus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de>
    {
        struct U64Visitor;
        impl<'de> Visitor<'de> for U64Visitor {
            type Value = u64;
            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("u64")
            }
            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where E: de::Error, {
                Ok(v)
            }
        }
        let value = deserializer.deserialize_u64(U64Visitor)?;
        Modulus::try_new(value).map_err(de::Error::custom)
    }
}
