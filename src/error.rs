use thiserror::Error;

use crate::PowerRule;

/// Errors raised while validating a power graph or computing the plaintext powers.
///
/// Every variant except [PowersError::Json] marks a broken contract between the
/// caller (or the graph planner) and this crate. They are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PowersError {
    #[error("invalid modulus {0}: must be between 2 and 2^61 - 1")]
    /// The modulus is zero, one or too wide.
    InvalidModulus(u64),
    #[error("batch is empty")]
    /// No slot values were supplied.
    EmptyBatch,
    #[error("batch of {len} values exceeds slot count {slot_count}")]
    /// More values than the configured slot count.
    BatchTooLarge {
        /// Number of supplied values.
        len: usize,
        /// Configured slot count.
        slot_count: usize,
    },
    #[error("power 0 is not a valid exponent")]
    /// Exponent zero was used as a node or target.
    ZeroPower,
    #[error("power {0} is declared more than once")]
    /// The same exponent was declared or computed twice.
    DuplicatePower(u32),
    #[error("power 1 must be a source node")]
    /// The seed exponent was given a derivation rule.
    InvalidSeed,
    #[error("power {power} depends on power {parent}, which is not available")]
    /// A parent exponent is missing from the graph or the table.
    MissingSource {
        /// Node being computed.
        power: u32,
        /// Absent parent.
        parent: u32,
    },
    #[error("dependency cycle among powers {0:?}")]
    /// The graph cannot be ordered topologically.
    CyclicDependency(Vec<u32>),
    #[error("rule {rule:?} does not produce power {power}")]
    /// The rule's exponents do not add up to the node's exponent.
    InconsistentRule {
        /// Node carrying the rule.
        power: u32,
        /// The offending rule.
        rule: PowerRule,
    },
    #[error("output power {0} is not a node of the graph")]
    /// An exported exponent is never computed.
    UnknownOutput(u32),
    #[error("graph source powers {actual:?} differ from configured query powers {expected:?}")]
    /// The graph was planned for a different set of query powers.
    SourceMismatch {
        /// Query powers from the parameters.
        expected: Vec<u32>,
        /// Source powers of the graph.
        actual: Vec<u32>,
    },
    #[error("invalid parameters: {0}")]
    /// Configuration failed validation.
    InvalidParameters(String),
    #[error("json error: {0}")]
    /// Configuration could not be (de)serialized.
    Json(String),
}

impl From<serde_json::Error> for PowersError {
    fn from(err: serde_json::Error) -> Self {
        PowersError::Json(err.to_string())
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, PowersError>;
