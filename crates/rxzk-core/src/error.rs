//! # Error Types
//!
//! Errors raised by the foundational types. All use `thiserror`; higher
//! crates wrap them with `#[from]` rather than stringly re-raising.

use thiserror::Error;

/// Top-level error type for `rxzk-core`.
#[derive(Error, Debug)]
pub enum RxzkError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A field element could not be parsed or encoded.
    #[error("field error: {0}")]
    Field(#[from] FieldError),

    /// A signal assignment is malformed.
    #[error("signal error: {0}")]
    Signal(#[from] SignalError),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Floats have no field-element interpretation and no stable JCS form.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error parsing a decimal-encoded field element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The input string was empty.
    #[error("empty field element literal")]
    Empty,

    /// The input contained something other than ASCII digits.
    #[error("field element literal is not a decimal integer: {0:?}")]
    NonDecimal(String),

    /// The value is not less than the BN254 scalar field modulus.
    #[error("field element literal exceeds the field modulus: {0}")]
    OutOfRange(String),
}

/// Error in a signal assignment or public input vector.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// A signal required by the circuit has no value.
    #[error("missing value for signal {0:?}")]
    Missing(String),

    /// The assignment names a signal the circuit does not declare.
    #[error("unknown signal {0:?}")]
    Unknown(String),

    /// The value assigned to a signal is not a field element.
    #[error("invalid value for signal {name:?}: {source}")]
    InvalidValue {
        /// Signal name.
        name: String,
        /// Parse failure.
        source: FieldError,
    },

    /// A JSON value that has no exact decimal reading: a negative or
    /// fractional number, an integer past `u64`, or a non-scalar.
    #[error(
        "invalid value for signal {name:?}: {found} is not a non-negative integer below 2^64; \
         write field elements as a decimal string"
    )]
    UnsupportedLiteral {
        /// Signal name.
        name: String,
        /// The offending JSON value as written back out.
        found: String,
    },

    /// A coordinate index outside the public input vector.
    #[error("public input coordinate {index} out of range for vector of length {len}")]
    CoordinateOutOfRange {
        /// Requested index.
        index: usize,
        /// Vector length.
        len: usize,
    },
}
