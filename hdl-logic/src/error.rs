//! Value-domain error definitions

use thiserror::Error;

/// Runtime error variants of the value domain.
///
/// Every fallible operation on scalars, spans, vectors and timestamps
/// reports one of these at the failing call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LogicError {
    /// The source value cannot be interpreted as the requested type.
    #[error("`{0}`: not a valid value")]
    BadValue(String),
    /// An index fell outside the span of the indexed value.
    #[error("index {0}: out of bounds")]
    OutOfBounds(isize),
    /// A value was wider than the span it was assigned to.
    #[error("value of {actual} bits does not fit in {expected} bits")]
    LengthMismatch {
        /// Width of the target span.
        expected: usize,
        /// Width of the offered value.
        actual: usize,
    },
    /// Integer division or remainder with an all-zero divisor.
    #[error("division by zero")]
    DivisionByZero,
    /// The vector holds high-impedance or unknown bits and therefore has no
    /// integer value.
    #[error("vector contains high-impedance or unknown bits")]
    UnknownBits,
    /// Two values of incompatible flavors were combined.
    #[error("incompatible vector flavors")]
    TypeMismatch,
}
