//! Simulator error definitions

use hdl_logic::LogicError;
use thiserror::Error;

/// Runtime error variants of the part model and simulator.
///
/// Errors raised inside a block body abort the simulation run; the
/// simulator never swallows them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A value-domain operation failed.
    #[error(transparent)]
    Logic(#[from] LogicError),
    /// The named signal or type is not a registered part.
    #[error("`{0}`: not a part")]
    NotAPart(String),
    /// A `when` condition named something that is not an identifier.
    #[error("{condition}=`{name}`: not an identifier")]
    BadCondition {
        /// Which condition carried the bad name.
        condition: &'static str,
        /// The offending name.
        name: String,
    },
    /// A part has no signal under the given name.
    #[error("part `{part}` has no signal `{name}`")]
    UnknownSignal {
        /// The part type name.
        part: String,
        /// The missing signal name.
        name: String,
    },
    /// The signal is a constant and cannot be written.
    #[error("signal `{name}` of part `{part}` is constant")]
    ImmutableSignal {
        /// The part type name.
        part: String,
        /// The constant signal name.
        name: String,
    },
}
