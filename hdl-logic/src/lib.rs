//! Atomic value types of the HDL simulator.
//!
//! This crate implements the value domain every other part of the simulator
//! operates in: the four-valued logic scalar [`Logic`], fixed-width logic
//! vectors ([`Logvec`]) with plain, unsigned and signed flavors, the
//! high-to-low index [`Span`] shared by all vectors, and the picosecond
//! [`Timestamp`] used for virtual time.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod error;
mod logic;
mod logvec;
mod span;
mod timestamp;

pub use error::LogicError;
pub use logic::Logic;
pub use logvec::{Flavor, Logvec, Plain, Signed, Unsigned};
pub use span::Span;
pub use timestamp::Timestamp;
