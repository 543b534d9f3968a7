//! Event-driven simulator for the HDL part model.
//!
//! A circuit is described as a tree of *parts*: named signals holding
//! [`hdl_logic`] values, reactive *blocks* that compute on them, and nested
//! sub-parts. Part types are declared once against a [`Design`] registry;
//! the [`Sim`] walks an instantiated part tree, turns every block into a
//! cooperative task and drives the tasks over virtual picosecond time until
//! no task is ready and no delay is outstanding.

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![deny(unused_must_use)]

mod block;
mod error;
mod part;
mod sim;
mod task;
mod value;
mod wait;

pub use block::{BlockBody, Condition, IntoDelay, Step};
pub use error::SimError;
pub use part::{Design, InstanceId, PartBuilder, PartType, PartTypeId, SignalRef};
pub use sim::{Frame, Sim};
pub use value::{SignalKind, Value};
pub use wait::Wait;
