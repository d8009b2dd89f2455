//! The runtime state machine.
//!
//! [`StateMachine`] owns a [`Config`] and the current state, resolves
//! transitions and runs the hook and event pipeline for each of them.

mod config;
mod engine;
mod error;
mod options;
mod projection;

pub use config::{Config, ConfigUpdate};
pub use engine::StateMachine;
pub use error::MachineError;
pub use options::TransitOptions;
pub use projection::StateInfo;
