//! Core state machine types.
//!
//! This module contains the declarative vocabulary of the machine:
//! - State definitions via the `State` trait
//! - One-or-many state sets
//! - Transitions between states
//! - Per-state lifecycle hooks
//!
//! Nothing in here runs a transition; that is the job of
//! [`StateMachine`](crate::machine::StateMachine).

mod hooks;
mod state;
mod state_set;
mod transition;

pub use hooks::{
    bind_hook_handler, handlers_for, hook_handler, HookBinding, HookHandler, HookResult,
    HookType, StateHook,
};
pub use state::State;
pub use state_set::StateSet;
pub use transition::Transition;
