//! Global and per-transition events.
//!
//! Events are fired through [`bind`], which only invokes a handler when one
//! is configured and the gating condition is truthy.

mod dispatch;
mod handlers;

pub use dispatch::{bind, Callback, Event, Truthy};
pub use handlers::{
    GenericEventHandler, InvalidTransitionHandler, StateEventHandler, TransitionEventHandler,
};
