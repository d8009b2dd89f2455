//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{State, StateSet, Transition};
use crate::events::TransitionEventHandler;
use crate::machine::StateMachine;
use std::sync::Arc;

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<S: State> {
    from: Option<StateSet<S>>,
    to: Option<StateSet<S>>,
    name: Option<String>,
    on_before: Option<TransitionEventHandler<S>>,
    on_after: Option<TransitionEventHandler<S>>,
}

impl<S: State> TransitionBuilder<S> {
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            name: None,
            on_before: None,
            on_after: None,
        }
    }

    /// Set the source state or states (required).
    pub fn from(mut self, states: impl Into<StateSet<S>>) -> Self {
        self.from = Some(states.into());
        self
    }

    /// Set the target state or states (required).
    pub fn to(mut self, states: impl Into<StateSet<S>>) -> Self {
        self.to = Some(states.into());
        self
    }

    /// Name the transition so it can be taken with `transit_by_name`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Called with `(machine, from, to)` before the transition leaves `from`.
    pub fn on_before<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>, &S, &S) + Send + Sync + 'static,
    {
        self.on_before = Some(Arc::new(handler));
        self
    }

    /// Called with `(machine, from, to)` once `to` has been entered.
    pub fn on_after<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>, &S, &S) + Send + Sync + 'static,
    {
        self.on_after = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Transition<S>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        Ok(Transition {
            from,
            to,
            name: self.name,
            on_before_transition: self.on_before,
            on_after_transition: self.on_after,
        })
    }
}

impl<S: State> Default for TransitionBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
