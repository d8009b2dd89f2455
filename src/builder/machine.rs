//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{
    bind_hook_handler, hook_handler, HookBinding, HookResult, HookType, State, StateSet,
    Transition,
};
use crate::events::{GenericEventHandler, InvalidTransitionHandler, StateEventHandler};
use crate::machine::{Config, StateMachine};
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
pub struct StateMachineBuilder<S: State> {
    initial: Option<S>,
    transitions: Vec<Transition<S>>,
    can_self_loop: bool,
    hooks: Vec<HookBinding<S>>,
    on_before_every: Option<GenericEventHandler<S>>,
    on_after_every: Option<GenericEventHandler<S>>,
    on_invalid: Option<InvalidTransitionHandler<S>>,
    on_enter: Option<StateEventHandler<S>>,
    on_leave: Option<StateEventHandler<S>>,
}

impl<S: State> StateMachineBuilder<S> {
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: Vec::new(),
            can_self_loop: false,
            hooks: Vec::new(),
            on_before_every: None,
            on_after_every: None,
            on_invalid: None,
            on_enter: None,
            on_leave: None,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once. Declaration order is kept.
    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Allow transitions from a state to itself without declaring them.
    pub fn can_self_loop(mut self, enabled: bool) -> Self {
        self.can_self_loop = enabled;
        self
    }

    /// Bind a hook to one or many states.
    pub fn hook<F, R>(
        mut self,
        states: impl Into<StateSet<S>>,
        hook_type: HookType,
        handler: F,
    ) -> Self
    where
        F: Fn(&StateMachine<S>) -> R + Send + Sync + 'static,
        R: Into<HookResult>,
    {
        bind_hook_handler(&mut self.hooks, states.into(), hook_type, hook_handler(handler));
        self
    }

    /// Append pre-built hook bindings.
    pub fn hooks(mut self, bindings: Vec<HookBinding<S>>) -> Self {
        self.hooks.extend(bindings);
        self
    }

    pub fn on_before_every_transition<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>) + Send + Sync + 'static,
    {
        self.on_before_every = Some(Arc::new(handler));
        self
    }

    pub fn on_after_every_transition<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>) + Send + Sync + 'static,
    {
        self.on_after_every = Some(Arc::new(handler));
        self
    }

    /// Called with `(machine, current, target)` when a requested transition does not exist.
    ///
    /// `target` is `None` when a named transition had no reachable destination.
    pub fn on_invalid_transition<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>, Option<&S>, Option<&S>) + Send + Sync + 'static,
    {
        self.on_invalid = Some(Arc::new(handler));
        self
    }

    pub fn on_state_enter<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>, &S) + Send + Sync + 'static,
    {
        self.on_enter = Some(Arc::new(handler));
        self
    }

    pub fn on_state_leave<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StateMachine<S>, &S) + Send + Sync + 'static,
    {
        self.on_leave = Some(Arc::new(handler));
        self
    }

    /// Build the configuration without creating a machine.
    pub fn build_config(self) -> Result<Config<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        let mut config = Config::new(initial);
        config.transitions = self.transitions;
        config.can_self_loop = self.can_self_loop;
        config.hooks = Some(self.hooks);
        config.on_before_every_transition = self.on_before_every;
        config.on_after_every_transition = self.on_after_every;
        config.on_invalid_transition = self.on_invalid;
        config.on_state_enter = self.on_enter;
        config.on_state_leave = self.on_leave;
        Ok(config)
    }

    /// Build the state machine. It still has to be initialized.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        self.build_config().map(StateMachine::new)
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::transition;
    use crate::state_enum;
    use std::sync::atomic::{AtomicUsize, Ordering};

    state_enum! {
        enum TestState {
            Initial,
            Processing,
            Complete,
            Failed,
        }
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = StateMachineBuilder::<TestState>::new().build();
        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn transition_builder_errors_propagate() {
        let result = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(TransitionBuilder::new().from(TestState::Initial));

        assert!(matches!(result, Err(BuildError::MissingToState)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Initial)
                    .to(TestState::Processing),
            )
            .unwrap()
            .add_transition(transition(
                TestState::Processing,
                [TestState::Complete, TestState::Failed],
            ))
            .build()
            .unwrap();

        machine.initialize().unwrap();
        assert_eq!(machine.get_state(), Ok(TestState::Initial));
        assert_eq!(machine.get_all_transitions().unwrap().len(), 2);
    }

    #[test]
    fn config_carries_hooks_and_events() {
        let config = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .can_self_loop(true)
            .hook([TestState::Initial, TestState::Failed], HookType::OnBeforeLeave, |_| true)
            .hook(TestState::Initial, HookType::OnAfterEnter, |_| true)
            .on_state_enter(|_, _| {})
            .build_config()
            .unwrap();

        let hooks = config.hooks.as_ref().unwrap();
        assert!(config.can_self_loop);
        assert_eq!(hooks.len(), 2);
        assert_eq!(hooks[0].handlers.len(), 2);
        assert!(config.on_state_enter.is_some());
        assert!(config.on_state_leave.is_none());
    }

    #[test]
    fn events_fire_on_initialization() {
        let calls = Arc::new(AtomicUsize::new(0));
        let before = Arc::clone(&calls);
        let after = Arc::clone(&calls);

        let machine = StateMachineBuilder::new()
            .initial(TestState::Initial)
            .on_before_every_transition(move |_| {
                before.fetch_add(1, Ordering::SeqCst);
            })
            .on_after_every_transition(move |_| {
                after.fetch_add(10, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        machine.initialize().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 11);
    }
}
