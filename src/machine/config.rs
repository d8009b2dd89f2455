//! Machine configuration and shallow updates.

use crate::core::{HookBinding, State, Transition};
use crate::events::{GenericEventHandler, InvalidTransitionHandler, StateEventHandler};
use std::fmt;

/// Configuration owned by a [`StateMachine`](super::StateMachine).
///
/// `get_config()` hands out clones, so a config can be inspected and
/// reused without aliasing the machine.
#[derive(Clone)]
pub struct Config<S: State> {
    pub initial_state: S,
    pub transitions: Vec<Transition<S>>,
    /// Allow a transition from any state to itself without declaring it
    pub can_self_loop: bool,
    /// `None` means unset; binding a hook populates it again
    pub hooks: Option<Vec<HookBinding<S>>>,
    pub on_before_every_transition: Option<GenericEventHandler<S>>,
    pub on_after_every_transition: Option<GenericEventHandler<S>>,
    pub on_invalid_transition: Option<InvalidTransitionHandler<S>>,
    pub on_state_enter: Option<StateEventHandler<S>>,
    pub on_state_leave: Option<StateEventHandler<S>>,
}

impl<S: State> Config<S> {
    /// A config with no transitions, hooks or events.
    pub fn new(initial_state: S) -> Self {
        Self {
            initial_state,
            transitions: Vec::new(),
            can_self_loop: false,
            hooks: Some(Vec::new()),
            on_before_every_transition: None,
            on_after_every_transition: None,
            on_invalid_transition: None,
            on_state_enter: None,
            on_state_leave: None,
        }
    }

    /// Overwrite every field set in `update`, leaving the others untouched.
    pub fn apply(&mut self, update: ConfigUpdate<S>) {
        let ConfigUpdate {
            initial_state,
            transitions,
            can_self_loop,
            hooks,
            on_before_every_transition,
            on_after_every_transition,
            on_invalid_transition,
            on_state_enter,
            on_state_leave,
        } = update;

        if let Some(initial_state) = initial_state {
            self.initial_state = initial_state;
        }
        if let Some(transitions) = transitions {
            self.transitions = transitions;
        }
        if let Some(can_self_loop) = can_self_loop {
            self.can_self_loop = can_self_loop;
        }
        if let Some(hooks) = hooks {
            self.hooks = hooks;
        }
        if let Some(handler) = on_before_every_transition {
            self.on_before_every_transition = handler;
        }
        if let Some(handler) = on_after_every_transition {
            self.on_after_every_transition = handler;
        }
        if let Some(handler) = on_invalid_transition {
            self.on_invalid_transition = handler;
        }
        if let Some(handler) = on_state_enter {
            self.on_state_enter = handler;
        }
        if let Some(handler) = on_state_leave {
            self.on_state_leave = handler;
        }
    }
}

impl<S: State> fmt::Debug for Config<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("initial_state", &self.initial_state)
            .field("transitions", &self.transitions)
            .field("can_self_loop", &self.can_self_loop)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// A partial config for [`StateMachine::update_config`](super::StateMachine::update_config).
///
/// Outer `None` keeps the current value. For optional fields, `Some(None)`
/// clears it.
pub struct ConfigUpdate<S: State> {
    pub initial_state: Option<S>,
    pub transitions: Option<Vec<Transition<S>>>,
    pub can_self_loop: Option<bool>,
    pub hooks: Option<Option<Vec<HookBinding<S>>>>,
    pub on_before_every_transition: Option<Option<GenericEventHandler<S>>>,
    pub on_after_every_transition: Option<Option<GenericEventHandler<S>>>,
    pub on_invalid_transition: Option<Option<InvalidTransitionHandler<S>>>,
    pub on_state_enter: Option<Option<StateEventHandler<S>>>,
    pub on_state_leave: Option<Option<StateEventHandler<S>>>,
}

impl<S: State> Default for ConfigUpdate<S> {
    fn default() -> Self {
        Self {
            initial_state: None,
            transitions: None,
            can_self_loop: None,
            hooks: None,
            on_before_every_transition: None,
            on_after_every_transition: None,
            on_invalid_transition: None,
            on_state_enter: None,
            on_state_leave: None,
        }
    }
}

impl<S: State> ConfigUpdate<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    pub fn transitions(mut self, transitions: Vec<Transition<S>>) -> Self {
        self.transitions = Some(transitions);
        self
    }

    pub fn can_self_loop(mut self, enabled: bool) -> Self {
        self.can_self_loop = Some(enabled);
        self
    }

    pub fn hooks(mut self, hooks: Vec<HookBinding<S>>) -> Self {
        self.hooks = Some(Some(hooks));
        self
    }

    /// Unset the hook bindings entirely.
    pub fn clear_hooks(mut self) -> Self {
        self.hooks = Some(None);
        self
    }

    pub fn on_before_every_transition(mut self, handler: Option<GenericEventHandler<S>>) -> Self {
        self.on_before_every_transition = Some(handler);
        self
    }

    pub fn on_after_every_transition(mut self, handler: Option<GenericEventHandler<S>>) -> Self {
        self.on_after_every_transition = Some(handler);
        self
    }

    pub fn on_invalid_transition(mut self, handler: Option<InvalidTransitionHandler<S>>) -> Self {
        self.on_invalid_transition = Some(handler);
        self
    }

    pub fn on_state_enter(mut self, handler: Option<StateEventHandler<S>>) -> Self {
        self.on_state_enter = Some(handler);
        self
    }

    pub fn on_state_leave(mut self, handler: Option<StateEventHandler<S>>) -> Self {
        self.on_state_leave = Some(handler);
        self
    }
}
