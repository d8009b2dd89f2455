//! Per-state lifecycle hooks.
//!
//! A hook is bound to one state and one [`HookType`]. It runs while the
//! machine leaves or enters that state and can veto the transition by
//! resolving to `false`.

use super::state::State;
use super::state_set::StateSet;
use crate::machine::StateMachine;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// The lifecycle phases a hook can be bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookType {
    /// Before leaving a state; a veto keeps the machine where it is
    OnBeforeLeave,
    /// After the state has been left
    OnAfterLeave,
    /// Before entering a state
    OnBeforeEnter,
    /// After the state has been entered
    OnAfterEnter,
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnBeforeLeave => "OnBeforeLeave",
            Self::OnAfterLeave => "OnAfterLeave",
            Self::OnBeforeEnter => "OnBeforeEnter",
            Self::OnAfterEnter => "OnAfterEnter",
        };
        f.write_str(name)
    }
}

/// Outcome of a hook invocation.
///
/// `Ready` results are usable from every entry point. `Pending` results
/// are only accepted by the `*_async` operations of the machine.
///
/// A pending verdict is `'static` and cannot borrow the machine passed to
/// the hook. Read what the verdict needs before returning the future, or
/// capture a [`Weak`](std::sync::Weak) handle to a machine held in an `Arc`.
pub enum HookResult {
    Ready(bool),
    Pending(BoxFuture<'static, bool>),
}

impl HookResult {
    /// Wrap a future resolving to the hook verdict.
    ///
    /// ```rust
    /// use std::sync::{Arc, Weak};
    /// use typed_fsm::builder::{transition, StateMachineBuilder};
    /// use typed_fsm::core::{HookResult, HookType};
    /// use typed_fsm::machine::StateMachine;
    ///
    /// let machine = Arc::new(
    ///     StateMachineBuilder::new()
    ///         .initial("idle".to_string())
    ///         .transitions(vec![transition("idle".to_string(), "busy".to_string())])
    ///         .build()
    ///         .unwrap(),
    /// );
    /// let handle: Weak<StateMachine<String>> = Arc::downgrade(&machine);
    /// machine.bind_hook_handler("busy".to_string(), HookType::OnBeforeEnter, move |_| {
    ///     let handle = handle.clone();
    ///     HookResult::pending(async move {
    ///         handle.upgrade().is_some_and(|machine| machine.is_pending())
    ///     })
    /// });
    /// ```
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = bool> + Send + 'static,
    {
        Self::Pending(Box::pin(future))
    }
}

impl From<bool> for HookResult {
    fn from(value: bool) -> Self {
        Self::Ready(value)
    }
}

impl fmt::Debug for HookResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// Handler invoked for a `(state, hook type)` pair.
pub type HookHandler<S> = Arc<dyn Fn(&StateMachine<S>) -> HookResult + Send + Sync>;

/// Wrap a closure returning anything convertible into a [`HookResult`].
pub fn hook_handler<S, F, R>(handler: F) -> HookHandler<S>
where
    S: State,
    F: Fn(&StateMachine<S>) -> R + Send + Sync + 'static,
    R: Into<HookResult>,
{
    Arc::new(move |machine: &StateMachine<S>| -> HookResult { handler(machine).into() })
}

/// A single handler with the phase it runs in.
#[derive(Clone)]
pub struct StateHook<S: State> {
    pub hook_type: HookType,
    pub handler: HookHandler<S>,
}

impl<S: State> fmt::Debug for StateHook<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHook")
            .field("hook_type", &self.hook_type)
            .finish_non_exhaustive()
    }
}

/// The hooks registered for one state.
#[derive(Clone, Debug)]
pub struct HookBinding<S: State> {
    pub state: S,
    pub handlers: Vec<StateHook<S>>,
}

impl<S: State> HookBinding<S> {
    /// Create a binding without handlers.
    pub fn new(state: S) -> Self {
        Self {
            state,
            handlers: Vec::new(),
        }
    }

    /// Add a handler, builder style.
    pub fn on(mut self, hook_type: HookType, handler: HookHandler<S>) -> Self {
        self.bind(hook_type, handler);
        self
    }

    /// Set the handler for `hook_type`, replacing a previous one.
    pub fn bind(&mut self, hook_type: HookType, handler: HookHandler<S>) {
        match self.handlers.iter_mut().find(|h| h.hook_type == hook_type) {
            Some(existing) => existing.handler = handler,
            None => self.handlers.push(StateHook { hook_type, handler }),
        }
    }

    /// The handler bound for `hook_type`, if any.
    pub fn handler(&self, hook_type: HookType) -> Option<&HookHandler<S>> {
        self.handlers
            .iter()
            .find(|h| h.hook_type == hook_type)
            .map(|h| &h.handler)
    }
}

/// Bind `handler` to every state of `states`.
///
/// The first binding of each state is updated in place; states without a
/// binding get a new one appended.
pub fn bind_hook_handler<S: State>(
    bindings: &mut Vec<HookBinding<S>>,
    states: StateSet<S>,
    hook_type: HookType,
    handler: HookHandler<S>,
) {
    for state in states.into_vec() {
        match bindings.iter_mut().find(|b| b.state == state) {
            Some(binding) => binding.bind(hook_type, Arc::clone(&handler)),
            None => bindings.push(HookBinding::new(state).on(hook_type, Arc::clone(&handler))),
        }
    }
}

/// Collect every handler registered for `(state, hook_type)`, in declaration order.
pub fn handlers_for<S: State>(
    bindings: &[HookBinding<S>],
    state: &S,
    hook_type: HookType,
) -> Vec<HookHandler<S>> {
    bindings
        .iter()
        .filter(|b| b.state == *state)
        .flat_map(|b| b.handlers.iter())
        .filter(|h| h.hook_type == hook_type)
        .map(|h| Arc::clone(&h.handler))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Phase {
            Idle,
            Busy,
            Done,
        }
    }

    fn always(value: bool) -> HookHandler<Phase> {
        hook_handler(move |_: &StateMachine<Phase>| value)
    }

    #[test]
    fn binding_creates_missing_states() {
        let mut bindings = Vec::new();

        bind_hook_handler(
            &mut bindings,
            StateSet::from([Phase::Idle, Phase::Busy]),
            HookType::OnBeforeLeave,
            always(true),
        );

        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].state, Phase::Idle);
        assert_eq!(bindings[1].state, Phase::Busy);
        assert!(bindings[1].handler(HookType::OnBeforeLeave).is_some());
    }

    #[test]
    fn rebinding_replaces_the_handler() {
        let mut bindings = vec![HookBinding::new(Phase::Idle).on(HookType::OnAfterEnter, always(true))];
        let replacement = always(false);

        bind_hook_handler(
            &mut bindings,
            Phase::Idle.into(),
            HookType::OnAfterEnter,
            Arc::clone(&replacement),
        );

        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].handlers.len(), 1);
        let bound = bindings[0].handler(HookType::OnAfterEnter).unwrap();
        assert!(Arc::ptr_eq(bound, &replacement));
    }

    #[test]
    fn binding_appends_other_hook_types() {
        let mut bindings = vec![
            HookBinding::new(Phase::Idle).on(HookType::OnBeforeLeave, always(true)),
            HookBinding::new(Phase::Busy),
        ];

        bind_hook_handler(&mut bindings, Phase::Idle.into(), HookType::OnAfterLeave, always(true));
        bind_hook_handler(&mut bindings, Phase::Busy.into(), HookType::OnAfterLeave, always(true));

        assert_eq!(bindings[0].handlers.len(), 2);
        assert_eq!(bindings[1].handlers.len(), 1);
    }

    #[test]
    fn handlers_for_collects_duplicates_in_order() {
        let first = always(true);
        let second = always(false);
        let bindings = vec![
            HookBinding::new(Phase::Busy).on(HookType::OnBeforeEnter, Arc::clone(&first)),
            HookBinding::new(Phase::Idle).on(HookType::OnBeforeEnter, always(true)),
            HookBinding::new(Phase::Busy).on(HookType::OnBeforeEnter, Arc::clone(&second)),
        ];

        let found = handlers_for(&bindings, &Phase::Busy, HookType::OnBeforeEnter);

        assert_eq!(found.len(), 2);
        assert!(Arc::ptr_eq(&found[0], &first));
        assert!(Arc::ptr_eq(&found[1], &second));
        assert!(handlers_for(&bindings, &Phase::Done, HookType::OnBeforeEnter).is_empty());
        assert!(handlers_for(&bindings, &Phase::Busy, HookType::OnAfterEnter).is_empty());
    }

    #[test]
    fn hook_result_converts_from_bool() {
        assert!(matches!(HookResult::from(true), HookResult::Ready(true)));
        assert!(matches!(
            HookResult::pending(async { false }),
            HookResult::Pending(_)
        ));
    }

    #[test]
    fn hook_type_serializes_by_name() {
        let json = serde_json::to_string(&HookType::OnAfterLeave).unwrap();
        assert_eq!(json, "\"OnAfterLeave\"");
        assert_eq!(HookType::OnBeforeEnter.to_string(), "OnBeforeEnter");
    }
}
