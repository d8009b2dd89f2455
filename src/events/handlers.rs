//! Handler type aliases for machine events.
//!
//! Events observe the machine; unlike hooks they cannot veto a transition.

use crate::machine::StateMachine;
use std::sync::Arc;

/// Fired before and after every transition, initialization included.
pub type GenericEventHandler<S> = Arc<dyn Fn(&StateMachine<S>) + Send + Sync>;

/// Fired when any state is entered or left.
pub type StateEventHandler<S> = Arc<dyn Fn(&StateMachine<S>, &S) + Send + Sync>;

/// Fired around a specific declared transition with its source and target.
pub type TransitionEventHandler<S> = Arc<dyn Fn(&StateMachine<S>, &S, &S) + Send + Sync>;

/// Fired when a requested transition does not exist.
///
/// The source is `None` when the machine has no current state; the target
/// is `None` when a named transition matched nothing reachable.
pub type InvalidTransitionHandler<S> =
    Arc<dyn Fn(&StateMachine<S>, Option<&S>, Option<&S>) + Send + Sync>;
