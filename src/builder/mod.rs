//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for creating state machines
//! with minimal boilerplate while maintaining type safety.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{State, StateSet, Transition};

/// Create an unnamed transition without callbacks.
///
/// # Example
///
/// ```
/// use typed_fsm::builder::transition;
/// use typed_fsm::state_enum;
///
/// state_enum! {
///     enum Job {
///         Queued,
///         Running,
///         Done,
///         Failed,
///     }
/// }
///
/// let finish = transition(Job::Running, [Job::Done, Job::Failed]);
/// assert_eq!(finish.to_string(), "Running->[Done,Failed]");
/// ```
pub fn transition<S: State>(
    from: impl Into<StateSet<S>>,
    to: impl Into<StateSet<S>>,
) -> Transition<S> {
    Transition::new(from, to)
}

/// Create a named transition, usable with `transit_by_name`.
///
/// # Example
///
/// ```
/// use typed_fsm::builder::named_transition;
///
/// let t = named_transition("Ready".to_string(), "Running".to_string(), "schedule");
/// assert!(t.has_name("schedule"));
/// ```
pub fn named_transition<S: State>(
    from: impl Into<StateSet<S>>,
    to: impl Into<StateSet<S>>,
    name: impl Into<String>,
) -> Transition<S> {
    Transition::new(from, to).named(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum TestState {
            Start,
            Middle,
            End,
        }
    }

    #[test]
    fn transition_helper_builds_unnamed_edges() {
        let t = transition(TestState::Start, TestState::Middle);

        assert!(t.name.is_none());
        assert!(t.connects(&TestState::Start, &TestState::Middle));
        assert!(!t.connects(&TestState::Middle, &TestState::End));
    }

    #[test]
    fn named_transition_helper_sets_name() {
        let t = named_transition([TestState::Start, TestState::Middle], TestState::End, "finish");

        assert!(t.has_name("finish"));
        assert!(t.connects(&TestState::Middle, &TestState::End));
        assert_eq!(t.to_string(), "[Start,Middle]->End (finish)");
    }
}
