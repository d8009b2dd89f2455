//! Errors raised by the state machine.

use crate::core::HookType;
use thiserror::Error;

/// Programmer-usage and lifecycle errors.
///
/// Expected control flow (an invalid transition, a hook veto during a
/// transition) is reported as `Ok(false)` instead.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MachineError {
    #[error("State machine is not initialized. Call .initialize() first")]
    NotInitialized,

    #[error("State machine is already initialized")]
    AlreadyInitialized,

    #[error("A transition is pending, wait for it to complete")]
    TransitionPending,

    #[error("State machine has no current state: the last transition was vetoed after leaving")]
    NoCurrentState,

    #[error("The supplied transition name does not exist: '{0}'")]
    UnknownTransition(String),

    #[error("Hook {hook} of state '{state}' returned a pending result. Use the async variant")]
    AsyncHookInSyncCall { state: String, hook: HookType },

    #[error("Hook {hook} of initial state '{state}' vetoed the initialization")]
    HookVeto { state: String, hook: HookType },
}

impl MachineError {
    /// Errors caused by calling an operation at the wrong point of the machine lifecycle.
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::AlreadyInitialized
                | Self::TransitionPending
                | Self::NoCurrentState
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_hook() {
        let err = MachineError::AsyncHookInSyncCall {
            state: "Ready".to_string(),
            hook: HookType::OnBeforeEnter,
        };
        assert_eq!(
            err.to_string(),
            "Hook OnBeforeEnter of state 'Ready' returned a pending result. Use the async variant"
        );
    }

    #[test]
    fn pending_message_mentions_pending() {
        assert!(MachineError::TransitionPending.to_string().contains("pending"));
    }

    #[test]
    fn lifecycle_errors_are_classified() {
        assert!(MachineError::NotInitialized.is_lifecycle());
        assert!(MachineError::TransitionPending.is_lifecycle());
        assert!(!MachineError::UnknownTransition("x".into()).is_lifecycle());
        assert!(!MachineError::HookVeto {
            state: "A".into(),
            hook: HookType::OnBeforeEnter
        }
        .is_lifecycle());
    }
}
