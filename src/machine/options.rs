//! Options controlling a single transition.

use serde::{Deserialize, Serialize};

/// Switches for the events and hooks of one transition.
///
/// Events are `on_before_every_transition`, `on_before_transition`,
/// `on_state_leave`, `on_state_enter`, `on_after_transition`,
/// `on_after_every_transition` and `on_invalid_transition`. Hooks are the
/// four [`HookType`](crate::core::HookType) phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitOptions {
    pub fire_events: bool,
    pub invoke_hooks: bool,
    /// Run the hooks but never let a `false` result abort the transition.
    pub ignore_hooks_results: bool,
}

impl Default for TransitOptions {
    fn default() -> Self {
        Self {
            fire_events: true,
            invoke_hooks: true,
            ignore_hooks_results: false,
        }
    }
}

impl TransitOptions {
    /// Options used by `goto`: hook vetoes never block it.
    pub fn unconditional() -> Self {
        Self {
            ignore_hooks_results: true,
            ..Self::default()
        }
    }
}
