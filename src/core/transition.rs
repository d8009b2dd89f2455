//! Declarative transitions between states.

use super::state::State;
use super::state_set::StateSet;
use crate::events::TransitionEventHandler;
use std::fmt;

/// A legal edge-set from one or many source states to one or many targets.
///
/// Transitions are plain data: matching, ordering and validation are the
/// machine's job. Cloning is cheap, the callbacks are reference counted.
///
/// # Example
///
/// ```rust
/// use typed_fsm::core::{StateSet, Transition};
///
/// let melt = Transition::new("Solid".to_string(), "Liquid".to_string()).named("melting");
/// assert_eq!(melt.to_string(), "Solid->Liquid (melting)");
///
/// let evaporate = Transition::new(
///     StateSet::from(vec!["Liquid".to_string(), "Solid".to_string()]),
///     "Gas".to_string(),
/// );
/// assert_eq!(evaporate.to_string(), "[Liquid,Solid]->Gas");
/// ```
#[derive(Clone)]
pub struct Transition<S: State> {
    /// The source state(s)
    pub from: StateSet<S>,
    /// The destination state(s)
    pub to: StateSet<S>,
    /// Logical name of the change (eg. "melting"); several transitions may share it
    pub name: Option<String>,
    /// Fired before the state hooks of this transition run
    pub on_before_transition: Option<TransitionEventHandler<S>>,
    /// Fired once the destination state has been entered
    pub on_after_transition: Option<TransitionEventHandler<S>>,
}

impl<S: State> Transition<S> {
    /// Create an unnamed transition without callbacks.
    pub fn new(from: impl Into<StateSet<S>>, to: impl Into<StateSet<S>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            name: None,
            on_before_transition: None,
            on_after_transition: None,
        }
    }

    /// Set the transition name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Check if this transition leads from `current` to `target` (pure).
    pub fn connects(&self, current: &S, target: &S) -> bool {
        self.from.contains(current) && self.to.contains(target)
    }

    /// Check if this transition carries the given name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

impl<S: State> fmt::Display for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.from, self.to)?;
        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }
        Ok(())
    }
}

impl<S: State> fmt::Debug for Transition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("name", &self.name)
            .field("on_before_transition", &self.on_before_transition.is_some())
            .field("on_after_transition", &self.on_after_transition.is_some())
            .finish()
    }
}
