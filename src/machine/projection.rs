//! Reachability view over the declared states.

use super::config::Config;
use super::engine::{can_from, StateMachine};
use super::error::MachineError;
use crate::core::State;
use serde::Serialize;

/// A state mentioned by at least one transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StateInfo<S: State> {
    pub state: S,
    /// Whether `can(state)` holds from the current state
    pub reachable: bool,
    pub current: bool,
}

impl<S: State> StateMachine<S> {
    /// Every state named by a transition, in order of first appearance.
    pub fn get_all_states(&self) -> Result<Vec<StateInfo<S>>, MachineError> {
        self.with_view(project)
    }

    /// The states reachable from the current one.
    pub fn get_next_states(&self) -> Result<Vec<S>, MachineError> {
        Ok(self
            .get_all_states()?
            .into_iter()
            .filter(|info| info.reachable)
            .map(|info| info.state)
            .collect())
    }
}

pub(crate) fn project<S: State>(config: &Config<S>, current: Option<&S>) -> Vec<StateInfo<S>> {
    let mut states: Vec<StateInfo<S>> = Vec::new();
    for transition in &config.transitions {
        for state in transition.from.iter().chain(transition.to.iter()) {
            let reachable = can_from(config, current, state);
            match states.iter_mut().find(|info| info.state == *state) {
                Some(info) => info.reachable |= reachable,
                None => states.push(StateInfo {
                    state: state.clone(),
                    reachable,
                    current: current == Some(state),
                }),
            }
        }
    }
    states
}
