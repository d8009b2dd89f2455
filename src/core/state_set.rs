//! One-or-many state values.

use super::state::State;
use std::fmt;

/// A single state or an ordered list of states.
///
/// Used for both ends of a [`Transition`](super::Transition) and for the
/// target of [`bind_hook_handler`](crate::machine::StateMachine::bind_hook_handler).
/// Containment is equality for `Single` and membership for `Multiple`.
#[derive(Clone, Debug, PartialEq)]
pub enum StateSet<S: State> {
    Single(S),
    Multiple(Vec<S>),
}

impl<S: State> StateSet<S> {
    /// Check whether `state` belongs to this set.
    pub fn contains(&self, state: &S) -> bool {
        match self {
            Self::Single(s) => s == state,
            Self::Multiple(states) => states.contains(state),
        }
    }

    /// Iterate the states in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        match self {
            Self::Single(s) => std::slice::from_ref(s).iter(),
            Self::Multiple(states) => states.iter(),
        }
    }

    /// Normalize into a list.
    pub fn into_vec(self) -> Vec<S> {
        match self {
            Self::Single(s) => vec![s],
            Self::Multiple(states) => states,
        }
    }
}

impl<S: State> From<S> for StateSet<S> {
    fn from(state: S) -> Self {
        Self::Single(state)
    }
}

impl<S: State> From<Vec<S>> for StateSet<S> {
    fn from(states: Vec<S>) -> Self {
        Self::Multiple(states)
    }
}

impl<S: State, const N: usize> From<[S; N]> for StateSet<S> {
    fn from(states: [S; N]) -> Self {
        Self::Multiple(states.into())
    }
}

impl<S: State> fmt::Display for StateSet<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(s) => f.write_str(s.name()),
            Self::Multiple(states) => {
                let names: Vec<&str> = states.iter().map(State::name).collect();
                write!(f, "[{}]", names.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn single_contains_by_equality() {
        let set = StateSet::from(s("A"));
        assert!(set.contains(&s("A")));
        assert!(!set.contains(&s("B")));
    }

    #[test]
    fn multiple_contains_by_membership() {
        let set = StateSet::from([s("A"), s("B")]);
        assert!(set.contains(&s("B")));
        assert!(!set.contains(&s("C")));
        assert!(!StateSet::<String>::Multiple(vec![]).contains(&s("A")));
    }

    #[test]
    fn iter_preserves_declaration_order() {
        let set = StateSet::from(vec![s("C"), s("A"), s("B")]);
        let names: Vec<&String> = set.iter().collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(StateSet::from(s("X")).into_vec(), vec![s("X")]);
    }

    #[test]
    fn display_renders_arrays_in_brackets() {
        assert_eq!(StateSet::from(s("A")).to_string(), "A");
        assert_eq!(StateSet::from([s("A"), s("B")]).to_string(), "[A,B]");
        assert_eq!(StateSet::from(vec![s("F")]).to_string(), "[F]");
    }
}
