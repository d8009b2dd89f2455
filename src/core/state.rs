//! Core State trait for state machine states.
//!
//! States are opaque to the engine: it only clones them and compares them
//! by value. The name is used when rendering transitions and in diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the machine hands out owned copies of its current state
/// - `PartialEq`: transitions are matched by value equality
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: state projections can be exported
///
/// # Example
///
/// ```rust
/// use typed_fsm::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
