//! Typed FSM: a generic, strongly typed finite state machine
//!
//! Declare transitions between values of your own state type, then let the
//! machine validate and execute moves between them while it runs a fixed
//! sequence of lifecycle callbacks.
//!
//! # Core Concepts
//!
//! - **State**: any value implementing the [`State`] trait, compared by value
//! - **Transitions**: one-or-many source states to one-or-many targets, optionally named
//! - **Hooks**: per-state callbacks that can veto a transition, synchronously or asynchronously
//! - **Events**: global and per-transition observers that cannot veto
//!
//! # Example
//!
//! ```rust
//! use typed_fsm::builder::{named_transition, transition, StateMachineBuilder};
//! use typed_fsm::core::HookType;
//! use typed_fsm::state_enum;
//!
//! state_enum! {
//!     enum ThreadState {
//!         New,
//!         Ready,
//!         Running,
//!         Waiting,
//!         Terminated,
//!     }
//! }
//!
//! let machine = StateMachineBuilder::new()
//!     .initial(ThreadState::New)
//!     .transitions(vec![
//!         transition(ThreadState::New, ThreadState::Ready),
//!         named_transition(ThreadState::Ready, ThreadState::Running, "schedule"),
//!         transition(ThreadState::Running, [ThreadState::Waiting, ThreadState::Terminated]),
//!         named_transition(ThreadState::Waiting, ThreadState::Ready, "wake_up"),
//!     ])
//!     .hook(ThreadState::Running, HookType::OnBeforeLeave, |_| true)
//!     .build()
//!     .unwrap();
//!
//! machine.initialize().unwrap();
//! assert!(machine.transit(ThreadState::Ready).unwrap());
//! assert!(machine.transit_by_name("schedule").unwrap());
//! assert_eq!(
//!     machine.get_next_states().unwrap(),
//!     vec![ThreadState::Waiting, ThreadState::Terminated]
//! );
//! ```

pub mod builder;
pub mod core;
pub mod events;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use crate::core::{HookBinding, HookResult, HookType, State, StateSet, Transition};
pub use machine::{Config, ConfigUpdate, MachineError, StateInfo, StateMachine, TransitOptions};
