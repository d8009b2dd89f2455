//! Thread Lifecycle State Machine
//!
//! This example models the life of an operating system thread.
//!
//! Key concepts:
//! - Named transitions (`schedule`, `wake_up`) shared by several edges
//! - Multi-target transitions (Running -> Waiting or Terminated)
//! - State hooks that veto a transition
//! - Global events observing every move
//!
//! Run with: cargo run --example thread_lifecycle

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use typed_fsm::builder::{named_transition, transition, StateMachineBuilder};
use typed_fsm::core::{HookType, State};
use typed_fsm::machine::StateMachine;
use typed_fsm::state_enum;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum ThreadState {
        New,
        Ready,
        Running,
        Waiting,
        Terminated,
    }
}

fn print_status(machine: &StateMachine<ThreadState>) {
    let state = machine
        .get_state()
        .map(|s| s.name().to_string())
        .unwrap_or_else(|err| format!("<{err}>"));
    let next: Vec<String> = machine
        .get_next_states()
        .unwrap_or_default()
        .iter()
        .map(|s| s.name().to_string())
        .collect();
    println!("  state: {state:<10} next: [{}]", next.join(", "));
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Thread Lifecycle State Machine ===\n");

    // Holding the lock keeps the thread from being descheduled
    let holds_lock = Arc::new(AtomicBool::new(true));
    let lock_flag = Arc::clone(&holds_lock);

    let machine = StateMachineBuilder::new()
        .initial(ThreadState::New)
        .transitions(vec![
            named_transition(ThreadState::New, ThreadState::Ready, "wake_up"),
            named_transition(ThreadState::Ready, ThreadState::Running, "schedule"),
            transition(
                ThreadState::Running,
                [ThreadState::Waiting, ThreadState::Terminated],
            ),
            named_transition(ThreadState::Waiting, ThreadState::Ready, "wake_up"),
        ])
        .hook(ThreadState::Running, HookType::OnBeforeLeave, move |_| {
            !lock_flag.load(Ordering::SeqCst)
        })
        .on_state_enter(|_, state| println!("  -> entered {}", state.name()))
        .on_invalid_transition(|_, from, to| {
            println!("  !! no transition from {from:?} to {to:?}");
        })
        .build()
        .unwrap();

    machine.initialize().unwrap();

    println!("Declared transitions:");
    for t in machine.get_all_transitions().unwrap() {
        println!("  {t}");
    }
    println!();

    print_status(&machine);

    println!("\nTrying to run before being scheduled:");
    machine.transit(ThreadState::Running).unwrap();
    print_status(&machine);

    println!("\nwake_up, then schedule:");
    machine.transit_by_name("wake_up").unwrap();
    machine.transit_by_name("schedule").unwrap();
    print_status(&machine);

    println!("\nBlocking while the lock is held (vetoed by hook):");
    let moved = machine.transit(ThreadState::Waiting).unwrap();
    println!("  transit returned {moved}");
    print_status(&machine);

    println!("\nReleasing the lock and blocking:");
    holds_lock.store(false, Ordering::SeqCst);
    machine.transit(ThreadState::Waiting).unwrap();
    machine.transit_by_name("wake_up").unwrap();
    print_status(&machine);

    println!("\nAll states:");
    for info in machine.get_all_states().unwrap() {
        println!(
            "  {:<10} reachable={:<5} current={}",
            info.state.name(),
            info.reachable,
            info.current
        );
    }

    println!("\nForcing termination with goto:");
    machine.goto(ThreadState::Terminated).unwrap();
    print_status(&machine);

    println!("\n=== Example Complete ===");
}
