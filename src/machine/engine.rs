//! The transition engine.
//!
//! Every transition runs the same pipeline:
//!
//! ```text
//! on_before_every_transition -> on_before_transition
//!   -> OnBeforeLeave(from) -> on_state_leave -> (stateless) -> OnAfterLeave(from)
//!   -> OnBeforeEnter(to) -> commit -> on_state_enter -> OnAfterEnter(to)
//! -> on_after_transition -> on_after_every_transition
//! ```
//!
//! A hook returning `false` stops the pipeline where it is and the
//! operation reports `Ok(false)`. Events only observe.

use crate::core::{
    handlers_for, hook_handler, HookResult, HookType, State, StateSet, Transition,
};
use crate::events;
use crate::machine::config::{Config, ConfigUpdate};
use crate::machine::error::MachineError;
use crate::machine::options::TransitOptions;
use futures::future::join_all;
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::future::Future;
use tracing::{debug, trace, warn};

/// How pending hook results are handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HookMode {
    /// Reject them with [`MachineError::AsyncHookInSyncCall`]
    Sync,
    /// Await them
    Async,
}

struct Runtime<S> {
    current: Option<S>,
    initialized: bool,
    pending: bool,
}

/// Clears the pending flag when the pipeline ends, including when its
/// future is dropped half way.
struct PendingGuard<'a, S> {
    runtime: &'a Mutex<Runtime<S>>,
}

impl<S> Drop for PendingGuard<'_, S> {
    fn drop(&mut self) {
        self.runtime.lock().pending = false;
    }
}

/// A strongly typed finite state machine.
///
/// All operations take `&self`. Hooks and events receive the machine and
/// may query it while a transition runs; starting another transition from
/// there fails with [`MachineError::TransitionPending`].
///
/// # Example
///
/// ```rust
/// use typed_fsm::builder::{named_transition, StateMachineBuilder};
/// use typed_fsm::state_enum;
///
/// state_enum! {
///     enum Matter {
///         Solid,
///         Liquid,
///         Gas,
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .initial(Matter::Solid)
///     .transitions(vec![
///         named_transition(Matter::Solid, Matter::Liquid, "melt"),
///         named_transition(Matter::Liquid, Matter::Gas, "vaporize"),
///     ])
///     .build()
///     .unwrap();
///
/// machine.initialize().unwrap();
/// assert_eq!(machine.get_next_states().unwrap(), vec![Matter::Liquid]);
///
/// assert!(!machine.transit(Matter::Gas).unwrap());
/// assert!(machine.transit_by_name("melt").unwrap());
/// assert_eq!(machine.get_state().unwrap(), Matter::Liquid);
/// ```
pub struct StateMachine<S: State> {
    config: RwLock<Config<S>>,
    runtime: Mutex<Runtime<S>>,
}

impl<S: State> StateMachine<S> {
    /// Create an uninitialized machine. Call [`initialize`](Self::initialize) before use.
    pub fn new(config: Config<S>) -> Self {
        Self {
            config: RwLock::new(config),
            runtime: Mutex::new(Runtime {
                current: None,
                initialized: false,
                pending: false,
            }),
        }
    }

    /// Enter the initial state, firing its enter hooks and events.
    pub fn initialize(&self) -> Result<&Self, MachineError> {
        self.initialize_with(TransitOptions::default())
    }

    /// Like [`initialize`](Self::initialize), with explicit [`TransitOptions`].
    pub fn initialize_with(&self, options: TransitOptions) -> Result<&Self, MachineError> {
        run_sync(self.run_initialize(options, HookMode::Sync))?;
        Ok(self)
    }

    /// Like [`initialize`](Self::initialize), awaiting pending hook results.
    pub async fn initialize_async(&self) -> Result<&Self, MachineError> {
        self.initialize_async_with(TransitOptions::default()).await
    }

    /// Like [`initialize_with`](Self::initialize_with), awaiting pending hook results.
    pub async fn initialize_async_with(
        &self,
        options: TransitOptions,
    ) -> Result<&Self, MachineError> {
        self.run_initialize(options, HookMode::Async).await?;
        Ok(self)
    }

    /// The current state.
    ///
    /// Fails while a transition is pending, and with
    /// [`MachineError::NoCurrentState`] after a transition was vetoed by an
    /// `OnAfterLeave` or `OnBeforeEnter` hook.
    pub fn get_state(&self) -> Result<S, MachineError> {
        self.ready_state()?.ok_or(MachineError::NoCurrentState)
    }

    pub fn is_initialized(&self) -> bool {
        self.runtime.lock().initialized
    }

    /// Whether a transition (or the initialization) is running.
    pub fn is_pending(&self) -> bool {
        self.runtime.lock().pending
    }

    pub fn can_self_loop(&self) -> bool {
        self.config.read().can_self_loop
    }

    /// A copy of the declared transitions.
    pub fn get_all_transitions(&self) -> Result<Vec<Transition<S>>, MachineError> {
        self.with_view(|config, _| config.transitions.clone())
    }

    /// The first declared transition leading from the current state to `target`.
    pub fn get_transition(&self, target: &S) -> Result<Option<Transition<S>>, MachineError> {
        self.with_view(|config, current| find_transition(config, current, target).cloned())
    }

    /// Whether `state` can be reached from the current state, either through a
    /// declared transition or as an allowed self loop.
    pub fn can(&self, state: &S) -> Result<bool, MachineError> {
        self.with_view(|config, current| can_from(config, current, state))
    }

    /// Whether `state` is the current state and no declared transition leads to it.
    pub fn is_self_loop(&self, state: &S) -> Result<bool, MachineError> {
        self.with_view(|config, current| {
            find_transition(config, current, state).is_none() && current == Some(state)
        })
    }

    /// Move to `target` if a transition allows it.
    ///
    /// Returns `Ok(false)` when no transition applies or a hook vetoes.
    /// Fails if a hook returns a pending result; use
    /// [`transit_async`](Self::transit_async) for asynchronous hooks.
    pub fn transit(&self, target: S) -> Result<bool, MachineError> {
        run_sync(self.run_transit(target, HookMode::Sync))
    }

    /// Like [`transit`](Self::transit), awaiting pending hook results.
    pub async fn transit_async(&self, target: S) -> Result<bool, MachineError> {
        self.run_transit(target, HookMode::Async).await
    }

    /// Transit along the first transition named `name` that has a reachable target.
    ///
    /// Transitions sharing the name are tried in declaration order; within a
    /// multi-target transition the first reachable target wins.
    pub fn transit_by_name(&self, name: &str) -> Result<bool, MachineError> {
        run_sync(self.run_transit_by_name(name, HookMode::Sync))
    }

    /// Like [`transit_by_name`](Self::transit_by_name), awaiting pending hook results.
    pub async fn transit_by_name_async(&self, name: &str) -> Result<bool, MachineError> {
        self.run_transit_by_name(name, HookMode::Async).await
    }

    /// Move to `target` without checking reachability.
    ///
    /// Hooks and events still run, but hook results never block the move.
    pub fn goto(&self, target: S) -> Result<(), MachineError> {
        run_sync(self.run_goto(target, HookMode::Sync))
    }

    /// Like [`goto`](Self::goto), awaiting pending hook results.
    pub async fn goto_async(&self, target: S) -> Result<(), MachineError> {
        self.run_goto(target, HookMode::Async).await
    }

    /// Bind `handler` to `hook_type` of every given state, replacing the
    /// handler previously bound to the same pair.
    pub fn bind_hook_handler<F, R>(
        &self,
        states: impl Into<StateSet<S>>,
        hook_type: HookType,
        handler: F,
    ) where
        F: Fn(&StateMachine<S>) -> R + Send + Sync + 'static,
        R: Into<HookResult>,
    {
        let handler = hook_handler(handler);
        let mut config = self.config.write();
        let bindings = config.hooks.get_or_insert_with(Vec::new);
        crate::core::bind_hook_handler(bindings, states.into(), hook_type, handler);
    }

    /// A copy of the configuration.
    pub fn get_config(&self) -> Config<S> {
        self.config.read().clone()
    }

    /// Shallow-merge `update` into the configuration.
    pub fn update_config(&self, update: ConfigUpdate<S>) {
        self.config.write().apply(update);
    }

    /// Run `view` against the configuration and current state of an
    /// initialized machine.
    pub(crate) fn with_view<R>(
        &self,
        view: impl FnOnce(&Config<S>, Option<&S>) -> R,
    ) -> Result<R, MachineError> {
        let runtime = self.runtime.lock();
        if !runtime.initialized {
            return Err(MachineError::NotInitialized);
        }
        let config = self.config.read();
        Ok(view(&config, runtime.current.as_ref()))
    }

    fn ready_state(&self) -> Result<Option<S>, MachineError> {
        let runtime = self.runtime.lock();
        if !runtime.initialized {
            return Err(MachineError::NotInitialized);
        }
        if runtime.pending {
            return Err(MachineError::TransitionPending);
        }
        Ok(runtime.current.clone())
    }

    /// Claim the pending flag of an initialized machine and snapshot its
    /// current state under the same lock.
    fn begin(&self) -> Result<(PendingGuard<'_, S>, Option<S>), MachineError> {
        let mut runtime = self.runtime.lock();
        if !runtime.initialized {
            return Err(MachineError::NotInitialized);
        }
        if runtime.pending {
            return Err(MachineError::TransitionPending);
        }
        runtime.pending = true;
        let current = runtime.current.clone();
        let guard = PendingGuard {
            runtime: &self.runtime,
        };
        Ok((guard, current))
    }

    fn begin_initialization(&self) -> Result<PendingGuard<'_, S>, MachineError> {
        let mut runtime = self.runtime.lock();
        if runtime.initialized {
            return Err(MachineError::AlreadyInitialized);
        }
        if runtime.pending {
            return Err(MachineError::TransitionPending);
        }
        runtime.pending = true;
        Ok(PendingGuard {
            runtime: &self.runtime,
        })
    }

    fn set_current(&self, state: Option<S>) {
        self.runtime.lock().current = state;
    }

    fn fire_invalid(&self, from: Option<&S>, to: Option<&S>, options: TransitOptions) {
        debug!(from = ?from, to = ?to, "invalid transition");
        let handler = self.config.read().on_invalid_transition.clone();
        events::bind(handler.as_deref())
            .to_args((self, from, to))
            .fire_if(options.fire_events);
    }

    fn fire_every(&self, before: bool, options: TransitOptions) {
        let handler = {
            let config = self.config.read();
            if before {
                config.on_before_every_transition.clone()
            } else {
                config.on_after_every_transition.clone()
            }
        };
        events::bind(handler.as_deref())
            .to_args((self,))
            .fire_if(options.fire_events);
    }

    async fn run_initialize(
        &self,
        options: TransitOptions,
        mode: HookMode,
    ) -> Result<(), MachineError> {
        let _pending = self.begin_initialization()?;
        let initial = self.config.read().initial_state.clone();
        debug!(state = initial.name(), "initializing state machine");

        self.fire_every(true, options);

        if !self
            .run_hooks(&initial, HookType::OnBeforeEnter, options, mode)
            .await?
        {
            return Err(MachineError::HookVeto {
                state: initial.name().to_string(),
                hook: HookType::OnBeforeEnter,
            });
        }

        {
            let mut runtime = self.runtime.lock();
            runtime.current = Some(initial.clone());
            runtime.initialized = true;
        }

        let handler = self.config.read().on_state_enter.clone();
        events::bind(handler.as_deref())
            .to_args((self, &initial))
            .fire_if(options.fire_events);

        if !self
            .run_hooks(&initial, HookType::OnAfterEnter, options, mode)
            .await?
        {
            warn!(
                state = initial.name(),
                "OnAfterEnter hook of the initial state returned false, the initialization is kept"
            );
        }

        self.fire_every(false, options);
        Ok(())
    }

    async fn run_transit(&self, target: S, mode: HookMode) -> Result<bool, MachineError> {
        let (pending, current) = self.begin()?;
        self.transit_claimed(pending, current, target, mode).await
    }

    /// Resolve and run a transition while already holding the pending flag.
    async fn transit_claimed(
        &self,
        pending: PendingGuard<'_, S>,
        current: Option<S>,
        target: S,
        mode: HookMode,
    ) -> Result<bool, MachineError> {
        let options = TransitOptions::default();
        let (transition, self_loop) = {
            let config = self.config.read();
            let transition = find_transition(&config, current.as_ref(), &target).cloned();
            let self_loop = config.can_self_loop && current.as_ref() == Some(&target);
            (transition, self_loop)
        };

        if transition.is_none() && !self_loop {
            drop(pending);
            self.fire_invalid(current.as_ref(), Some(&target), options);
            return Ok(false);
        }

        self.execute(pending, current, target, transition, options, mode)
            .await
    }

    async fn run_transit_by_name(&self, name: &str, mode: HookMode) -> Result<bool, MachineError> {
        let (pending, current) = self.begin()?;
        let target = {
            let config = self.config.read();
            let mut named = config.transitions.iter().filter(|t| t.has_name(name)).peekable();
            if named.peek().is_none() {
                return Err(MachineError::UnknownTransition(name.to_string()));
            }
            named
                .flat_map(|t| t.to.iter())
                .find(|candidate| can_from(&config, current.as_ref(), candidate))
                .cloned()
        };

        match target {
            Some(target) => self.transit_claimed(pending, current, target, mode).await,
            None => {
                drop(pending);
                self.fire_invalid(current.as_ref(), None, TransitOptions::default());
                Ok(false)
            }
        }
    }

    async fn run_goto(&self, target: S, mode: HookMode) -> Result<(), MachineError> {
        let (pending, current) = self.begin()?;
        let transition = {
            let config = self.config.read();
            find_transition(&config, current.as_ref(), &target).cloned()
        };
        self.execute(
            pending,
            current,
            target,
            transition,
            TransitOptions::unconditional(),
            mode,
        )
        .await?;
        Ok(())
    }

    /// Run the lifecycle pipeline from `from` to `target`.
    ///
    /// `transition` is `None` for self loops and unconditional moves without
    /// a declared transition. Without a current state the leave phase is skipped.
    async fn execute(
        &self,
        _pending: PendingGuard<'_, S>,
        from: Option<S>,
        target: S,
        transition: Option<Transition<S>>,
        options: TransitOptions,
        mode: HookMode,
    ) -> Result<bool, MachineError> {
        debug!(from = ?from, to = ?target, "transition started");

        self.fire_every(true, options);
        if let (Some(transition), Some(from)) = (&transition, &from) {
            events::bind(transition.on_before_transition.as_deref())
                .to_args((self, from, &target))
                .fire_if(options.fire_events);
        }

        if let Some(from) = &from {
            if !self
                .run_hooks(from, HookType::OnBeforeLeave, options, mode)
                .await?
            {
                return Ok(false);
            }

            let handler = self.config.read().on_state_leave.clone();
            events::bind(handler.as_deref())
                .to_args((self, from))
                .fire_if(options.fire_events);
            self.set_current(None);

            if !self
                .run_hooks(from, HookType::OnAfterLeave, options, mode)
                .await?
            {
                return Ok(false);
            }
        }

        if !self
            .run_hooks(&target, HookType::OnBeforeEnter, options, mode)
            .await?
        {
            return Ok(false);
        }

        self.set_current(Some(target.clone()));

        let handler = self.config.read().on_state_enter.clone();
        events::bind(handler.as_deref())
            .to_args((self, &target))
            .fire_if(options.fire_events);

        // The target stays committed even if this hook vetoes.
        if !self
            .run_hooks(&target, HookType::OnAfterEnter, options, mode)
            .await?
        {
            return Ok(false);
        }

        if let (Some(transition), Some(from)) = (&transition, &from) {
            events::bind(transition.on_after_transition.as_deref())
                .to_args((self, from, &target))
                .fire_if(options.fire_events);
        }
        self.fire_every(false, options);

        debug!(state = target.name(), "transition completed");
        Ok(true)
    }

    /// Invoke the handlers bound to `(state, hook_type)` and AND their results.
    ///
    /// Returns whether the pipeline may proceed.
    async fn run_hooks(
        &self,
        state: &S,
        hook_type: HookType,
        options: TransitOptions,
        mode: HookMode,
    ) -> Result<bool, MachineError> {
        if !options.invoke_hooks {
            return Ok(true);
        }

        let handlers = {
            let config = self.config.read();
            config
                .hooks
                .as_deref()
                .map(|bindings| handlers_for(bindings, state, hook_type))
                .unwrap_or_default()
        };

        let mut accepted = true;
        let mut pending = Vec::new();
        for handler in handlers {
            trace!(state = state.name(), hook = %hook_type, "invoking hook");
            match (*handler)(self) {
                HookResult::Ready(value) => accepted = accepted && value,
                HookResult::Pending(future) => match mode {
                    HookMode::Sync => {
                        return Err(MachineError::AsyncHookInSyncCall {
                            state: state.name().to_string(),
                            hook: hook_type,
                        })
                    }
                    HookMode::Async => pending.push(future),
                },
            }
        }
        if !pending.is_empty() {
            let resolved = join_all(pending).await;
            accepted = accepted && resolved.into_iter().all(|value| value);
        }

        if !accepted {
            debug!(
                state = state.name(),
                hook = %hook_type,
                ignored = options.ignore_hooks_results,
                "hook returned false"
            );
        }
        Ok(accepted || options.ignore_hooks_results)
    }
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runtime = self.runtime.lock();
        f.debug_struct("StateMachine")
            .field("current", &runtime.current)
            .field("initialized", &runtime.initialized)
            .field("pending", &runtime.pending)
            .finish_non_exhaustive()
    }
}

/// Drive a [`HookMode::Sync`] pipeline to completion.
///
/// Sync pipelines reject pending hook results instead of awaiting them, so
/// the first poll always completes. Polling in place also lets hooks call
/// back into the machine.
fn run_sync<T>(
    pipeline: impl Future<Output = Result<T, MachineError>>,
) -> Result<T, MachineError> {
    match pipeline.now_or_never() {
        Some(result) => result,
        None => unreachable!("sync pipelines never suspend"),
    }
}

/// First declared transition from `current` to `target`.
pub(crate) fn find_transition<'c, S: State>(
    config: &'c Config<S>,
    current: Option<&S>,
    target: &S,
) -> Option<&'c Transition<S>> {
    let current = current?;
    config
        .transitions
        .iter()
        .find(|t| t.connects(current, target))
}

pub(crate) fn can_from<S: State>(config: &Config<S>, current: Option<&S>, target: &S) -> bool {
    let Some(current) = current else {
        return false;
    };
    (config.can_self_loop && current == target)
        || find_transition(config, Some(current), target).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{hook_handler, HookBinding};
    use crate::state_enum;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    state_enum! {
        enum Letter {
            A,
            B,
            C,
            D,
        }
    }

    fn config() -> Config<Letter> {
        let mut config = Config::new(Letter::A);
        config.transitions = vec![
            Transition::new(Letter::A, Letter::B),
            Transition::new(Letter::B, [Letter::C, Letter::D]),
        ];
        config
    }

    #[test]
    fn operations_require_initialization() {
        let machine = StateMachine::new(config());

        assert_eq!(machine.get_state(), Err(MachineError::NotInitialized));
        assert_eq!(machine.can(&Letter::B), Err(MachineError::NotInitialized));
        assert!(machine.get_all_transitions().is_err());
        assert_eq!(machine.transit(Letter::B), Err(MachineError::NotInitialized));
        assert_eq!(machine.goto(Letter::C), Err(MachineError::NotInitialized));
    }

    #[test]
    fn initialize_twice_fails() {
        let machine = StateMachine::new(config());
        machine.initialize().unwrap();

        assert_eq!(
            machine.initialize().map(|_| ()),
            Err(MachineError::AlreadyInitialized)
        );
        assert_eq!(machine.get_state(), Ok(Letter::A));
    }

    #[test]
    fn can_follows_declared_transitions_and_self_loop_flag() {
        let machine = StateMachine::new(config());
        machine.initialize().unwrap();

        assert!(machine.can(&Letter::B).unwrap());
        assert!(!machine.can(&Letter::C).unwrap());
        assert!(!machine.can(&Letter::A).unwrap());
        assert!(machine.is_self_loop(&Letter::A).unwrap());
        assert!(!machine.is_self_loop(&Letter::B).unwrap());

        machine.update_config(ConfigUpdate::new().can_self_loop(true));
        assert!(machine.can(&Letter::A).unwrap());
        assert!(machine.can_self_loop());
    }

    #[test]
    fn declared_self_edge_is_not_a_self_loop() {
        let mut config = config();
        config.transitions.push(Transition::new(Letter::A, Letter::A));
        let machine = StateMachine::new(config);
        machine.initialize().unwrap();

        assert!(machine.can(&Letter::A).unwrap());
        assert!(!machine.is_self_loop(&Letter::A).unwrap());
        assert!(machine.transit(Letter::A).unwrap());
    }

    #[test]
    fn find_transition_picks_first_declared() {
        let mut config = config();
        config.transitions.insert(1, Transition::new(Letter::A, Letter::B).named("second"));

        let found = find_transition(&config, Some(&Letter::A), &Letter::B).unwrap();
        assert!(found.name.is_none());
        assert!(find_transition(&config, None, &Letter::B).is_none());

        let machine = StateMachine::new(config);
        machine.initialize().unwrap();
        assert!(machine.get_transition(&Letter::B).unwrap().is_some());
        assert!(machine.get_transition(&Letter::C).unwrap().is_none());
    }

    #[test]
    fn sync_transit_rejects_pending_hooks() {
        let mut config = config();
        config.hooks = Some(vec![HookBinding::new(Letter::A).on(
            HookType::OnBeforeLeave,
            hook_handler(|_: &StateMachine<Letter>| HookResult::pending(async { true })),
        )]);
        let machine = StateMachine::new(config);
        machine.initialize().unwrap();

        let result = machine.transit(Letter::B);

        assert_eq!(
            result,
            Err(MachineError::AsyncHookInSyncCall {
                state: "A".to_string(),
                hook: HookType::OnBeforeLeave,
            })
        );
        assert!(!machine.is_pending());
        assert_eq!(machine.get_state(), Ok(Letter::A));
    }

    #[test]
    fn hooks_observe_pending_state() {
        let observed = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&observed);
        let machine = StateMachine::new(config());
        machine.bind_hook_handler(Letter::B, HookType::OnBeforeEnter, move |m| {
            sink.lock().push((m.is_pending(), m.get_state(), m.transit(Letter::C)));
            true
        });
        machine.initialize().unwrap();

        assert!(machine.transit(Letter::B).unwrap());

        let observed = observed.lock();
        assert_eq!(
            observed.as_slice(),
            &[(
                true,
                Err(MachineError::TransitionPending),
                Err(MachineError::TransitionPending)
            )]
        );
    }

    #[test]
    fn disabled_hooks_are_not_invoked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let machine = StateMachine::new(config());
        machine.bind_hook_handler(Letter::A, HookType::OnBeforeEnter, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            false
        });

        machine
            .initialize_with(TransitOptions {
                invoke_hooks: false,
                ..TransitOptions::default()
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(machine.get_state(), Ok(Letter::A));
    }

    #[tokio::test]
    async fn async_hooks_are_awaited_and_combined() {
        let machine = StateMachine::new(config());
        machine.bind_hook_handler(Letter::A, HookType::OnBeforeLeave, |_| {
            HookResult::pending(async {
                tokio::task::yield_now().await;
                true
            })
        });
        machine.initialize_async().await.unwrap();

        assert!(machine.transit_async(Letter::B).await.unwrap());
        assert_eq!(machine.get_state(), Ok(Letter::B));
    }

    #[test]
    fn debug_shows_runtime_flags() {
        let machine = StateMachine::new(config());
        let rendered = format!("{machine:?}");
        assert!(rendered.contains("initialized: false"));
    }
}
