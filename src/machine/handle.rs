//! The state machine handle.

use super::error::FsmError;
use super::fire::{Fire, Outcome, TransitionFuture};
use super::pipeline::{Attempt, AttemptKind, HISTORY_BACK};
use crate::core::{Guard, Registry, TransitionDef, Verdict, INIT, NONE};
use crate::lifecycle::{
    Hook, HookFn, HookOutput, LifecycleEvent, Listener, ListenerFamily, ListenerTable,
};
use crate::plugins::{Commit, Plugin};
use futures::future::{FutureExt, Shared as Replay};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use uuid::Uuid;

struct Runtime {
    state: String,
    pending: bool,
    listeners: ListenerTable,
}

struct Shared<D> {
    id: Uuid,
    registry: Registry,
    hooks: HashMap<Hook, HookFn>,
    plugins: Vec<Arc<dyn Plugin>>,
    data: D,
    runtime: Mutex<Runtime>,
    init: Mutex<Option<Replay<TransitionFuture>>>,
}

/// A running state machine.
///
/// The handle is cheap to clone and clones drive the same machine. At most
/// one transition is in flight at a time: any request made while one is
/// pending, including from inside a hook, is rejected.
///
/// The machine owns its hooks and listeners, so a callback that needs the
/// machine should capture a [`WeakStateMachine`] from
/// [`downgrade`](StateMachine::downgrade). A captured strong handle keeps the
/// machine and its data alive forever.
///
/// Build one with [`StateMachineBuilder`](crate::StateMachineBuilder).
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::{FsmError, StateMachine, StateMachineBuilder, TransitionDef};
///
/// let fsm: StateMachine = StateMachineBuilder::new()
///     .init("solid")
///     .transition(TransitionDef::new("melt", "solid", "liquid"))
///     .build()
///     .unwrap();
///
/// assert_eq!(fsm.state(), "solid");
/// fsm.fire("melt").unwrap();
/// assert_eq!(fsm.state(), "liquid");
///
/// assert!(matches!(
///     fsm.fire("melt"),
///     Err(FsmError::InvalidTransition { .. })
/// ));
/// ```
pub struct StateMachine<D = ()> {
    shared: Arc<Shared<D>>,
}

impl<D> Clone for StateMachine<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

/// Non-owning handle to a [`StateMachine`], safe to capture in hooks and
/// listeners.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::lifecycle::{HookError, LifecycleEvent, ListenerFamily};
/// use lifecycle_fsm::{transitions, StateMachine, StateMachineBuilder};
/// use std::sync::Arc;
///
/// let fsm: StateMachine = StateMachineBuilder::new()
///     .init("solid")
///     .transitions(transitions![melt: "solid" => "liquid"])
///     .build()
///     .unwrap();
///
/// let weak = fsm.downgrade();
/// fsm.add_event_listener(
///     ListenerFamily::EnterState,
///     Arc::new(move |_: &LifecycleEvent| -> Result<(), HookError> {
///         if let Some(machine) = weak.upgrade() {
///             assert!(machine.is_pending());
///         }
///         Ok(())
///     }),
/// );
///
/// fsm.fire("melt").unwrap();
/// ```
pub struct WeakStateMachine<D = ()> {
    shared: Weak<Shared<D>>,
}

impl<D> WeakStateMachine<D> {
    /// The machine, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<StateMachine<D>> {
        self.shared.upgrade().map(|shared| StateMachine { shared })
    }
}

impl<D> Clone for WeakStateMachine<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<D> std::fmt::Debug for WeakStateMachine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakStateMachine")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl<D: Send + Sync + 'static> StateMachine<D> {
    pub(crate) fn new(
        registry: Registry,
        hooks: HashMap<Hook, HookFn>,
        plugins: Vec<Arc<dyn Plugin>>,
        data: D,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: Uuid::new_v4(),
                registry,
                hooks,
                plugins,
                data,
                runtime: Mutex::new(Runtime {
                    state: NONE.to_string(),
                    pending: false,
                    listeners: ListenerTable::new(),
                }),
                init: Mutex::new(None),
            }),
        }
    }

    fn runtime(&self) -> MutexGuard<'_, Runtime> {
        self.shared
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Identifier used to correlate this machine's log events.
    pub fn id(&self) -> Uuid {
        self.shared.id
    }

    /// A handle that does not keep the machine alive.
    pub fn downgrade(&self) -> WeakStateMachine<D> {
        WeakStateMachine {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Current state, or `"none"` before the initial transition commits.
    pub fn state(&self) -> String {
        self.runtime().state.clone()
    }

    /// The payload supplied at construction.
    pub fn data(&self) -> &D {
        &self.shared.data
    }

    /// True while a transition is in flight.
    pub fn is_pending(&self) -> bool {
        self.runtime().pending
    }

    /// Distinct states in first-occurrence order.
    pub fn all_states(&self) -> &[String] {
        self.shared.registry.states()
    }

    /// Distinct transition names in first-occurrence order.
    pub fn all_transitions(&self) -> &[String] {
        self.shared.registry.transition_names()
    }

    /// Every transition definition as declared.
    pub fn definitions(&self) -> &[TransitionDef] {
        self.shared.registry.definitions()
    }

    /// Transitions declared out of the current state.
    pub fn possible_transitions(&self) -> Vec<String> {
        let state = self.state();
        self.shared
            .registry
            .possible_transitions(&state)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// True iff no transition leaves the current state.
    pub fn is_final_state(&self) -> bool {
        self.possible_transitions().is_empty()
    }

    /// True if `transition` could start right now.
    pub fn can(&self, transition: &str) -> bool {
        let runtime = self.runtime();
        Guard::new(&self.shared.registry, &runtime.state, runtime.pending).can(transition)
    }

    /// Negation of [`can`](StateMachine::can).
    pub fn cannot(&self, transition: &str) -> bool {
        !self.can(transition)
    }

    /// Append `listener` to `family`; listeners run in registration order.
    pub fn add_event_listener(&self, family: ListenerFamily, listener: Listener) {
        self.runtime().listeners.add(family, listener);
    }

    /// Remove `listener` from `family`, matching by reference.
    pub fn remove_event_listener(&self, family: ListenerFamily, listener: &Listener) {
        self.runtime().listeners.remove(family, listener);
    }

    /// Fire `transition` with no extra arguments.
    pub fn fire(&self, transition: &str) -> Result<Fire, FsmError> {
        self.fire_with(transition, Vec::new())
    }

    /// Fire `transition`, forwarding `args` to every hook in the event payload.
    ///
    /// Returns synchronously when no hook deferred. A gating hook returning
    /// `false` surfaces as [`FsmError::Cancelled`], either here or from the
    /// deferred future. Rejections go to `onInvalidTransition` or
    /// `onPendingTransition` when configured, otherwise they are returned as
    /// errors.
    pub fn fire_with(&self, transition: &str, args: Vec<Value>) -> Result<Fire, FsmError> {
        let mut runtime = self.runtime();
        let current = runtime.state.clone();
        let verdict = Guard::new(&self.shared.registry, &current, runtime.pending).verdict(transition);

        match verdict {
            Verdict::Allowed(def) => {
                runtime.pending = true;
                drop(runtime);

                tracing::debug!(
                    machine = %self.id(),
                    transition,
                    from = %current,
                    to = %def.to,
                    "transition.start"
                );
                let event = LifecycleEvent::new(transition, def.from.clone(), def.to.clone(), args);
                Attempt::new(self, AttemptKind::Transition, current, event).run()
            }
            Verdict::Pending(def) => {
                drop(runtime);
                self.reject(Hook::PendingTransition, def, &current, args)
            }
            Verdict::Invalid(def) => {
                drop(runtime);
                self.reject(Hook::InvalidTransition, def, &current, args)
            }
            Verdict::Unknown => Err(FsmError::UnknownTransition {
                name: transition.to_string(),
            }),
        }
    }

    /// Drive a deferred initial transition to completion.
    ///
    /// Every caller waits for the same initial transition, so once any
    /// `ready` resolves the machine is no longer pending. Resolves
    /// immediately when the initial transition settled during construction.
    pub async fn ready(&self) -> Result<(), FsmError> {
        let parked = self
            .shared
            .init
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(pending) = parked {
            pending.await?;
        }
        Ok(())
    }

    /// Run the synthetic initial transition into `init`.
    pub(crate) fn initialize(&self, init: &str) -> Result<(), FsmError> {
        let fire = if self.shared.registry.has_state(init) {
            self.runtime().pending = true;
            Attempt::init(self, init).run()?
        } else {
            let def = TransitionDef::new(INIT, NONE, init);
            self.reject(Hook::InvalidTransition, &def, NONE, Vec::new())?
        };

        if let Fire::Deferred(pending) = fire {
            *self
                .shared
                .init
                .lock()
                .unwrap_or_else(PoisonError::into_inner) = Some(pending.shared());
        }
        Ok(())
    }

    /// Step back to `target` through the full pipeline, bypassing the
    /// registry but not the pending guard.
    pub(crate) fn rewind(&self, target: &str) -> Result<Fire, FsmError> {
        let mut runtime = self.runtime();
        let current = runtime.state.clone();
        let def = TransitionDef::new(HISTORY_BACK, current.as_str(), target);

        if runtime.pending {
            drop(runtime);
            return self.reject(Hook::PendingTransition, &def, &current, Vec::new());
        }
        runtime.pending = true;
        drop(runtime);

        tracing::debug!(machine = %self.id(), from = %current, to = target, "history.back");
        let event = LifecycleEvent::new(HISTORY_BACK, def.from, def.to, Vec::new());
        Attempt::new(self, AttemptKind::Rewind, current, event).run()
    }

    fn reject(
        &self,
        hook: Hook,
        def: &TransitionDef,
        current: &str,
        args: Vec<Value>,
    ) -> Result<Fire, FsmError> {
        tracing::debug!(
            machine = %self.id(),
            transition = %def.name,
            current,
            hook = %hook,
            "transition.rejected"
        );

        let Some(callback) = self.hook(&hook) else {
            return Err(rejection(&hook, def, current));
        };

        let event = LifecycleEvent::new(def.name.clone(), def.from.clone(), def.to.clone(), args);
        match callback(&event).map_err(|source| FsmError::hook(&hook, source))? {
            HookOutput::Sync(_) => Ok(Fire::Ready(Outcome::Handled)),
            HookOutput::Deferred(pending) => Ok(Fire::Deferred(Box::pin(async move {
                pending
                    .await
                    .map_err(|source| FsmError::hook(&hook, source))?;
                Ok(Outcome::Handled)
            }))),
        }
    }

    pub(crate) fn hook(&self, hook: &Hook) -> Option<HookFn> {
        self.shared.hooks.get(hook).cloned()
    }

    pub(crate) fn dispatch(
        &self,
        family: ListenerFamily,
        event: &LifecycleEvent,
    ) -> Result<(), FsmError> {
        let listeners = self.runtime().listeners.snapshot(family);
        for listener in listeners {
            listener(event).map_err(|source| FsmError::hook(&family.hook(), source))?;
        }
        Ok(())
    }

    pub(crate) fn commit(&self, kind: AttemptKind, leaving: &str, event: &LifecycleEvent) {
        self.runtime().state = event.to.clone();
        tracing::debug!(
            machine = %self.id(),
            transition = %event.transition,
            from = leaving,
            to = %event.to,
            "transition.commit"
        );

        let commit = Commit {
            transition: event.transition.clone(),
            from: leaving.to_string(),
            to: event.to.clone(),
        };
        for plugin in &self.shared.plugins {
            match kind {
                AttemptKind::Transition => plugin.committed(&commit),
                AttemptKind::Rewind => plugin.rewound(&commit),
                AttemptKind::Init => {}
            }
        }
    }

    pub(crate) fn release(&self) {
        self.runtime().pending = false;
        tracing::trace!(machine = %self.id(), "transition.release");
    }
}

fn rejection(hook: &Hook, def: &TransitionDef, current: &str) -> FsmError {
    let (transition, from, to, current) = (
        def.name.clone(),
        def.from.clone(),
        def.to.clone(),
        current.to_string(),
    );
    match hook {
        Hook::PendingTransition => FsmError::TransitionPending {
            transition,
            from,
            to,
            current,
        },
        _ => FsmError::InvalidTransition {
            transition,
            from,
            to,
            current,
        },
    }
}

impl<D: std::fmt::Debug> std::fmt::Debug for StateMachine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let runtime = self
            .shared
            .runtime
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("StateMachine")
            .field("id", &self.shared.id)
            .field("state", &runtime.state)
            .field("pending", &runtime.pending)
            .field("data", &self.shared.data)
            .finish()
    }
}
