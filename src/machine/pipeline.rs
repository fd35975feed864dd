//! The transition pipeline.
//!
//! An [`Attempt`] owns the ordered stage plan for one transition and walks it
//! synchronously until a hook defers. From that point the remaining stages
//! run as continuations of the deferred result, in the same order. The
//! machine's pending flag is released when the attempt is dropped, whichever
//! way it ends.
//!
//! A caller-driven attempt keeps its machine alive until it settles. The
//! initial attempt is parked inside the machine, so it only holds a weak
//! handle and is abandoned when the last strong handle goes.

use super::error::FsmError;
use super::fire::{Fire, Outcome};
use super::handle::{StateMachine, WeakStateMachine};
use crate::core::{Sources, INIT, NONE};
use crate::lifecycle::{DeferredHook, Hook, HookOutput, LifecycleEvent, ListenerFamily};
use uuid::Uuid;

/// Name of the synthetic transition used to step back through history.
pub(crate) const HISTORY_BACK: &str = "historyBack";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttemptKind {
    /// A declared transition fired by the caller.
    Transition,
    /// The synthetic entry into the initial state.
    Init,
    /// A synthetic step back to the previous history entry.
    Rewind,
}

#[derive(Clone, Debug, PartialEq)]
enum Stage {
    Hook { hook: Hook, gating: bool },
    Listeners(ListenerFamily),
    Commit,
}

enum Progress {
    Finished,
    Aborted,
    Suspended(Suspension),
}

struct Suspension {
    hook: Hook,
    gating: bool,
    next: usize,
    pending: DeferredHook,
}

pub(crate) struct Attempt<D: Send + Sync + 'static> {
    id: Uuid,
    machine: WeakStateMachine<D>,
    anchor: Option<StateMachine<D>>,
    kind: AttemptKind,
    leaving: String,
    event: LifecycleEvent,
    plan: Vec<Stage>,
}

impl<D: Send + Sync + 'static> Attempt<D> {
    /// Plan a transition out of `leaving`. The caller must already have set
    /// the machine's pending flag.
    pub(crate) fn new(
        machine: &StateMachine<D>,
        kind: AttemptKind,
        leaving: String,
        event: LifecycleEvent,
    ) -> Self {
        let (plan, anchor) = match kind {
            AttemptKind::Init => (init_plan(&event), None),
            AttemptKind::Transition | AttemptKind::Rewind => {
                (full_plan(&event, &leaving), Some(machine.clone()))
            }
        };
        Self {
            id: machine.id(),
            machine: machine.downgrade(),
            anchor,
            kind,
            leaving,
            event,
            plan,
        }
    }

    /// Plan the initial transition into `init`.
    pub(crate) fn init(machine: &StateMachine<D>, init: &str) -> Self {
        let event = LifecycleEvent::new(INIT, Sources::from(NONE), init, Vec::new());
        Self::new(machine, AttemptKind::Init, NONE.to_string(), event)
    }

    /// Run until the pipeline finishes, aborts, or a hook defers.
    pub(crate) fn run(self) -> Result<Fire, FsmError> {
        match self.advance(0)? {
            Progress::Finished => Ok(Fire::Ready(self.entered())),
            Progress::Aborted => Err(self.cancelled()),
            Progress::Suspended(suspension) => {
                tracing::debug!(
                    machine = %self.id,
                    transition = %self.event.transition,
                    hook = %suspension.hook,
                    "transition.deferred"
                );
                Ok(Fire::Deferred(Box::pin(self.resume(suspension))))
            }
        }
    }

    async fn resume(self, mut suspension: Suspension) -> Result<Outcome, FsmError> {
        loop {
            let Suspension {
                hook,
                gating,
                next,
                pending,
            } = suspension;

            let proceed = pending
                .await
                .map_err(|source| FsmError::hook(&hook, source))?;
            if gating && !proceed {
                tracing::debug!(machine = %self.id, hook = %hook, "hook.cancelled");
                return Err(self.cancelled());
            }

            match self.advance(next)? {
                Progress::Finished => return Ok(self.entered()),
                Progress::Aborted => return Err(self.cancelled()),
                Progress::Suspended(again) => suspension = again,
            }
        }
    }

    fn advance(&self, start: usize) -> Result<Progress, FsmError> {
        let Some(machine) = self.machine.upgrade() else {
            tracing::debug!(machine = %self.id, "transition.abandoned");
            return Ok(Progress::Aborted);
        };

        for (index, stage) in self.plan.iter().enumerate().skip(start) {
            match stage {
                Stage::Hook { hook, gating } => match self.call(&machine, hook)? {
                    HookOutput::Sync(true) => {}
                    HookOutput::Sync(false) => {
                        if *gating {
                            tracing::debug!(machine = %self.id, hook = %hook, "hook.cancelled");
                            return Ok(Progress::Aborted);
                        }
                    }
                    HookOutput::Deferred(pending) => {
                        return Ok(Progress::Suspended(Suspension {
                            hook: hook.clone(),
                            gating: *gating,
                            next: index + 1,
                            pending,
                        }));
                    }
                },
                Stage::Listeners(family) => machine.dispatch(*family, &self.event)?,
                Stage::Commit => machine.commit(self.kind, &self.leaving, &self.event),
            }
        }
        Ok(Progress::Finished)
    }

    fn call(&self, machine: &StateMachine<D>, hook: &Hook) -> Result<HookOutput, FsmError> {
        let Some(callback) = machine.hook(hook) else {
            return Ok(HookOutput::proceed());
        };
        tracing::trace!(
            machine = %self.id,
            transition = %self.event.transition,
            hook = %hook,
            "hook.call"
        );
        callback(&self.event).map_err(|source| FsmError::hook(hook, source))
    }

    fn entered(&self) -> Outcome {
        Outcome::Entered(self.event.to.clone())
    }

    fn cancelled(&self) -> FsmError {
        FsmError::Cancelled {
            transition: self.event.transition.clone(),
            from: self.event.from.clone(),
            to: self.event.to.clone(),
        }
    }
}

impl<D: Send + Sync + 'static> Drop for Attempt<D> {
    fn drop(&mut self) {
        let machine = self.anchor.take().or_else(|| self.machine.upgrade());
        if let Some(machine) = machine {
            machine.release();
        }
    }
}

fn full_plan(event: &LifecycleEvent, leaving: &str) -> Vec<Stage> {
    let transition = event.transition.as_str();
    let mut plan = vec![
        gate(Hook::BeforeTransition),
        Stage::Listeners(ListenerFamily::BeforeTransition),
        gate(Hook::before(transition)),
        gate(Hook::LeaveState),
        Stage::Listeners(ListenerFamily::LeaveState),
        gate(Hook::leave(leaving)),
        gate(Hook::Transition),
        Stage::Listeners(ListenerFamily::Transition),
        Stage::Commit,
    ];
    plan.extend(enter_stages(&event.to));
    plan.extend([
        observe(Hook::after(transition)),
        observe(Hook::on_transition(transition)),
    ]);
    plan
}

// The initial transition skips the before group; its `onAfter<T>` and
// `on<T>` slots are the dedicated init hooks.
fn init_plan(event: &LifecycleEvent) -> Vec<Stage> {
    let mut plan = vec![Stage::Commit];
    plan.extend(enter_stages(&event.to));
    plan.extend([observe(Hook::AfterInit), observe(Hook::Init)]);
    plan
}

fn enter_stages(to: &str) -> [Stage; 6] {
    [
        observe(Hook::EnterState),
        Stage::Listeners(ListenerFamily::EnterState),
        observe(Hook::enter(to)),
        observe(Hook::on_state(to)),
        observe(Hook::AfterTransition),
        Stage::Listeners(ListenerFamily::AfterTransition),
    ]
}

fn gate(hook: Hook) -> Stage {
    Stage::Hook { hook, gating: true }
}

fn observe(hook: Hook) -> Stage {
    Stage::Hook {
        hook,
        gating: false,
    }
}
