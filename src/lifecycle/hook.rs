//! Lifecycle hook identifiers, callbacks and their results.

use super::event::LifecycleEvent;
use super::naming::prepended;
use futures::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Identifies one lifecycle hook by kind and, where relevant, subject.
///
/// General hooks fire for every transition. Transition hooks are keyed by
/// transition name and state hooks by state name.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::lifecycle::Hook;
///
/// assert_eq!(Hook::BeforeTransition.name(), "onBeforeTransition");
/// assert_eq!(Hook::before("melt").name(), "onBeforeMelt");
/// assert_eq!(Hook::leave("solid").name(), "onLeaveSolid");
/// assert_eq!(Hook::on_state("liquid").name(), "onLiquid");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeTransition,
    LeaveState,
    Transition,
    EnterState,
    AfterTransition,
    InvalidTransition,
    PendingTransition,
    /// Last hook of the initial transition.
    Init,
    /// Fired just before [`Hook::Init`].
    AfterInit,
    /// `onBefore<T>`
    Before(String),
    /// `onAfter<T>`
    After(String),
    /// `on<T>`, shorthand fired after `onAfter<T>`
    OnTransition(String),
    /// `onLeave<S>`
    Leave(String),
    /// `onEnter<S>`
    Enter(String),
    /// `on<S>`, shorthand fired after `onEnter<S>`
    OnState(String),
}

impl Hook {
    /// Hooks that exist regardless of the declared transitions.
    pub const RESERVED: [Hook; 9] = [
        Hook::BeforeTransition,
        Hook::LeaveState,
        Hook::Transition,
        Hook::EnterState,
        Hook::AfterTransition,
        Hook::InvalidTransition,
        Hook::PendingTransition,
        Hook::Init,
        Hook::AfterInit,
    ];

    pub fn before(transition: impl Into<String>) -> Self {
        Self::Before(transition.into())
    }

    pub fn after(transition: impl Into<String>) -> Self {
        Self::After(transition.into())
    }

    pub fn on_transition(transition: impl Into<String>) -> Self {
        Self::OnTransition(transition.into())
    }

    pub fn leave(state: impl Into<String>) -> Self {
        Self::Leave(state.into())
    }

    pub fn enter(state: impl Into<String>) -> Self {
        Self::Enter(state.into())
    }

    pub fn on_state(state: impl Into<String>) -> Self {
        Self::OnState(state.into())
    }

    /// The three hooks derived from a transition name.
    pub fn for_transition(name: &str) -> [Hook; 3] {
        [
            Self::before(name),
            Self::after(name),
            Self::on_transition(name),
        ]
    }

    /// The three hooks derived from a state name.
    pub fn for_state(name: &str) -> [Hook; 3] {
        [Self::leave(name), Self::enter(name), Self::on_state(name)]
    }

    /// The camelCase identifier of this hook, e.g. `onBeforeMelt`.
    pub fn name(&self) -> String {
        match self {
            Self::BeforeTransition => "onBeforeTransition".to_string(),
            Self::LeaveState => "onLeaveState".to_string(),
            Self::Transition => "onTransition".to_string(),
            Self::EnterState => "onEnterState".to_string(),
            Self::AfterTransition => "onAfterTransition".to_string(),
            Self::InvalidTransition => "onInvalidTransition".to_string(),
            Self::PendingTransition => "onPendingTransition".to_string(),
            Self::Init => "onInit".to_string(),
            Self::AfterInit => "onAfterInit".to_string(),
            Self::Before(t) => prepended("onBefore", t),
            Self::After(t) => prepended("onAfter", t),
            Self::OnTransition(t) => prepended("on", t),
            Self::Leave(s) => prepended("onLeave", s),
            Self::Enter(s) => prepended("onEnter", s),
            Self::OnState(s) => prepended("on", s),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Failure raised by a hook or listener.
///
/// Hook failures are never caught by the machine; they surface to the caller
/// of the transition that triggered them.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct HookError {
    pub message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deferred hook result. Resolves to `false` to cancel a gating stage.
pub type DeferredHook = BoxFuture<'static, Result<bool, HookError>>;

/// Value returned by a hook: either settled now or deferred.
///
/// Only gating hooks (before, leave and transition stages) can cancel. For
/// every other hook the boolean is ignored, but a deferred result is still
/// awaited before the pipeline moves on.
pub enum HookOutput {
    Sync(bool),
    Deferred(DeferredHook),
}

impl HookOutput {
    /// Continue the transition.
    pub fn proceed() -> Self {
        Self::Sync(true)
    }

    /// Cancel the transition when returned from a gating hook.
    pub fn cancel() -> Self {
        Self::Sync(false)
    }

    /// Wrap a future; the pipeline suspends until it settles.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<bool, HookError>> + Send + 'static,
    {
        Self::Deferred(Box::pin(future))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }
}

impl From<bool> for HookOutput {
    fn from(proceed: bool) -> Self {
        Self::Sync(proceed)
    }
}

impl From<()> for HookOutput {
    fn from(_: ()) -> Self {
        Self::proceed()
    }
}

impl fmt::Debug for HookOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(proceed) => f.debug_tuple("Sync").field(proceed).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

pub type HookResult = Result<HookOutput, HookError>;

/// Shared hook callback.
pub type HookFn = Arc<dyn Fn(&LifecycleEvent) -> HookResult + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names() {
        let names: Vec<String> = Hook::RESERVED.iter().map(Hook::name).collect();
        assert_eq!(
            names,
            vec![
                "onBeforeTransition",
                "onLeaveState",
                "onTransition",
                "onEnterState",
                "onAfterTransition",
                "onInvalidTransition",
                "onPendingTransition",
                "onInit",
                "onAfterInit",
            ]
        );
    }

    #[test]
    fn derived_families() {
        let transition: Vec<String> = Hook::for_transition("step").iter().map(Hook::name).collect();
        let state: Vec<String> = Hook::for_state("A").iter().map(Hook::name).collect();

        assert_eq!(transition, vec!["onBeforeStep", "onAfterStep", "onStep"]);
        assert_eq!(state, vec!["onLeaveA", "onEnterA", "onA"]);
    }

    #[test]
    fn transition_and_state_shorthands_can_share_a_name() {
        assert_eq!(Hook::on_transition("go").name(), Hook::on_state("go").name());
        assert_ne!(Hook::on_transition("go"), Hook::on_state("go"));
    }

    #[test]
    fn output_conversions() {
        assert!(matches!(HookOutput::from(true), HookOutput::Sync(true)));
        assert!(matches!(HookOutput::from(false), HookOutput::Sync(false)));
        assert!(matches!(HookOutput::from(()), HookOutput::Sync(true)));
        assert!(HookOutput::deferred(async { Ok(true) }).is_deferred());
        assert!(!HookOutput::cancel().is_deferred());
    }

    #[test]
    fn hook_error_displays_message() {
        assert_eq!(HookError::new("boom").to_string(), "boom");
    }
}
