//! Result of firing a transition.

use super::error::FsmError;
use futures::future::{self, BoxFuture};
use std::future::IntoFuture;

/// Future returned when some hook in the pipeline deferred its result.
pub type TransitionFuture = BoxFuture<'static, Result<Outcome, FsmError>>;

/// How a transition attempt settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The machine committed and entered this state.
    Entered(String),

    /// The request was rejected and an `onInvalidTransition` or
    /// `onPendingTransition` hook absorbed the rejection.
    Handled,
}

impl Outcome {
    /// The entered state, if the transition committed.
    pub fn state(&self) -> Option<&str> {
        match self {
            Self::Entered(state) => Some(state),
            Self::Handled => None,
        }
    }
}

/// Value returned by [`StateMachine::fire`](crate::StateMachine::fire).
///
/// When every hook returned synchronously the outcome is [`Fire::Ready`].
/// Once any hook defers, the rest of the pipeline runs inside the returned
/// future, and the machine stays pending until that future is driven to
/// completion. Awaiting a `Fire` works in both cases:
///
/// ```rust
/// # use lifecycle_fsm::{StateMachine, StateMachineBuilder, TransitionDef, FsmError};
/// # async fn demo() -> Result<(), FsmError> {
/// # let fsm: StateMachine = StateMachineBuilder::new()
/// #     .init("solid")
/// #     .transition(TransitionDef::new("melt", "solid", "liquid"))
/// #     .build()
/// #     .unwrap();
/// let outcome = fsm.fire("melt")?.await?;
/// assert_eq!(outcome.state(), Some("liquid"));
/// # Ok(())
/// # }
/// ```
pub enum Fire {
    Ready(Outcome),
    Deferred(TransitionFuture),
}

impl Fire {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// The outcome, if the attempt settled synchronously.
    pub fn ready(self) -> Option<Outcome> {
        match self {
            Self::Ready(outcome) => Some(outcome),
            Self::Deferred(_) => None,
        }
    }
}

impl IntoFuture for Fire {
    type Output = Result<Outcome, FsmError>;
    type IntoFuture = TransitionFuture;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Self::Ready(outcome) => Box::pin(future::ready(Ok(outcome))),
            Self::Deferred(pending) => pending,
        }
    }
}

impl std::fmt::Debug for Fire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(outcome) => f.debug_tuple("Ready").field(outcome).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_state() {
        assert_eq!(Outcome::Entered("B".to_string()).state(), Some("B"));
        assert_eq!(Outcome::Handled.state(), None);
    }

    #[tokio::test]
    async fn ready_fire_awaits_immediately() {
        let fire = Fire::Ready(Outcome::Entered("B".to_string()));
        assert!(!fire.is_deferred());
        assert_eq!(fire.await, Ok(Outcome::Entered("B".to_string())));
    }

    #[tokio::test]
    async fn deferred_fire_awaits_inner_future() {
        let fire = Fire::Deferred(Box::pin(async { Ok(Outcome::Handled) }));
        assert!(fire.is_deferred());
        assert_eq!(fire.await, Ok(Outcome::Handled));
    }

    #[test]
    fn ready_extracts_sync_outcome() {
        let fire = Fire::Deferred(Box::pin(async { Ok(Outcome::Handled) }));
        assert!(fire.ready().is_none());
        assert_eq!(Fire::Ready(Outcome::Handled).ready(), Some(Outcome::Handled));
    }
}
