//! Build errors for state machine construction.

use crate::machine::FsmError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state not specified. Call .init(state) before .build()")]
    MissingInitialState,

    #[error("No transitions defined. Add at least one transition")]
    NoTransitions,

    #[error("Hook names collide: {}", names.join(", "))]
    HookNameCollision { names: Vec<String> },

    #[error("Transition name '{name}' is reserved by an attached plugin")]
    ReservedTransition { name: String },

    #[error("Lifecycle hook '{name}' does not match any transition or state")]
    UnknownHook { name: String },

    #[error("Initial transition failed: {0}")]
    Init(#[from] FsmError),
}
