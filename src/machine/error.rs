//! Runtime errors raised by transition attempts.

use crate::core::Sources;
use crate::lifecycle::{Hook, HookError};
use thiserror::Error;

/// Errors that can occur while firing a transition.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FsmError {
    #[error("Invalid transition '{transition}' from state '{current}' (declared {from} -> {to})")]
    InvalidTransition {
        transition: String,
        from: Sources,
        to: String,
        current: String,
    },

    #[error("Transition '{transition}' requested while another transition is pending (state '{current}')")]
    TransitionPending {
        transition: String,
        from: Sources,
        to: String,
        current: String,
    },

    #[error("Unknown transition '{name}'")]
    UnknownTransition { name: String },

    #[error("Transition '{transition}' from {from} to '{to}' was cancelled by a hook")]
    Cancelled {
        transition: String,
        from: Sources,
        to: String,
    },

    #[error("Hook '{hook}' failed: {source}")]
    Hook {
        hook: String,
        #[source]
        source: HookError,
    },

    #[error("History has fewer than two entries")]
    EmptyHistory,
}

impl FsmError {
    pub(crate) fn hook(hook: &Hook, source: HookError) -> Self {
        Self::Hook {
            hook: hook.name(),
            source,
        }
    }

    /// True for errors produced by the guard before any hook ran.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::TransitionPending { .. }
                | Self::UnknownTransition { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_message() {
        let err = FsmError::InvalidTransition {
            transition: "melt".to_string(),
            from: Sources::from("solid"),
            to: "liquid".to_string(),
            current: "gas".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Invalid transition 'melt' from state 'gas' (declared solid -> liquid)"
        );
        assert!(err.is_rejection());
    }

    #[test]
    fn hook_error_keeps_source() {
        let err = FsmError::hook(&Hook::before("melt"), HookError::new("too cold"));

        assert_eq!(err.to_string(), "Hook 'onBeforeMelt' failed: too cold");
        assert!(!err.is_rejection());
        assert!(std::error::Error::source(&err).is_some());
    }
}
