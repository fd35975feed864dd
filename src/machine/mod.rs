//! The running state machine and its transition pipeline.
//!
//! # Key Concepts
//!
//! - **StateMachine**: shared handle holding the current state, pending flag
//!   and listener table
//! - **Pipeline**: the ordered, cancelable hook sequence run by every
//!   transition, synchronous until a hook defers
//! - **Fire**: the result of a transition request, ready or deferred

mod error;
mod fire;
mod handle;
mod pipeline;

pub use error::FsmError;
pub use fire::{Fire, Outcome, TransitionFuture};
pub use handle::{StateMachine, WeakStateMachine};
pub(crate) use pipeline::HISTORY_BACK;
