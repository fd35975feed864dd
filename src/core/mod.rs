//! Core state machine data and pure logic.
//!
//! This module contains the parts of the machine that never run user code:
//! - State identifiers and transition definitions
//! - The registry of transitions and reachable states
//! - Guard checks deciding whether a transition may start

mod guard;
mod registry;
mod state;

pub use guard::{Guard, Verdict};
pub use registry::Registry;
pub use state::{Sources, TransitionDef, INIT, NONE};
