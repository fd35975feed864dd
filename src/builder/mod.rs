//! Builder API for ergonomic state machine construction.
//!
//! This module provides the fluent [`StateMachineBuilder`], hook registration
//! through [`Lifecycles`], a serde-friendly [`MachineConfig`] and the
//! `transitions!` macro.

pub mod config;
pub mod error;
pub mod lifecycles;
pub mod machine;
pub mod macros;

pub use config::MachineConfig;
pub use error::BuildError;
pub use lifecycles::Lifecycles;
pub use machine::StateMachineBuilder;
