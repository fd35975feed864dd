//! Lifecycle FSM: a finite state machine runtime with lifecycle hooks
//!
//! A machine is declared as a list of named transitions between string
//! states. Every transition runs an ordered pipeline of lifecycle hooks that
//! can cancel it, observe it, or defer it behind a future.
//!
//! # Core Concepts
//!
//! - **Transitions**: named edges from one or more states to one state
//! - **Hooks**: callbacks keyed by [`Hook`], fired in a fixed order
//! - **Listeners**: observers attached at runtime to the general hooks
//! - **Pending**: at most one transition is in flight; others are rejected
//! - **Plugins**: observers of committed transitions, such as [`History`]
//!
//! # Example
//!
//! ```rust
//! use lifecycle_fsm::builder::Lifecycles;
//! use lifecycle_fsm::lifecycle::{Hook, HookOutput};
//! use lifecycle_fsm::{transitions, FsmError, StateMachine, StateMachineBuilder};
//!
//! let fsm: StateMachine = StateMachineBuilder::new()
//!     .init("solid")
//!     .transitions(transitions![
//!         melt: "solid" => "liquid",
//!         freeze: "liquid" => "solid",
//!         vaporize: "liquid" => "gas",
//!         condense: "gas" => "liquid",
//!     ])
//!     .lifecycles(
//!         Lifecycles::new().on(Hook::before("vaporize"), |_| Ok(HookOutput::cancel())),
//!     )
//!     .build()
//!     .unwrap();
//!
//! fsm.fire("melt").unwrap();
//! assert_eq!(fsm.state(), "liquid");
//!
//! assert!(matches!(fsm.fire("vaporize"), Err(FsmError::Cancelled { .. })));
//! assert_eq!(fsm.state(), "liquid");
//! ```

pub mod builder;
pub mod core;
pub mod lifecycle;
pub mod machine;
pub mod plugins;

// Re-export commonly used types
pub use builder::{BuildError, Lifecycles, StateMachineBuilder};
pub use core::{Sources, TransitionDef};
pub use lifecycle::{Hook, HookError, HookOutput, LifecycleEvent, ListenerFamily};
pub use machine::{Fire, FsmError, Outcome, StateMachine, WeakStateMachine};
pub use plugins::History;
