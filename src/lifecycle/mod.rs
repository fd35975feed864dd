//! Lifecycle hook vocabulary.
//!
//! Every transition runs an ordered pipeline of hooks:
//!
//! 1. `onBeforeTransition`, `onBefore<T>`
//! 2. `onLeaveState`, `onLeave<S>`
//! 3. `onTransition`
//! 4. `onEnterState`, `onEnter<S>`, `on<S>`
//! 5. `onAfterTransition`, `onAfter<T>`, `on<T>`
//!
//! Hooks in the first three steps are gating: returning `false` cancels the
//! transition. Hooks are identified by the [`Hook`] enum; camelCase names are
//! derived only for payloads and diagnostics.

mod event;
mod hook;
mod listeners;
mod naming;

pub use event::LifecycleEvent;
pub use hook::{DeferredHook, Hook, HookError, HookFn, HookOutput, HookResult};
pub use listeners::{Listener, ListenerFamily, ListenerTable};
pub use naming::{camelize, prepended};
