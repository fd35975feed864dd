//! Lifecycle hook registration.

use crate::builder::error::BuildError;
use crate::core::Registry;
use crate::lifecycle::{Hook, HookFn, HookOutput, HookResult, LifecycleEvent};
use crate::machine::HISTORY_BACK;
use std::collections::HashMap;
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

enum HookRef {
    Typed(Hook),
    Named(String),
}

/// Hook callbacks supplied at construction.
///
/// Hooks can be keyed by [`Hook`] or by their camelCase name. Registering the
/// same hook twice keeps the later callback.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::builder::Lifecycles;
/// use lifecycle_fsm::lifecycle::{Hook, HookOutput};
///
/// let lifecycles = Lifecycles::new()
///     .on(Hook::before("melt"), |_event| Ok(HookOutput::proceed()))
///     .named("onLeaveSolid", |_event| Ok(HookOutput::cancel()))
///     .observe(Hook::EnterState, |event| println!("entered {}", event.to));
///
/// assert_eq!(lifecycles.len(), 3);
/// ```
#[derive(Default)]
pub struct Lifecycles {
    entries: Vec<(HookRef, HookFn)>,
}

impl Lifecycles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `hook`.
    pub fn on<F>(mut self, hook: Hook, callback: F) -> Self
    where
        F: Fn(&LifecycleEvent) -> HookResult + Send + Sync + 'static,
    {
        self.entries.push((HookRef::Typed(hook), Arc::new(callback)));
        self
    }

    /// Register `callback` under a hook name such as `"onBeforeMelt"`.
    /// The name is resolved when the machine is built.
    pub fn named<F>(mut self, name: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&LifecycleEvent) -> HookResult + Send + Sync + 'static,
    {
        self.entries
            .push((HookRef::Named(name.into()), Arc::new(callback)));
        self
    }

    /// Register a callback that never cancels and cannot fail.
    pub fn observe<F>(self, hook: Hook, callback: F) -> Self
    where
        F: Fn(&LifecycleEvent) + Send + Sync + 'static,
    {
        self.on(hook, move |event| {
            callback(event);
            Ok(HookOutput::proceed())
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn extend(&mut self, other: Lifecycles) {
        self.entries.extend(other.entries);
    }

    /// Bind every registration to a hook known to `index`.
    pub(crate) fn resolve(
        self,
        index: &HashMap<String, Hook>,
    ) -> Result<HashMap<Hook, HookFn>, BuildError> {
        let mut hooks = HashMap::with_capacity(self.entries.len());
        for (hook_ref, callback) in self.entries {
            let (name, typed) = match hook_ref {
                HookRef::Typed(hook) => (hook.name(), Some(hook)),
                HookRef::Named(name) => (name, None),
            };
            let hook = match (index.get(&name), typed) {
                (Some(known), Some(typed)) if *known == typed => typed,
                (Some(known), None) => known.clone(),
                _ => return Err(BuildError::UnknownHook { name }),
            };
            hooks.insert(hook, callback);
        }
        Ok(hooks)
    }
}

/// Map every hook name the registry can produce to its hook, failing with
/// every colliding name at once. The `historyBack` hooks are known only when
/// `rewinds` is set.
pub(crate) fn hook_index(
    registry: &Registry,
    rewinds: bool,
) -> Result<HashMap<String, Hook>, BuildError> {
    let rewind_hooks = if rewinds {
        Hook::for_transition(HISTORY_BACK).to_vec()
    } else {
        Vec::new()
    };

    let hooks = Hook::RESERVED
        .into_iter()
        .chain(
            registry
                .transition_names()
                .iter()
                .flat_map(|name| Hook::for_transition(name)),
        )
        .chain(rewind_hooks)
        .chain(
            registry
                .states()
                .iter()
                .flat_map(|state| Hook::for_state(state)),
        );

    let mut index: HashMap<String, Hook> = HashMap::new();
    let mut checks: Vec<Validation<(), NonEmptyVec<String>>> = Vec::new();
    for hook in hooks {
        let name = hook.name();
        let check = match index.get(&name) {
            Some(existing) if *existing != hook => Validation::fail(name.clone()),
            _ => Validation::success(()),
        };
        checks.push(check);
        index.entry(name).or_insert(hook);
    }

    match Validation::all_vec(checks) {
        Validation::Success(_) => Ok(index),
        Validation::Failure(names) => Err(BuildError::HookNameCollision {
            names: names.iter().cloned().collect(),
        }),
    }
}
