//! Observer-style listeners attached to the general hook families.

use super::event::LifecycleEvent;
use super::hook::{Hook, HookError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// General hook families that accept externally registered listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerFamily {
    BeforeTransition,
    LeaveState,
    Transition,
    EnterState,
    AfterTransition,
}

impl ListenerFamily {
    pub const ALL: [ListenerFamily; 5] = [
        ListenerFamily::BeforeTransition,
        ListenerFamily::LeaveState,
        ListenerFamily::Transition,
        ListenerFamily::EnterState,
        ListenerFamily::AfterTransition,
    ];

    /// The general hook whose stage these listeners share.
    pub fn hook(self) -> Hook {
        match self {
            Self::BeforeTransition => Hook::BeforeTransition,
            Self::LeaveState => Hook::LeaveState,
            Self::Transition => Hook::Transition,
            Self::EnterState => Hook::EnterState,
            Self::AfterTransition => Hook::AfterTransition,
        }
    }
}

/// Listener callback. Its return value never affects the pipeline; an error
/// propagates to the caller of the transition.
pub type Listener = Arc<dyn Fn(&LifecycleEvent) -> Result<(), HookError> + Send + Sync>;

/// Ordered listener lists, one per family.
#[derive(Default, Clone)]
pub struct ListenerTable {
    lists: HashMap<ListenerFamily, Vec<Listener>>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, family: ListenerFamily, listener: Listener) {
        self.lists.entry(family).or_default().push(listener);
    }

    /// Remove every registration of `listener` (compared by pointer).
    pub fn remove(&mut self, family: ListenerFamily, listener: &Listener) {
        if let Some(list) = self.lists.get_mut(&family) {
            list.retain(|existing| !Arc::ptr_eq(existing, listener));
        }
    }

    /// Listeners of `family` in registration order.
    pub fn snapshot(&self, family: ListenerFamily) -> Vec<Listener> {
        self.lists.get(&family).cloned().unwrap_or_default()
    }

    pub fn len(&self, family: ListenerFamily) -> usize {
        self.lists.get(&family).map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sources;
    use std::sync::Mutex;

    fn recording(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
        let log = Arc::clone(log);
        Arc::new(move |event: &LifecycleEvent| -> Result<(), HookError> {
            log.lock().unwrap().push(format!("{tag}:{}", event.transition));
            Ok(())
        })
    }

    #[test]
    fn families_map_to_general_hooks() {
        let names: Vec<String> = ListenerFamily::ALL.iter().map(|f| f.hook().name()).collect();
        assert_eq!(
            names,
            vec![
                "onBeforeTransition",
                "onLeaveState",
                "onTransition",
                "onEnterState",
                "onAfterTransition",
            ]
        );
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = ListenerTable::new();
        table.add(ListenerFamily::EnterState, recording(&log, "first"));
        table.add(ListenerFamily::EnterState, recording(&log, "second"));

        let event = LifecycleEvent::new("melt", Sources::from("solid"), "liquid", vec![]);
        for listener in table.snapshot(ListenerFamily::EnterState) {
            listener(&event).unwrap();
        }

        assert_eq!(*log.lock().unwrap(), vec!["first:melt", "second:melt"]);
    }

    #[test]
    fn remove_matches_by_reference() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let keep = recording(&log, "keep");
        let drop = recording(&log, "drop");
        let lookalike = recording(&log, "drop");

        let mut table = ListenerTable::new();
        table.add(ListenerFamily::Transition, Arc::clone(&keep));
        table.add(ListenerFamily::Transition, Arc::clone(&drop));

        table.remove(ListenerFamily::Transition, &lookalike);
        assert_eq!(table.len(ListenerFamily::Transition), 2);

        table.remove(ListenerFamily::Transition, &drop);
        assert_eq!(table.len(ListenerFamily::Transition), 1);
        assert!(Arc::ptr_eq(&table.snapshot(ListenerFamily::Transition)[0], &keep));
    }

    #[test]
    fn families_are_independent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = ListenerTable::new();
        assert!(table.is_empty());

        table.add(ListenerFamily::BeforeTransition, recording(&log, "a"));

        assert_eq!(table.len(ListenerFamily::BeforeTransition), 1);
        assert_eq!(table.len(ListenerFamily::AfterTransition), 0);
        assert!(!table.is_empty());
    }
}
