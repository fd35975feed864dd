//! History recorder plugin.
//!
//! Keeps a bounded, oldest-first record of committed transitions and can
//! step the machine back to the previous entry.

use super::{Commit, Plugin};
use crate::machine::{Fire, FsmError, StateMachine};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Record of a single committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub transition: String,
    pub from: String,
    pub to: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inner {
    max: Option<usize>,
    entries: VecDeque<HistoryEntry>,
}

/// History plugin handle.
///
/// Clones share the same record, so keep one handle and pass a clone to the
/// builder.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::plugins::History;
/// use lifecycle_fsm::{transitions, StateMachine, StateMachineBuilder};
///
/// let history = History::with_max(3);
/// let fsm: StateMachine = StateMachineBuilder::new()
///     .init("A")
///     .transitions(transitions![
///         step: "A" => "B",
///         step: "B" => "C",
///     ])
///     .plugin(history.clone())
///     .build()
///     .unwrap();
///
/// fsm.fire("step").unwrap();
/// fsm.fire("step").unwrap();
/// assert!(history.can_back());
///
/// history.back(&fsm).unwrap();
/// assert_eq!(fsm.state(), "B");
/// assert_eq!(history.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct History {
    inner: Arc<Mutex<Inner>>,
}

impl History {
    /// Unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// History keeping at most `max` entries, evicting the oldest.
    /// A `max` of zero means unbounded.
    pub fn with_max(max: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                max: (max > 0).then_some(max),
                entries: VecDeque::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn max(&self) -> Option<usize> {
        self.lock().max
    }

    /// True iff at least two entries are recorded.
    pub fn can_back(&self) -> bool {
        self.lock().entries.len() >= 2
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// States traversed: the first entry's source, then each destination.
    pub fn path(&self) -> Vec<String> {
        let inner = self.lock();
        let mut path = Vec::with_capacity(inner.entries.len() + 1);
        if let Some(first) = inner.entries.front() {
            path.push(first.from.clone());
        }
        path.extend(inner.entries.iter().map(|entry| entry.to.clone()));
        path
    }

    /// Time between the oldest and newest recorded entries.
    pub fn duration(&self) -> Option<Duration> {
        let inner = self.lock();
        let (first, last) = (inner.entries.front()?, inner.entries.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// Move `machine` back to the destination of the second-most-recent
    /// entry and drop the most recent one.
    ///
    /// The step runs as a `historyBack` transition through the full hook
    /// pipeline, so gating hooks can cancel it and a pending machine rejects
    /// it. Fails with [`FsmError::EmptyHistory`] when [`can_back`] is false.
    ///
    /// [`can_back`]: History::can_back
    pub fn back<D: Send + Sync + 'static>(
        &self,
        machine: &StateMachine<D>,
    ) -> Result<Fire, FsmError> {
        let target = {
            let inner = self.lock();
            let len = inner.entries.len();
            if len < 2 {
                return Err(FsmError::EmptyHistory);
            }
            inner.entries[len - 2].to.clone()
        };
        machine.rewind(&target)
    }

    fn record(&self, commit: &Commit) {
        let mut inner = self.lock();
        inner.entries.push_back(HistoryEntry {
            transition: commit.transition.clone(),
            from: commit.from.clone(),
            to: commit.to.clone(),
            timestamp: Utc::now(),
        });
        if let Some(max) = inner.max {
            while inner.entries.len() > max {
                inner.entries.pop_front();
            }
        }
    }
}

impl Plugin for History {
    fn committed(&self, commit: &Commit) {
        self.record(commit);
    }

    fn rewound(&self, _commit: &Commit) {
        self.lock().entries.pop_back();
    }

    fn rewinds(&self) -> bool {
        true
    }
}
