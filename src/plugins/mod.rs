//! Plugins observing committed transitions.
//!
//! A plugin is told about every transition the machine commits. The initial
//! transition is not reported. [`History`] is the bundled plugin.

mod history;

pub use history::{History, HistoryEntry};

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub transition: String,
    pub from: String,
    pub to: String,
}

/// Observer of committed transitions.
pub trait Plugin: Send + Sync {
    /// Called when a declared transition commits, before its after hooks run.
    fn committed(&self, commit: &Commit);

    /// Called when a history rewind commits.
    fn rewound(&self, _commit: &Commit) {}

    /// True if this plugin steps the machine back through the synthetic
    /// `historyBack` transition, which makes its hooks registrable.
    fn rewinds(&self) -> bool {
        false
    }
}
