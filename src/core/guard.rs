//! Guard logic deciding whether a transition may start.
//!
//! Guards are pure: they read a snapshot of the machine (current state and
//! pending flag) and never mutate it.

use super::registry::Registry;
use super::state::TransitionDef;

/// Outcome of checking a transition request against a machine snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Verdict<'a> {
    /// The transition may start using this definition.
    Allowed(&'a TransitionDef),

    /// Another transition is in flight. Carries the first definition
    /// declared under the requested name, for error reporting.
    Pending(&'a TransitionDef),

    /// No definition under this name leaves the current state.
    Invalid(&'a TransitionDef),

    /// No definition is declared under this name at all.
    Unknown,
}

/// Snapshot guard over a registry.
///
/// The pending flag dominates: a request made while another transition is in
/// flight is reported as pending even if it would also be invalid.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::{Guard, Registry, TransitionDef, Verdict};
///
/// let registry = Registry::new(vec![TransitionDef::new("melt", "solid", "liquid")]);
///
/// let idle = Guard::new(&registry, "solid", false);
/// assert!(idle.can("melt"));
/// assert!(matches!(idle.verdict("melt"), Verdict::Allowed(_)));
///
/// let busy = Guard::new(&registry, "solid", true);
/// assert!(busy.cannot("melt"));
/// assert!(matches!(busy.verdict("melt"), Verdict::Pending(_)));
/// ```
pub struct Guard<'a> {
    registry: &'a Registry,
    current: &'a str,
    pending: bool,
}

impl<'a> Guard<'a> {
    pub fn new(registry: &'a Registry, current: &'a str, pending: bool) -> Self {
        Self {
            registry,
            current,
            pending,
        }
    }

    /// Classify a request for `name`.
    pub fn verdict(&self, name: &str) -> Verdict<'a> {
        let Some(first) = self.registry.first_named(name) else {
            return Verdict::Unknown;
        };

        if self.pending {
            return Verdict::Pending(first);
        }

        match self.registry.select(name, self.current) {
            Some(def) => Verdict::Allowed(def),
            None => Verdict::Invalid(first),
        }
    }

    /// True if `name` is performable now.
    pub fn can(&self, name: &str) -> bool {
        matches!(self.verdict(name), Verdict::Allowed(_))
    }

    pub fn cannot(&self, name: &str) -> bool {
        !self.can(name)
    }
}
