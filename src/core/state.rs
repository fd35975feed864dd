//! State identifiers and transition definitions.
//!
//! States and transitions are plain string identifiers. A transition
//! definition names one edge of the machine: one or more source states
//! and exactly one destination.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel state held before the initial transition has committed.
pub const NONE: &str = "none";

/// Name of the synthetic transition that enters the initial state.
pub const INIT: &str = "init";

/// Source side of a transition: a single state or a list of eligible states.
///
/// Serialized untagged, so both `"solid"` and `["B", "C"]` deserialize.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::Sources;
///
/// let one = Sources::from("solid");
/// let many = Sources::from(["B", "C", "D"]);
///
/// assert!(one.contains("solid"));
/// assert!(many.contains("C"));
/// assert!(!many.contains("A"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sources {
    One(String),
    Many(Vec<String>),
}

impl Sources {
    /// Check whether `state` is one of the eligible source states.
    pub fn contains(&self, state: &str) -> bool {
        match self {
            Self::One(s) => s == state,
            Self::Many(states) => states.iter().any(|s| s == state),
        }
    }

    /// Iterate the source states in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let states: &[String] = match self {
            Self::One(s) => std::slice::from_ref(s),
            Self::Many(states) => states,
        };
        states.iter().map(String::as_str)
    }
}

impl fmt::Display for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One(s) => f.write_str(s),
            Self::Many(states) => write!(f, "[{}]", states.join(", ")),
        }
    }
}

impl From<&str> for Sources {
    fn from(state: &str) -> Self {
        Self::One(state.to_string())
    }
}

impl From<String> for Sources {
    fn from(state: String) -> Self {
        Self::One(state)
    }
}

impl From<Vec<String>> for Sources {
    fn from(states: Vec<String>) -> Self {
        Self::Many(states)
    }
}

impl From<Vec<&str>> for Sources {
    fn from(states: Vec<&str>) -> Self {
        Self::Many(states.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sources {
    fn from(states: [&str; N]) -> Self {
        Self::Many(states.iter().map(|s| s.to_string()).collect())
    }
}

/// A named, directed edge from one or more source states to one destination.
///
/// Several definitions may share a `name`; the one whose `from` contains the
/// current state is the one that fires.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::TransitionDef;
///
/// let melt = TransitionDef::new("melt", "solid", "liquid");
/// let reset = TransitionDef::new("reset", ["B", "C", "D"], "A");
///
/// assert!(melt.from.contains("solid"));
/// assert!(reset.from.contains("D"));
/// assert_eq!(reset.to, "A");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDef {
    pub name: String,
    pub from: Sources,
    pub to: String,
}

impl TransitionDef {
    pub fn new(name: impl Into<String>, from: impl Into<Sources>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    /// Check if this definition can fire from `state`.
    pub fn leaves(&self, state: &str) -> bool {
        self.from.contains(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_source_contains_only_itself() {
        let sources = Sources::from("solid");

        assert!(sources.contains("solid"));
        assert!(!sources.contains("liquid"));
        assert_eq!(sources.iter().collect::<Vec<_>>(), vec!["solid"]);
    }

    #[test]
    fn many_sources_preserve_order() {
        let sources = Sources::from(vec!["B", "C", "D"]);

        assert_eq!(sources.iter().collect::<Vec<_>>(), vec!["B", "C", "D"]);
        assert!(sources.contains("C"));
        assert!(!sources.contains("A"));
    }

    #[test]
    fn sources_display() {
        assert_eq!(Sources::from("A").to_string(), "A");
        assert_eq!(Sources::from(["B", "C"]).to_string(), "[B, C]");
    }

    #[test]
    fn sources_deserialize_untagged() {
        let one: Sources = serde_json::from_str(r#""solid""#).unwrap();
        let many: Sources = serde_json::from_str(r#"["B","C"]"#).unwrap();

        assert_eq!(one, Sources::from("solid"));
        assert_eq!(many, Sources::from(["B", "C"]));
    }

    #[test]
    fn definition_deserializes_from_json() {
        let json = r#"{"name":"reset","from":["B","C","D"],"to":"A"}"#;
        let def: TransitionDef = serde_json::from_str(json).unwrap();

        assert_eq!(def, TransitionDef::new("reset", ["B", "C", "D"], "A"));
        assert!(def.leaves("D"));
        assert!(!def.leaves("A"));
    }
}
