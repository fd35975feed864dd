//! Registry of transition definitions and the states they reach.

use super::state::TransitionDef;

/// Immutable catalogue of a machine's transitions.
///
/// The full definition list is kept for lookup; transition names and states
/// are deduplicated in first-occurrence order for enumeration.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::{Registry, TransitionDef};
///
/// let registry = Registry::new(vec![
///     TransitionDef::new("step", "A", "B"),
///     TransitionDef::new("step", "B", "C"),
///     TransitionDef::new("reset", ["B", "C"], "A"),
/// ]);
///
/// assert_eq!(registry.transition_names(), ["step", "reset"]);
/// assert_eq!(registry.states(), ["A", "B", "C"]);
/// assert_eq!(registry.possible_transitions("B"), vec!["step", "reset"]);
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    transitions: Vec<TransitionDef>,
    names: Vec<String>,
    states: Vec<String>,
}

impl Registry {
    pub fn new(transitions: Vec<TransitionDef>) -> Self {
        let mut names: Vec<String> = Vec::new();
        let mut states: Vec<String> = Vec::new();

        for def in &transitions {
            push_unique(&mut names, &def.name);
            for from in def.from.iter() {
                push_unique(&mut states, from);
            }
            push_unique(&mut states, &def.to);
        }

        Self {
            transitions,
            names,
            states,
        }
    }

    /// Every definition, duplicates included, in declaration order.
    pub fn definitions(&self) -> &[TransitionDef] {
        &self.transitions
    }

    /// Distinct transition names in first-occurrence order.
    pub fn transition_names(&self) -> &[String] {
        &self.names
    }

    /// Distinct states in first-occurrence order.
    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn has_transition(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn has_state(&self, state: &str) -> bool {
        self.states.iter().any(|s| s == state)
    }

    /// Names of the definitions whose `from` includes `current`.
    ///
    /// One entry per matching definition, so overloaded names can repeat.
    pub fn possible_transitions(&self, current: &str) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|def| def.leaves(current))
            .map(|def| def.name.as_str())
            .collect()
    }

    /// The definition named `name` that fires from `current`, if any.
    pub fn select(&self, name: &str, current: &str) -> Option<&TransitionDef> {
        self.transitions
            .iter()
            .find(|def| def.name == name && def.leaves(current))
    }

    /// The first definition declared under `name`.
    pub fn first_named(&self, name: &str) -> Option<&TransitionDef> {
        self.transitions.iter().find(|def| def.name == name)
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matter() -> Registry {
        Registry::new(vec![
            TransitionDef::new("melt", "solid", "liquid"),
            TransitionDef::new("freeze", "liquid", "solid"),
            TransitionDef::new("vaporize", "liquid", "gas"),
            TransitionDef::new("condense", "gas", "liquid"),
            TransitionDef::new("step", "A", "B"),
            TransitionDef::new("step", "B", "C"),
            TransitionDef::new("step", "C", "D"),
        ])
    }

    #[test]
    fn names_are_deduplicated_in_order() {
        assert_eq!(
            matter().transition_names(),
            ["melt", "freeze", "vaporize", "condense", "step"]
        );
    }

    #[test]
    fn states_are_deduplicated_in_order() {
        assert_eq!(
            matter().states(),
            ["solid", "liquid", "gas", "A", "B", "C", "D"]
        );
    }

    #[test]
    fn array_sources_contribute_states() {
        let registry = Registry::new(vec![TransitionDef::new("reset", ["X", "Y"], "Z")]);
        assert_eq!(registry.states(), ["X", "Y", "Z"]);
    }

    #[test]
    fn identical_definitions_are_kept_for_lookup() {
        let registry = Registry::new(vec![
            TransitionDef::new("melt", "solid", "liquid"),
            TransitionDef::new("melt", "solid", "liquid"),
        ]);

        assert_eq!(registry.definitions().len(), 2);
        assert_eq!(registry.transition_names(), ["melt"]);
        assert_eq!(registry.states(), ["solid", "liquid"]);
    }

    #[test]
    fn possible_transitions_from_state() {
        let registry = matter();

        assert_eq!(registry.possible_transitions("liquid"), vec!["freeze", "vaporize"]);
        assert_eq!(registry.possible_transitions("B"), vec!["step"]);
        assert!(registry.possible_transitions("D").is_empty());
    }

    #[test]
    fn select_disambiguates_overloads_by_current_state() {
        let registry = matter();

        assert_eq!(registry.select("step", "B").map(|d| d.to.as_str()), Some("C"));
        assert_eq!(registry.select("step", "C").map(|d| d.to.as_str()), Some("D"));
        assert!(registry.select("step", "D").is_none());
        assert_eq!(
            registry.first_named("step").map(|d| d.to.as_str()),
            Some("B")
        );
    }

    #[test]
    fn membership_queries() {
        let registry = matter();

        assert!(registry.has_transition("melt"));
        assert!(!registry.has_transition("boil"));
        assert!(registry.has_state("gas"));
        assert!(!registry.has_state("plasma"));
    }
}
