//! Builder for constructing state machines.

use crate::builder::config::MachineConfig;
use crate::builder::error::BuildError;
use crate::builder::lifecycles::{hook_index, Lifecycles};
use crate::core::{Registry, TransitionDef};
use crate::machine::{StateMachine, HISTORY_BACK};
use crate::plugins::Plugin;
use std::sync::Arc;

/// Builder for constructing state machines with a fluent API.
///
/// `build` validates the configuration, then runs the initial transition,
/// so `state()` already equals the initial state on the returned machine.
pub struct StateMachineBuilder<D = ()> {
    init: Option<String>,
    transitions: Vec<TransitionDef>,
    lifecycles: Lifecycles,
    plugins: Vec<Arc<dyn Plugin>>,
    data: D,
}

impl StateMachineBuilder<()> {
    /// Create a new builder without a data payload.
    pub fn new() -> Self {
        Self {
            init: None,
            transitions: Vec::new(),
            lifecycles: Lifecycles::new(),
            plugins: Vec::new(),
            data: (),
        }
    }

    /// Seed a builder from a deserialized configuration.
    pub fn from_config(config: MachineConfig) -> Self {
        Self::new().init(config.init).transitions(config.transitions)
    }
}

impl<D: Send + Sync + 'static> StateMachineBuilder<D> {
    /// Set the initial state (required).
    pub fn init(mut self, state: impl Into<String>) -> Self {
        self.init = Some(state.into());
        self
    }

    /// Add one transition definition.
    pub fn transition(mut self, transition: TransitionDef) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transition definitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionDef>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Attach an opaque payload, returned verbatim by `StateMachine::data`.
    pub fn data<E: Send + Sync + 'static>(self, data: E) -> StateMachineBuilder<E> {
        StateMachineBuilder {
            init: self.init,
            transitions: self.transitions,
            lifecycles: self.lifecycles,
            plugins: self.plugins,
            data,
        }
    }

    /// Add lifecycle hooks. May be called repeatedly.
    pub fn lifecycles(mut self, lifecycles: Lifecycles) -> Self {
        self.lifecycles.extend(lifecycles);
        self
    }

    /// Attach a plugin; plugins are notified in attachment order.
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    /// Build the state machine and run its initial transition.
    ///
    /// If an initial hook defers, the machine stays pending until
    /// [`StateMachine::ready`] is awaited.
    pub fn build(self) -> Result<StateMachine<D>, BuildError> {
        let init = self.init.ok_or(BuildError::MissingInitialState)?;

        if self.transitions.is_empty() {
            return Err(BuildError::NoTransitions);
        }

        let registry = Registry::new(self.transitions);
        let rewinds = self.plugins.iter().any(|plugin| plugin.rewinds());
        if rewinds && registry.has_transition(HISTORY_BACK) {
            return Err(BuildError::ReservedTransition {
                name: HISTORY_BACK.to_string(),
            });
        }

        let index = hook_index(&registry, rewinds)?;
        let hooks = self.lifecycles.resolve(&index)?;

        let machine = StateMachine::new(registry, hooks, self.plugins, self.data);
        machine.initialize(&init)?;
        Ok(machine)
    }
}

impl Default for StateMachineBuilder<()> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::{Hook, HookOutput};
    use crate::machine::FsmError;
    use std::sync::Mutex;

    fn matter() -> Vec<TransitionDef> {
        vec![
            TransitionDef::new("melt", "solid", "liquid"),
            TransitionDef::new("freeze", "liquid", "solid"),
        ]
    }

    #[test]
    fn builder_requires_initial_state() {
        let result = StateMachineBuilder::new().transitions(matter()).build();

        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn builder_requires_transitions() {
        let result = StateMachineBuilder::new().init("solid").build();

        assert!(matches!(result, Err(BuildError::NoTransitions)));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .build()
            .unwrap();

        assert_eq!(machine.state(), "solid");
        assert!(!machine.is_pending());
    }

    #[test]
    fn data_is_returned_verbatim() {
        #[derive(Debug, PartialEq)]
        struct Profile {
            name: &'static str,
        }

        let machine = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .data(Profile { name: "joe" })
            .build()
            .unwrap();

        assert_eq!(machine.data(), &Profile { name: "joe" });
    }

    #[test]
    fn unreachable_initial_state_fails_as_invalid_transition() {
        let result = StateMachineBuilder::new()
            .init("plasma")
            .transitions(matter())
            .build();

        match result {
            Err(BuildError::Init(FsmError::InvalidTransition {
                transition,
                from,
                to,
                current,
            })) => {
                assert_eq!(transition, "init");
                assert_eq!(from.to_string(), "none");
                assert_eq!(to, "plasma");
                assert_eq!(current, "none");
            }
            other => panic!("Expected invalid init, got {other:?}"),
        }
    }

    #[test]
    fn invalid_initial_state_can_be_handled_by_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);

        let machine = StateMachineBuilder::new()
            .init("plasma")
            .transitions(matter())
            .lifecycles(Lifecycles::new().on(Hook::InvalidTransition, move |event| {
                log.lock().unwrap().push(event.to.clone());
                Ok(HookOutput::proceed())
            }))
            .build()
            .unwrap();

        assert_eq!(machine.state(), "none");
        assert_eq!(*seen.lock().unwrap(), vec!["plasma"]);
    }

    #[test]
    fn failing_init_hook_fails_build() {
        let result = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .lifecycles(Lifecycles::new().on(Hook::Init, |_| {
                Err(crate::lifecycle::HookError::new("no power"))
            }))
            .build();

        assert!(matches!(
            result,
            Err(BuildError::Init(FsmError::Hook { hook, .. })) if hook == "onInit"
        ));
    }

    #[test]
    fn history_back_is_reserved_with_history_plugin() {
        let result = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .transition(TransitionDef::new("historyBack", "liquid", "solid"))
            .plugin(crate::plugins::History::new())
            .build();

        assert!(matches!(
            result,
            Err(BuildError::ReservedTransition { name }) if name == "historyBack"
        ));
    }

    #[test]
    fn history_back_names_are_free_without_rewinding_plugin() {
        let machine = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .transition(TransitionDef::new("undo", "liquid", "historyBack"))
            .lifecycles(Lifecycles::new().on(Hook::on_state("historyBack"), |_| {
                Ok(HookOutput::proceed())
            }))
            .build()
            .unwrap();

        assert!(machine.all_states().contains(&"historyBack".to_string()));

        let result = StateMachineBuilder::new()
            .init("solid")
            .transitions(matter())
            .lifecycles(Lifecycles::new().named("onBeforeHistoryBack", |_| {
                Ok(HookOutput::proceed())
            }))
            .build();
        assert!(matches!(result, Err(BuildError::UnknownHook { .. })));
    }

    #[test]
    fn from_config_seeds_builder() {
        let config = MachineConfig::from_json(
            r#"{"init":"solid","transitions":[{"name":"melt","from":"solid","to":"liquid"}]}"#,
        )
        .unwrap();

        let machine = StateMachineBuilder::from_config(config).build().unwrap();
        assert_eq!(machine.state(), "solid");
        assert_eq!(machine.all_transitions(), ["melt"]);
    }
}
