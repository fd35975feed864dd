//! Event payload passed to every hook and listener.

use super::naming::prepended;
use crate::core::Sources;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Describes the transition a hook is running for.
///
/// `from` is the source side as declared, so it may list several states.
/// `args` are the extra arguments supplied at the call site.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::core::Sources;
/// use lifecycle_fsm::lifecycle::LifecycleEvent;
///
/// let event = LifecycleEvent::new("melt", Sources::from("solid"), "liquid", vec![]);
/// assert_eq!(event.event, "onMelt");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    pub event: String,
    pub from: Sources,
    pub to: String,
    pub transition: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Value>,
}

impl LifecycleEvent {
    pub fn new(
        transition: impl Into<String>,
        from: Sources,
        to: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        let transition = transition.into();
        Self {
            event: prepended("on", &transition),
            from,
            to: to.into(),
            transition,
            args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn event_name_is_derived_from_transition() {
        let event = LifecycleEvent::new("go_home", Sources::from("work"), "home", vec![]);
        assert_eq!(event.event, "onGoHome");
        assert_eq!(event.transition, "go_home");
    }

    #[test]
    fn serializes_without_empty_args() {
        let event = LifecycleEvent::new("melt", Sources::from("solid"), "liquid", vec![]);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(
            value,
            json!({"event": "onMelt", "from": "solid", "to": "liquid", "transition": "melt"})
        );
    }

    #[test]
    fn carries_list_sources_and_args() {
        let event = LifecycleEvent::new(
            "reset",
            Sources::from(["B", "C"]),
            "A",
            vec![json!(1), json!("two")],
        );
        let back: LifecycleEvent =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();

        assert_eq!(back, event);
        assert_eq!(back.args.len(), 2);
    }
}
