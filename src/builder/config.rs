//! Serializable machine configuration.

use crate::core::TransitionDef;
use serde::{Deserialize, Serialize};

/// Declarative part of a machine's configuration.
///
/// Hooks, data and plugins are code and stay on the builder.
///
/// # Example
///
/// ```rust
/// use lifecycle_fsm::builder::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{
///     "init": "A",
///     "transitions": [
///         { "name": "step", "from": "A", "to": "B" },
///         { "name": "reset", "from": ["B"], "to": "A" }
///     ]
/// }"#).unwrap();
///
/// assert_eq!(config.init, "A");
/// assert_eq!(config.transitions.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineConfig {
    pub init: String,
    pub transitions: Vec<TransitionDef>,
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_init_is_rejected() {
        let result = MachineConfig::from_json(r#"{"transitions":[]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn json_round_trip_preserves_sources() {
        let config = MachineConfig {
            init: "A".to_string(),
            transitions: vec![
                TransitionDef::new("step", "A", "B"),
                TransitionDef::new("reset", ["B", "C"], "A"),
            ],
        };

        let back = MachineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
