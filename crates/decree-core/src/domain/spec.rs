//! Input specs for a scenario (rules as supplied by the embedding application).
//!
//! Specs are plain data: guards are still text and nothing has been validated.
//! `app::ScenarioBuilder` turns them into a `Scenario` or rejects them.

use serde::{Deserialize, Serialize};

use super::decision::Decision;
use super::world::World;

/// One rule as written in scenario content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSpec {
    /// Guard source, e.g. `World.Resources.Money > 1000`.
    pub condition_text: String,

    /// Per-turn acceptance probability when the guard holds.
    pub weight: f64,

    pub decision: Decision,
}

impl RuleSpec {
    pub fn new(condition_text: impl Into<String>, weight: f64, decision: Decision) -> Self {
        Self {
            condition_text: condition_text.into(),
            weight,
            decision,
        }
    }
}

/// A scenario file: ordered rules plus an optional initial World.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<World>,

    pub rules: Vec<RuleSpec>,
}

impl ScenarioSpec {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_spec_without_world_deserializes() {
        let json = r#"
        {
          "rules": [
            {
              "conditionText": "true",
              "weight": 1.0,
              "decision": { "description": "Quit", "choices": [ { "description": "Accept" } ] }
            }
          ]
        }"#;
        let spec = ScenarioSpec::from_json(json).expect("deserialize");
        assert!(spec.world.is_none());
        assert_eq!(spec.rules.len(), 1);
        assert_eq!(spec.rules[0].condition_text, "true");
        assert_eq!(spec.rules[0].decision.choices[0].description, "Accept");
    }

    #[test]
    fn scenario_spec_reads_initial_world() {
        let json = r#"
        {
          "world": { "resources": { "Money": 4000 }, "powers": { "Military": 90, "Legislation": 10 } },
          "rules": []
        }"#;
        let spec = ScenarioSpec::from_json(json).expect("deserialize");
        assert_eq!(spec.world, Some(World::example()));
    }

    #[test]
    fn rule_spec_requires_condition_text() {
        let json = r#"{ "weight": 1.0, "decision": { "description": "x", "choices": [] } }"#;
        assert!(serde_json::from_str::<RuleSpec>(json).is_err());
    }
}
