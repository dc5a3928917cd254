//! Decision model: what the player is offered and what each option does.

use serde::{Deserialize, Serialize};

use super::change::Change;

/// One selectable option of a Decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub description: String,

    #[serde(default)]
    pub change: Change,
}

impl Choice {
    pub fn new(description: impl Into<String>, change: Change) -> Self {
        Self {
            description: description.into(),
            change,
        }
    }
}

/// A description plus the Choices offered together with it.
///
/// Scenario loading rejects decisions without choices, so anything reachable
/// from a built `Scenario` has at least one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub description: String,
    pub choices: Vec<Choice>,
}

impl Decision {
    pub fn new(description: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            description: description.into(),
            choices,
        }
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_without_change_deserializes_as_empty_change() {
        let choice: Choice = serde_json::from_str(r#"{"description": "Accept"}"#).unwrap();
        assert!(choice.change.is_empty());
    }

    #[test]
    fn decision_keeps_choice_order() {
        let decision: Decision = serde_json::from_str(
            r#"{"description": "Make putsch", "choices": [
                {"description": "Accept"}, {"description": "Reject"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(decision.choice(0).unwrap().description, "Accept");
        assert_eq!(decision.choice(1).unwrap().description, "Reject");
        assert!(decision.choice(2).is_none());
    }
}
