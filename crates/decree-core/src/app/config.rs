//! Engine configuration.

/// Knobs of a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cap passed to the decision engine. A round may return one more than this.
    pub max_decisions_per_turn: usize,

    /// Seed for the `SeededRandom` built by `TurnLoop::seeded`.
    pub seed: u64,

    /// Stop after this many applied choices. `None` runs until stuck or cancelled.
    pub max_turns: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_turns must be at least 1 when set")]
    ZeroTurnLimit,
}

impl EngineConfig {
    /// Three decisions per turn, seed 0, no turn limit.
    pub fn default_v1() -> Self {
        Self {
            max_decisions_per_turn: 3,
            seed: 0,
            max_turns: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_turns == Some(0) {
            return Err(ConfigError::ZeroTurnLimit);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = EngineConfig::default();
        assert_eq!(config.max_decisions_per_turn, 3);
        assert_eq!(config.seed, 0);
        assert_eq!(config.max_turns, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_decision_cap_is_allowed() {
        let config = EngineConfig {
            max_decisions_per_turn: 0,
            ..EngineConfig::default_v1()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_turn_limit_is_rejected() {
        let config = EngineConfig {
            max_turns: Some(0),
            ..EngineConfig::default_v1()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroTurnLimit));
    }
}
