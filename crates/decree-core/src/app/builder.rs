//! ScenarioBuilder - turns scenario content into a validated `Scenario`.
//!
//! # Fail-fast
//! Every rule is compiled and validated as it is added. The first bad rule
//! stops the load and is reported with its declaration index; nothing about a
//! rejected scenario is ever run.

use std::path::Path;

use tracing::{debug, info};

use crate::domain::{Decision, Rule, RuleSpec, Scenario, ScenarioError, ScenarioSpec, World};
use crate::ports::GuardCompiler;

/// Builds a [`Scenario`] rule by rule.
///
/// # Example
/// ```ignore
/// let compiler = ExprCompiler::new();
/// let scenario = ScenarioBuilder::new(&compiler)
///     .rule("World.Resources.Money > 1000", 1.0, putsch)?
///     .rule("true", 1.0, quit)?
///     .build();
/// ```
pub struct ScenarioBuilder<'c> {
    compiler: &'c dyn GuardCompiler,
    rules: Vec<Rule>,
}

impl<'c> ScenarioBuilder<'c> {
    pub fn new(compiler: &'c dyn GuardCompiler) -> Self {
        Self {
            compiler,
            rules: Vec::new(),
        }
    }

    /// Compile and append one rule.
    pub fn rule(
        mut self,
        condition: impl Into<String>,
        weight: f64,
        decision: Decision,
    ) -> Result<Self, ScenarioError> {
        let index = self.rules.len();
        let rule = Rule::new(condition, weight, decision, self.compiler)
            .map_err(|source| ScenarioError::Rule { rule: index, source })?;
        debug!(rule = index, condition = rule.condition(), weight, "rule compiled");
        self.rules.push(rule);
        Ok(self)
    }

    pub fn rule_spec(self, spec: &RuleSpec) -> Result<Self, ScenarioError> {
        self.rule(
            spec.condition_text.clone(),
            spec.weight,
            spec.decision.clone(),
        )
    }

    pub fn build(self) -> Scenario {
        info!(rules = self.rules.len(), "scenario built");
        Scenario::new(self.rules)
    }
}

/// A built scenario plus the initial World its file carried, if any.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub scenario: Scenario,
    pub world: Option<World>,
}

impl LoadedScenario {
    pub fn from_spec(
        spec: &ScenarioSpec,
        compiler: &dyn GuardCompiler,
    ) -> Result<Self, ScenarioError> {
        let builder = spec
            .rules
            .iter()
            .try_fold(ScenarioBuilder::new(compiler), |builder, rule| {
                builder.rule_spec(rule)
            })?;
        Ok(Self {
            scenario: builder.build(),
            world: spec.world.clone(),
        })
    }

    pub fn from_json(json: &str, compiler: &dyn GuardCompiler) -> Result<Self, ScenarioError> {
        let spec = ScenarioSpec::from_json(json)?;
        Self::from_spec(&spec, compiler)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        compiler: &dyn GuardCompiler,
    ) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading scenario");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json, compiler)
    }
}
