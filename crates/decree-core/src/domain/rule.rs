//! Rule - a guarded, weighted Decision.
//!
//! A Rule is checked once per decision round. Its weight is a per-turn
//! acceptance probability, not normalized against the other rules.

use std::sync::Arc;

use super::decision::Decision;
use super::errors::{EvaluationError, RuleError};
use super::world::World;
use crate::ports::{Guard, GuardCompiler};

#[derive(Debug, Clone)]
pub struct Rule {
    condition: String,
    guard: Arc<dyn Guard>,
    weight: f64,
    decision: Decision,
}

impl Rule {
    /// Compile `condition` and validate the rest of the rule.
    pub fn new(
        condition: impl Into<String>,
        weight: f64,
        decision: Decision,
        compiler: &dyn GuardCompiler,
    ) -> Result<Self, RuleError> {
        let condition = condition.into();
        let guard = compiler.compile(&condition)?;
        Self::with_guard(condition, guard, weight, decision)
    }

    /// Build a rule around an already compiled guard.
    ///
    /// # Validation
    /// - weight must be finite and `>= 0`
    /// - the decision needs at least one choice
    /// - every delta of every choice must be well formed
    pub fn with_guard(
        condition: impl Into<String>,
        guard: Arc<dyn Guard>,
        weight: f64,
        decision: Decision,
    ) -> Result<Self, RuleError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(RuleError::InvalidWeight(weight));
        }
        if decision.choices.is_empty() {
            return Err(RuleError::EmptyDecision(decision.description));
        }
        for choice in &decision.choices {
            choice
                .change
                .validate()
                .map_err(|source| RuleError::MalformedDelta {
                    choice: choice.description.clone(),
                    source,
                })?;
        }

        Ok(Self {
            condition: condition.into(),
            guard,
            weight,
            decision,
        })
    }

    /// 0 when the guard is false, the static weight when it is true.
    pub fn evaluate(&self, world: &World) -> Result<f64, EvaluationError> {
        if self.guard.pass(world)? {
            Ok(self.weight)
        } else {
            Ok(0.0)
        }
    }

    pub fn condition(&self) -> &str {
        &self.condition
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn decision(&self) -> &Decision {
        &self.decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::change::{Change, Delta};
    use crate::domain::decision::Choice;
    use crate::domain::errors::CompileError;
    use crate::impls::ExprCompiler;
    use crate::ports::ConstGuard;
    use proptest::prelude::*;

    #[derive(Debug)]
    struct BrokenGuard;

    impl Guard for BrokenGuard {
        fn pass(&self, _world: &World) -> Result<bool, EvaluationError> {
            Err(EvaluationError::DivisionByZero)
        }
    }

    fn putsch() -> Decision {
        Decision::new(
            "Make putsch",
            vec![Choice::new(
                "Accept",
                Change::new().resource("Money", Delta::new(0.5, 0.0)),
            )],
        )
    }

    fn const_rule(pass: bool, weight: f64) -> Rule {
        Rule::with_guard("const", Arc::new(ConstGuard(pass)), weight, putsch()).unwrap()
    }

    #[test]
    fn compiles_condition_once_at_construction() {
        let rule = Rule::new(
            "World.Resources.Money > 1000",
            0.7,
            putsch(),
            &ExprCompiler::new(),
        )
        .unwrap();
        assert_eq!(rule.condition(), "World.Resources.Money > 1000");
        assert_eq!(rule.evaluate(&World::example()), Ok(0.7));
        assert_eq!(rule.evaluate(&World::new()), Ok(0.0));
    }

    #[test]
    fn compile_error_is_surfaced() {
        let err = Rule::new("World.Gold > 1", 1.0, putsch(), &ExprCompiler::new()).unwrap_err();
        assert!(matches!(
            err,
            RuleError::Compile(CompileError::UnknownField { .. })
        ));
    }

    #[test]
    fn evaluation_error_is_propagated_unchanged() {
        let rule = Rule::with_guard("broken", Arc::new(BrokenGuard), 1.0, putsch()).unwrap();
        assert_eq!(
            rule.evaluate(&World::example()),
            Err(EvaluationError::DivisionByZero)
        );
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        for weight in [-0.1, f64::NAN, f64::INFINITY] {
            let err = Rule::with_guard("const", Arc::new(ConstGuard(true)), weight, putsch())
                .unwrap_err();
            assert!(matches!(err, RuleError::InvalidWeight(_)));
        }
    }

    #[test]
    fn rejects_decision_without_choices() {
        let err = Rule::with_guard(
            "const",
            Arc::new(ConstGuard(true)),
            1.0,
            Decision::new("Nothing to do", vec![]),
        )
        .unwrap_err();
        assert_eq!(err, RuleError::EmptyDecision("Nothing to do".to_string()));
    }

    #[test]
    fn rejects_malformed_delta_at_load() {
        let decision = Decision::new(
            "Make putsch",
            vec![Choice::new(
                "Accept",
                Change::new().resource("Money", Delta::from_components(vec![0.5])),
            )],
        );
        let err = Rule::with_guard("const", Arc::new(ConstGuard(true)), 1.0, decision)
            .unwrap_err();
        assert!(matches!(err, RuleError::MalformedDelta { ref choice, .. } if choice == "Accept"));
    }

    proptest! {
        #[test]
        fn false_guard_always_weighs_zero(weight in 0.0f64..=1.0e6) {
            prop_assert_eq!(const_rule(false, weight).evaluate(&World::example()), Ok(0.0));
        }

        #[test]
        fn true_guard_yields_exact_weight(weight in 0.0f64..=1.0e6) {
            prop_assert_eq!(const_rule(true, weight).evaluate(&World::example()), Ok(weight));
        }
    }
}
