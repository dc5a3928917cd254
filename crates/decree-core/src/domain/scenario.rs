//! Scenario - the ordered rule set and the decision engine over it.
//!
//! # Decision round
//! 1. every rule is evaluated in declaration order (zero weights included)
//! 2. candidates are sorted by ascending weight; ties keep declaration order
//! 3. each candidate consumes exactly one draw and is accepted if `draw < weight`
//! 4. the walk stops as soon as more than `max_decisions` were accepted
//!
//! A round therefore returns at most `max_decisions + 1` decisions.

use std::collections::BTreeSet;

use super::decision::Decision;
use super::errors::EvaluationError;
use super::rule::Rule;
use super::world::{FieldKind, World};
use crate::ports::RandomSource;

/// A rule's weight for one round. Lives only inside a single call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    pub weight: f64,
    pub decision: &'a Decision,
    /// Declaration index of the originating rule.
    pub index: usize,
}

/// Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    rules: Vec<Rule>,
}

impl Scenario {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule and order the candidates by ascending weight.
    ///
    /// Any guard failure aborts the whole ranking.
    pub fn rank(&self, world: &World) -> Result<Vec<Candidate<'_>>, EvaluationError> {
        let mut candidates = Vec::with_capacity(self.rules.len());
        for (index, rule) in self.rules.iter().enumerate() {
            candidates.push(Candidate {
                weight: rule.evaluate(world)?,
                decision: rule.decision(),
                index,
            });
        }

        // stable: equal weights keep declaration order
        candidates.sort_by(|a, b| a.weight.total_cmp(&b.weight));
        Ok(candidates)
    }

    /// Sample the decisions offered for `world`.
    pub fn decisions(
        &self,
        world: &World,
        max_decisions: usize,
        random: &mut dyn RandomSource,
    ) -> Result<Vec<Decision>, EvaluationError> {
        let candidates = self.rank(world)?;

        let mut accepted = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if random.next_float() < candidate.weight {
                accepted.push(candidate.decision.clone());
                if accepted.len() > max_decisions {
                    break;
                }
            }
        }
        Ok(accepted)
    }

    /// Every resource and power name mentioned by any choice.
    pub fn vocabulary(&self) -> BTreeSet<(FieldKind, String)> {
        self.rules
            .iter()
            .flat_map(|rule| rule.decision().choices.iter())
            .flat_map(|choice| choice.change.entries())
            .map(|(kind, name, _)| (kind, name.to_string()))
            .collect()
    }
}
