//! Errors - failures raised by scenario loading, guard evaluation and Apply.
//!
//! Each concern gets its own type so callers can tell a load-time rejection
//! (`CompileError`, `ScenarioError`) from a run-time failure
//! (`EvaluationError`, `MalformedDeltaError`).

use thiserror::Error;

use super::world::FieldKind;

/// Guard condition could not be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("syntax error in `{condition}`: {message}")]
    Syntax { condition: String, message: String },

    #[error("unknown field `{path}` in `{condition}` (expected World.Resources.<name> or World.Powers.<name>)")]
    UnknownField { condition: String, path: String },
}

/// Guard failed while being evaluated against a World.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("guard `{condition}` evaluated to a {found}, expected bool")]
    NotBoolean {
        condition: String,
        found: &'static str,
    },

    #[error("operator `{op}` expects {expected} operands, got {found}")]
    TypeMismatch {
        op: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,
}

/// A Delta that does not carry exactly two finite components.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed delta for {kind} `{name}`: expected [multiplier, additive], got {components:?}")]
pub struct MalformedDeltaError {
    pub kind: FieldKind,
    pub name: String,
    pub components: Vec<f64>,
}

/// A single rule was rejected while being built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("weight {0} must be finite and non-negative")]
    InvalidWeight(f64),

    #[error("decision `{0}` has no choices")]
    EmptyDecision(String),

    #[error("choice `{choice}`: {source}")]
    MalformedDelta {
        choice: String,
        #[source]
        source: MalformedDeltaError,
    },
}

/// Scenario content was rejected at load time.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// `rule` is the zero-based declaration index.
    #[error("rule #{rule}: {source}")]
    Rule {
        rule: usize,
        #[source]
        source: RuleError,
    },

    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scenario read error: {0}")]
    Io(#[from] std::io::Error),
}
