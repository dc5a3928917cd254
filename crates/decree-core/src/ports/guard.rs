//! Guard port - boolean conditions over a World.
//!
//! The core only relies on this compile/evaluate contract; it never looks at
//! the condition grammar. `impls::ExprCompiler` is the bundled implementation.

use std::fmt;
use std::sync::Arc;

use crate::domain::errors::{CompileError, EvaluationError};
use crate::domain::world::World;

/// A compiled predicate.
///
/// # Contract
/// - Pure: never mutates the World.
/// - Deterministic for a fixed World.
/// - Run-time failures are reported as `EvaluationError`, never as panics.
pub trait Guard: fmt::Debug + Send + Sync {
    fn pass(&self, world: &World) -> Result<bool, EvaluationError>;
}

/// Turns condition text into a [`Guard`].
///
/// Syntax errors and references to unknown fields are compile-time failures.
pub trait GuardCompiler: Send + Sync {
    fn compile(&self, condition: &str) -> Result<Arc<dyn Guard>, CompileError>;
}

/// Guard that always yields the same answer.
///
/// Handy for rules that should be considered every turn, and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstGuard(pub bool);

impl Guard for ConstGuard {
    fn pass(&self, _world: &World) -> Result<bool, EvaluationError> {
        Ok(self.0)
    }
}
