//! Domain model (world, changes, decisions, rules, scenario, errors).
//!
//! Everything here is synchronous and free of I/O. The decision engine lives in
//! [`scenario::Scenario::decisions`]; the only mutation of a World is
//! [`world::World::apply`].

pub mod change;
pub mod decision;
pub mod errors;
pub mod rule;
pub mod scenario;
pub mod spec;
pub mod world;

pub use self::change::{Change, Delta};
pub use self::decision::{Choice, Decision};
pub use self::errors::{CompileError, EvaluationError, MalformedDeltaError, RuleError, ScenarioError};
pub use self::rule::Rule;
pub use self::scenario::{Candidate, Scenario};
pub use self::spec::{RuleSpec, ScenarioSpec};
pub use self::world::{FieldKind, World};
