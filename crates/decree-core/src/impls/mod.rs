//! Impls - port implementations
//!
//! # Included
//! - **ExprCompiler**: the bundled guard language (`GuardCompiler`)
//! - **SeededRandom**: `StdRng`-backed `RandomSource`
//! - **ScriptedRandom / ConstantRandom**: replayable sources for tests

pub mod expr;
pub mod random;

pub use self::expr::{ExprCompiler, ExprGuard};
pub use self::random::{ConstantRandom, ScriptedRandom, SeededRandom};
