//! Ports - abstraction layer
//!
//! Each trait here is a capability the core consumes but does not define the
//! internals of. Implementations live in `impls`.
//!
//! # Ports
//! - **Guard / GuardCompiler**: compile and evaluate rule conditions
//! - **RandomSource**: uniform draws for decision sampling

pub mod guard;
pub mod random;

pub use self::guard::{ConstGuard, Guard, GuardCompiler};
pub use self::random::RandomSource;
