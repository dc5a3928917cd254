//! RandomSource port - uniform draws in [0, 1).
//!
//! The decision engine never owns its randomness: the caller injects a source,
//! so tests can replay a fixed draw sequence and get identical results.
//!
//! # Implementations
//! - **SeededRandom**: `StdRng` seeded from a `u64` (production)
//! - **ScriptedRandom**: replays a fixed sequence (tests)
//! - **ConstantRandom**: always the same draw (tests)

/// Source of uniform floats in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_float(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }
}
