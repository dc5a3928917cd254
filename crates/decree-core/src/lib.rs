//! decree-core
//!
//! Rule-gated decision engine: a scenario of guarded, weighted decisions is
//! evaluated against a small World of integer resources and powers, a few
//! decisions are sampled and offered each turn, and the chosen outcome is
//! applied back into the World.
//!
//! # Modules
//! - **domain**: World, Change/Delta, Decision/Choice, Rule, Scenario (the engine), errors
//! - **ports**: Guard / GuardCompiler, RandomSource
//! - **impls**: ExprCompiler (guard language), seeded and scripted random sources
//! - **app**: ScenarioBuilder, EngineConfig, TurnLoop

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
