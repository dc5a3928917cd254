//! App - wiring the domain into a runnable game.
//!
//! # Components
//! - **ScenarioBuilder / LoadedScenario**: fail-fast scenario loading
//! - **EngineConfig**: per-run knobs
//! - **TurnLoop / TurnHandle**: the turn orchestrator and its consumer side
//! - **TurnState / Termination / RunOutcome**: run status

pub mod builder;
pub mod config;
pub mod status;
pub mod turn_loop;

pub use self::builder::{LoadedScenario, ScenarioBuilder};
pub use self::config::{ConfigError, EngineConfig};
pub use self::status::{RunOutcome, Termination, TurnState};
pub use self::turn_loop::{Offer, TurnHandle, TurnLoop, WorldSnapshot};
