//! Status - where a run is and why it ended.

use std::fmt;

use crate::domain::{EvaluationError, MalformedDeltaError, World};

/// Published on the turn loop's `watch` channel.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    Idle,
    /// Snapshot published, decision round running.
    Offering { turn: u64 },
    /// Offer published, waiting for one Choice.
    AwaitingChoice { turn: u64 },
    Applying { turn: u64 },
    Terminated(Termination),
}

impl TurnState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, TurnState::Terminated(_))
    }
}

/// Why a run ended. Every variant is final; nothing is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// The decision round accepted nothing.
    Stuck,
    /// The consumer closed the choice channel or asked to cancel.
    Cancelled,
    /// The consumer dropped a snapshot or offer receiver.
    Disconnected,
    EvaluationFailed(EvaluationError),
    /// The chosen Choice carried a bad delta; the World was left untouched.
    MalformedDelta(MalformedDeltaError),
    /// `EngineConfig::max_turns` choices were applied.
    TurnLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Stuck => f.write_str("stuck: no decision was offered"),
            Termination::Cancelled => f.write_str("cancelled"),
            Termination::Disconnected => f.write_str("consumer disconnected"),
            Termination::EvaluationFailed(err) => write!(f, "guard evaluation failed: {err}"),
            Termination::MalformedDelta(err) => write!(f, "choice rejected: {err}"),
            Termination::TurnLimit => f.write_str("turn limit reached"),
        }
    }
}

/// Returned through the turn loop's `JoinHandle`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    /// Number of choices applied.
    pub turns: u64,
    pub termination: Termination,
    /// World as it was when the run ended.
    pub world: World,
}
