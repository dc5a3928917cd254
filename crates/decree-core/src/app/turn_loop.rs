//! TurnLoop - the per-turn cycle between the simulation and its consumer.
//!
//! # Flow
//! 1. publish a WorldSnapshot
//! 2. run the decision engine; nothing accepted ends the run as `Stuck`
//! 3. publish the Offer and wait for one Choice
//! 4. apply the Choice, back to 1
//!
//! The loop task owns the World and is its only writer. Every channel holds a
//! single item, so a publish waits until the consumer took the previous one.
//! Cancellation is observed while publishing or waiting, never in the middle
//! of an Apply.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error, info, warn};

use super::config::EngineConfig;
use super::status::{RunOutcome, Termination, TurnState};
use crate::domain::{Choice, Decision, Scenario, World};
use crate::impls::SeededRandom;
use crate::ports::RandomSource;

/// World copy handed to the consumer at the start of a turn.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSnapshot {
    pub turn: u64,
    pub world: World,
}

/// Decisions offered for a turn, in acceptance order.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub turn: u64,
    pub decisions: Vec<Decision>,
}

pub struct TurnLoop {
    scenario: Arc<Scenario>,
    world: World,
    random: Box<dyn RandomSource>,
    config: EngineConfig,
}

/// Consumer side of a running TurnLoop.
///
/// - dropping the handle cancels the run
/// - [`TurnHandle::join`] waits for the [`RunOutcome`]
pub struct TurnHandle {
    snapshots: mpsc::Receiver<WorldSnapshot>,
    offers: mpsc::Receiver<Offer>,
    choices: Option<mpsc::Sender<Choice>>,
    state: watch::Receiver<TurnState>,
    cancel_tx: watch::Sender<bool>,
    join: JoinHandle<RunOutcome>,
}

impl TurnHandle {
    /// `None` once the run has ended and every snapshot was taken.
    pub async fn next_snapshot(&mut self) -> Option<WorldSnapshot> {
        self.snapshots.recv().await
    }

    /// `None` once the run has ended and every offer was taken.
    pub async fn next_offer(&mut self) -> Option<Offer> {
        self.offers.recv().await
    }

    /// Hand the loop the Choice for the current offer.
    ///
    /// Fails, returning the Choice, when the run is over or was cancelled.
    pub async fn choose(&self, choice: Choice) -> Result<(), Choice> {
        match &self.choices {
            Some(tx) => tx.send(choice).await.map_err(|err| err.0),
            None => Err(choice),
        }
    }

    /// Close the choice channel. The loop stops at its next wait point.
    pub fn cancel(&mut self) {
        self.choices = None;
        // ignore send error: the loop may already be gone
        let _ = self.cancel_tx.send(true);
    }

    /// Stop accepting snapshots and offers; the loop ends as `Disconnected`
    /// the next time it publishes.
    pub fn disconnect(&mut self) {
        self.snapshots.close();
        self.offers.close();
    }

    pub fn state(&self) -> TurnState {
        self.state.borrow().clone()
    }

    pub fn watch_state(&self) -> watch::Receiver<TurnState> {
        self.state.clone()
    }

    pub async fn join(self) -> Result<RunOutcome, JoinError> {
        self.join.await
    }
}

/// Loop side of the channels.
struct LoopIo {
    snapshots: mpsc::Sender<WorldSnapshot>,
    offers: mpsc::Sender<Offer>,
    choices: mpsc::Receiver<Choice>,
    state: watch::Sender<TurnState>,
    cancel_rx: watch::Receiver<bool>,
}

impl LoopIo {
    fn set_state(&self, state: TurnState) {
        // ignore send error: nobody may be watching
        let _ = self.state.send(state);
    }

    fn cancel_requested(&self) -> bool {
        *self.cancel_rx.borrow()
    }
}

/// Publish on a single-slot channel, racing against cancellation.
async fn publish<T>(
    tx: &mpsc::Sender<T>,
    cancel_rx: &mut watch::Receiver<bool>,
    item: T,
) -> Result<(), Termination> {
    tokio::select! {
        biased;
        // a changed value or a dropped handle both mean cancel
        _ = cancel_rx.changed() => Err(Termination::Cancelled),
        sent = tx.send(item) => sent.map_err(|_| Termination::Disconnected),
    }
}

impl TurnLoop {
    pub fn new(
        scenario: Arc<Scenario>,
        world: World,
        random: impl RandomSource + 'static,
        config: EngineConfig,
    ) -> Self {
        Self {
            scenario,
            world,
            random: Box::new(random),
            config,
        }
    }

    /// Sample with a `SeededRandom` built from `config.seed`.
    pub fn seeded(scenario: Arc<Scenario>, world: World, config: EngineConfig) -> Self {
        let random = SeededRandom::new(config.seed);
        Self::new(scenario, world, random, config)
    }

    /// Start the loop on the tokio runtime.
    pub fn spawn(self) -> TurnHandle {
        let (snapshot_tx, snapshot_rx) = mpsc::channel(1);
        let (offer_tx, offer_rx) = mpsc::channel(1);
        let (choice_tx, choice_rx) = mpsc::channel(1);
        let (state_tx, state_rx) = watch::channel(TurnState::Idle);
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let io = LoopIo {
            snapshots: snapshot_tx,
            offers: offer_tx,
            choices: choice_rx,
            state: state_tx,
            cancel_rx,
        };
        let join = tokio::spawn(self.run(io));

        TurnHandle {
            snapshots: snapshot_rx,
            offers: offer_rx,
            choices: Some(choice_tx),
            state: state_rx,
            cancel_tx,
            join,
        }
    }

    async fn run(mut self, mut io: LoopIo) -> RunOutcome {
        for (kind, name) in self.scenario.vocabulary() {
            self.world.ensure_key(kind, &name);
        }
        info!(
            rules = self.scenario.len(),
            max_decisions = self.config.max_decisions_per_turn,
            world = %self.world,
            "turn loop started"
        );

        let mut turns = 0;
        let termination = loop {
            if io.cancel_requested() {
                break Termination::Cancelled;
            }
            if self.config.max_turns.is_some_and(|limit| turns >= limit) {
                break Termination::TurnLimit;
            }
            let turn = turns + 1;

            io.set_state(TurnState::Offering { turn });
            let snapshot = WorldSnapshot {
                turn,
                world: self.world.snapshot(),
            };
            if let Err(termination) = publish(&io.snapshots, &mut io.cancel_rx, snapshot).await {
                break termination;
            }

            let decisions = match self.scenario.decisions(
                &self.world,
                self.config.max_decisions_per_turn,
                self.random.as_mut(),
            ) {
                Ok(decisions) => decisions,
                Err(err) => {
                    error!(turn, error = %err, "guard evaluation failed");
                    break Termination::EvaluationFailed(err);
                }
            };
            if decisions.is_empty() {
                warn!(turn, world = %self.world, "no decision accepted, run is stuck");
                break Termination::Stuck;
            }
            debug!(turn, offered = decisions.len(), "offering decisions");

            // before the publish: a consumer holding the offer must not read `Offering`
            io.set_state(TurnState::AwaitingChoice { turn });
            let offer = Offer { turn, decisions };
            if let Err(termination) = publish(&io.offers, &mut io.cancel_rx, offer).await {
                break termination;
            }

            let choice = tokio::select! {
                biased;
                _ = io.cancel_rx.changed() => break Termination::Cancelled,
                choice = io.choices.recv() => match choice {
                    Some(choice) => choice,
                    None => break Termination::Cancelled,
                },
            };

            io.set_state(TurnState::Applying { turn });
            if let Err(err) = self.world.apply(&choice) {
                error!(turn, choice = %choice.description, error = %err, "choice rejected");
                break Termination::MalformedDelta(err);
            }
            info!(turn, choice = %choice.description, world = %self.world, "choice applied");

            turns = turn;
            io.set_state(TurnState::Idle);
        };

        info!(turns, reason = %termination, "turn loop terminated");
        io.set_state(TurnState::Terminated(termination.clone()));
        RunOutcome {
            turns,
            termination,
            world: self.world,
        }
    }
}
