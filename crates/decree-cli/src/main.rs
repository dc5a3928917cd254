//! decree - play a scenario on the console.
//!
//! Usage: `decree [--scenario FILE] [--seed N] [--max-decisions N] [--max-turns N] [--debug]`

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use decree_core::app::{EngineConfig, LoadedScenario, Offer, TurnHandle, TurnLoop, WorldSnapshot};
use decree_core::domain::{Choice, FieldKind, World};
use decree_core::impls::ExprCompiler;

const PUTSCH: &str = include_str!("../scenarios/putsch.json");

#[derive(Parser, Debug)]
#[command(name = "decree")]
#[command(about = "Play a rule-gated decision scenario on the console")]
struct Args {
    /// Scenario JSON file. Defaults to the bundled putsch scenario.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for decision sampling
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Decision cap per turn (a turn may offer one more)
    #[arg(long, default_value = "3")]
    max_decisions: usize,

    /// Stop after this many applied choices
    #[arg(long)]
    max_turns: Option<u64>,

    /// Dump the offered decisions every turn
    #[arg(long)]
    debug: bool,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            max_decisions_per_turn: self.max_decisions,
            seed: self.seed,
            max_turns: self.max_turns,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Pick(usize),
    Quit,
    Invalid,
}

/// `count` rows are numbered from 1.
fn parse_selection(input: &str, count: usize) -> Selection {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") {
        return Selection::Quit;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Selection::Pick(n - 1),
        _ => Selection::Invalid,
    }
}

/// Offer rows as `decision / choice`, in offer order.
fn rows(offer: &Offer) -> Vec<(String, Choice)> {
    offer
        .decisions
        .iter()
        .flat_map(|decision| {
            decision.choices.iter().map(move |choice| {
                (
                    format!("{} / {}", decision.description, choice.description),
                    choice.clone(),
                )
            })
        })
        .collect()
}

fn render_world(world: &World) -> String {
    format!(
        "resources  {}\npowers     {}",
        world.describe(FieldKind::Resource),
        world.describe(FieldKind::Power)
    )
}

fn print_snapshot(snapshot: &WorldSnapshot) {
    println!();
    println!("=== turn {} ===", snapshot.turn);
    println!("{}", render_world(&snapshot.world));
}

async fn read_selection<R>(lines: &mut Lines<R>, count: usize) -> std::io::Result<Option<usize>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        print!("choice [1-{count}, q to quit]> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match parse_selection(&line, count) {
            Selection::Pick(index) => return Ok(Some(index)),
            Selection::Quit => return Ok(None),
            Selection::Invalid => println!("enter a number between 1 and {count}, or q"),
        }
    }
}

async fn play(handle: &mut TurnHandle, debug: bool) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(snapshot) = handle.next_snapshot().await {
        print_snapshot(&snapshot);

        let Some(offer) = handle.next_offer().await else {
            break;
        };
        if debug {
            println!("{:#?}", offer.decisions);
        }

        let rows = rows(&offer);
        for (number, (label, _)) in rows.iter().enumerate() {
            println!("  [{}] {label}", number + 1);
        }

        match read_selection(&mut lines, rows.len()).await? {
            Some(index) => {
                let (_, choice) = &rows[index];
                if handle.choose(choice.clone()).await.is_err() {
                    break;
                }
            }
            None => {
                handle.cancel();
                break;
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.config();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        process::exit(2);
    }

    let compiler = ExprCompiler::new();
    let loaded = match &args.scenario {
        Some(path) => LoadedScenario::from_path(path, &compiler),
        None => LoadedScenario::from_json(PUTSCH, &compiler),
    };
    let loaded = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load scenario: {}", e);
            process::exit(1);
        }
    };
    info!(rules = loaded.scenario.len(), seed = config.seed, "scenario ready");

    let world = loaded.world.unwrap_or_else(World::example);
    let mut handle = TurnLoop::seeded(Arc::new(loaded.scenario), world, config).spawn();

    if let Err(e) = play(&mut handle, args.debug).await {
        error!("Console error: {}", e);
        handle.cancel();
    }

    match handle.join().await {
        Ok(outcome) => {
            println!();
            println!("Run ended after {} turn(s): {}", outcome.turns, outcome.termination);
            println!("{}", render_world(&outcome.world));
        }
        Err(e) => {
            error!("Turn loop failed: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decree_core::domain::{Change, Decision};

    #[test]
    fn parses_selections() {
        assert_eq!(parse_selection("1", 3), Selection::Pick(0));
        assert_eq!(parse_selection(" 3 \n", 3), Selection::Pick(2));
        assert_eq!(parse_selection("Q", 3), Selection::Quit);
        assert_eq!(parse_selection("0", 3), Selection::Invalid);
        assert_eq!(parse_selection("4", 3), Selection::Invalid);
        assert_eq!(parse_selection("putsch", 3), Selection::Invalid);
    }

    #[test]
    fn rows_flatten_decisions_in_offer_order() {
        let offer = Offer {
            turn: 1,
            decisions: vec![
                Decision::new(
                    "Make putsch",
                    vec![
                        Choice::new("Accept", Change::new()),
                        Choice::new("Reject", Change::new()),
                    ],
                ),
                Decision::new("Quit", vec![Choice::new("Accept", Change::new())]),
            ],
        };
        let labels: Vec<_> = rows(&offer).into_iter().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            vec!["Make putsch / Accept", "Make putsch / Reject", "Quit / Accept"]
        );
    }

    #[test]
    fn renders_world_in_name_order() {
        assert_eq!(
            render_world(&World::example()),
            "resources  Money: 4000\npowers     Legislation: 10 Military: 90"
        );
    }

    #[test]
    fn bundled_scenario_loads() {
        let loaded = LoadedScenario::from_json(PUTSCH, &ExprCompiler::new()).unwrap();
        assert_eq!(loaded.scenario.len(), 2);
        assert_eq!(loaded.world, Some(World::example()));
    }

    #[test]
    fn args_map_onto_config() {
        let args = Args::parse_from(["decree", "--seed", "7", "--max-turns", "2"]);
        let config = args.config();
        assert_eq!(config.seed, 7);
        assert_eq!(config.max_decisions_per_turn, 3);
        assert_eq!(config.max_turns, Some(2));
    }
}
