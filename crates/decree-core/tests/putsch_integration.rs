//! Putsch scenario integration tests

use std::sync::Arc;

use decree_core::app::{EngineConfig, LoadedScenario, Termination, TurnLoop};
use decree_core::domain::{Change, Choice, Delta, World};
use decree_core::impls::{ConstantRandom, ExprCompiler, ScriptedRandom};

const PUTSCH: &str = r#"
{
  "rules": [
    {
      "conditionText": "World.Resources.Money > 1000 and World.Powers.Military ≥ 90",
      "weight": 1.0,
      "decision": {
        "description": "Make putsch",
        "choices": [
          { "description": "Accept",
            "change": { "resources": { "Money": [0.5, 0] }, "powers": { "Legislation": [0, 100] } } }
        ]
      }
    }
  ]
}
"#;

#[test]
fn test_engine_offers_putsch_and_apply_updates_world() {
    let loaded = LoadedScenario::from_json(PUTSCH, &ExprCompiler::new()).unwrap();
    let mut world = World::example();

    let offered = loaded
        .scenario
        .decisions(&world, 3, &mut ConstantRandom(0.0))
        .unwrap();
    assert_eq!(offered.len(), 1);
    assert_eq!(offered[0].description, "Make putsch");

    world.apply(&offered[0].choices[0]).unwrap();
    assert_eq!(world.resource("Money"), 2000);
    assert_eq!(world.power("Legislation"), 100);
    assert_eq!(world.power("Military"), 90);
}

#[test]
fn test_additive_delta_on_top_of_old_value() {
    let mut world = World::example();
    let choice = Choice::new("Decree", Change::new().power("Legislation", Delta::new(1.0, 100.0)));
    world.apply(&choice).unwrap();
    assert_eq!(world.power("Legislation"), 110);
}

#[test]
fn test_apply_is_not_idempotent() {
    let mut world = World::example();
    let tax = Choice::new("Tax", Change::new().resource("Money", Delta::new(0.5, 0.0)));
    world.apply(&tax).unwrap();
    world.apply(&tax).unwrap();
    assert_eq!(world.resource("Money"), 1000);
}

#[test]
fn test_one_element_delta_is_rejected_without_mutation() {
    let mut world = World::example();
    let bad = Choice::new(
        "Bad",
        Change::new().resource("Money", Delta::from_components(vec![0.5])),
    );
    assert!(world.apply(&bad).is_err());
    assert_eq!(world, World::example());
}

#[test]
fn test_replayed_draws_give_identical_offers() {
    let loaded = LoadedScenario::from_json(PUTSCH, &ExprCompiler::new()).unwrap();
    let world = World::example();
    let draws = vec![0.3, 0.9, 0.1];
    let first = loaded
        .scenario
        .decisions(&world, 3, &mut ScriptedRandom::new(draws.clone()))
        .unwrap();
    let second = loaded
        .scenario
        .decisions(&world, 3, &mut ScriptedRandom::new(draws))
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_turn_loop_runs_putsch_until_stuck() {
    let loaded = LoadedScenario::from_json(PUTSCH, &ExprCompiler::new()).unwrap();
    let mut handle = TurnLoop::new(
        Arc::new(loaded.scenario),
        World::example(),
        ConstantRandom(0.0),
        EngineConfig::default_v1(),
    )
    .spawn();

    // Money 4000 -> 2000 -> 1000; the guard needs more than 1000.
    for expected_money in [4000, 2000] {
        let snapshot = handle.next_snapshot().await.unwrap();
        assert_eq!(snapshot.world.resource("Money"), expected_money);
        let offer = handle.next_offer().await.unwrap();
        handle
            .choose(offer.decisions[0].choices[0].clone())
            .await
            .unwrap();
    }

    let last = handle.next_snapshot().await.unwrap();
    assert_eq!(last.world.resource("Money"), 1000);
    assert!(handle.next_offer().await.is_none());

    let outcome = handle.join().await.unwrap();
    assert_eq!(outcome.termination, Termination::Stuck);
    assert_eq!(outcome.turns, 2);
    assert_eq!(outcome.world.power("Legislation"), 100);
}
