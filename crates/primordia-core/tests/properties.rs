//! Whole-engine properties checked over many ticks.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::collections::BTreeMap;

use primordia_core::config::SimulationConfig;
use primordia_core::tick::{SimulationState, run_tick};
use primordia_types::{
    Entity, EntityId, Knowledge, KnowledgeCategory, Personality, Position, Technology,
};
use primordia_world::{WorldState, human_at};

fn ages(state: &SimulationState) -> BTreeMap<EntityId, f64> {
    state.world.humans().map(|h| (h.id, h.age)).collect()
}

#[test]
fn living_humans_age_every_tick() {
    let mut state = SimulationState::new(SimulationConfig::default()).unwrap();
    let mut before = ages(&state);
    for _ in 0..200 {
        run_tick(&mut state).unwrap();
        let after = ages(&state);
        for (id, age) in &after {
            if let Some(previous) = before.get(id) {
                assert!(age > previous, "{id:?} did not age");
            }
        }
        before = after;
    }
}

#[test]
fn discoveries_never_revert() {
    let mut config = SimulationConfig::default();
    config.technology.interval = 5;
    let mut state = SimulationState::new(config).unwrap();
    let mut seen: Vec<String> = Vec::new();
    for _ in 0..600 {
        let summary = run_tick(&mut state).unwrap();
        for name in &summary.discoveries {
            assert!(!seen.contains(name), "{name} discovered twice");
            seen.push(name.clone());
        }
        for name in &seen {
            assert!(state.ledger.is_discovered(name));
        }
        assert_eq!(
            usize::try_from(state.stats.technologies).unwrap(),
            seen.len()
        );
    }
}

#[test]
fn emptied_world_is_repopulated() {
    let mut config = SimulationConfig::default();
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.emergency_probability = 1.0;
    config.reproduction.low_population_probability = 0.0;
    let mut state = SimulationState::new(config).unwrap();
    assert_eq!(state.world.population(), 0);

    for expected in 1..=5 {
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.spawned.is_some());
        assert_eq!(summary.population, expected);
    }
}

#[test]
fn population_below_floor_always_attempts_a_spawn() {
    let mut config = SimulationConfig::default();
    config.world.generation.human_count = 3;
    config.world.generation.mob_count = 0;
    config.lifecycle.emergency_probability = 1.0;
    config.lifecycle.emergency_floor = 8;
    let mut state = SimulationState::new(config).unwrap();

    for _ in 0..20 {
        let before = state.world.population();
        let summary = run_tick(&mut state).unwrap();
        let after_deaths = before
            .saturating_add(summary.births)
            .saturating_sub(u32::try_from(summary.deaths.len()).unwrap());
        assert_eq!(summary.spawned.is_some(), after_deaths < 8);
    }
    assert!(state.world.population() >= 8);
}

#[test]
fn zero_hit_points_and_old_age_are_each_fatal() {
    let mut config = SimulationConfig::default();
    config.world.generation.tree_count = 0;
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.critical_population = 0;
    config.lifecycle.emergency_probability = 0.0;

    let calm = Personality::new(0.0, 0.0, 0.0);
    let mut world = WorldState::new();
    let mut wounded = human_at(Position::new(0.0, 0.0), 25.0, Knowledge::ZERO, calm);
    wounded.hp = 0.0;
    let ancient = human_at(Position::new(1000.0, 0.0), 200.0, Knowledge::ZERO, calm);
    let healthy = human_at(Position::new(-1000.0, 0.0), 25.0, Knowledge::ZERO, calm);
    let (wounded_id, ancient_id, healthy_id) = (wounded.id, ancient.id, healthy.id);
    for human in [wounded, ancient, healthy] {
        world.insert(Entity::Human(human)).unwrap();
    }
    let mut state = SimulationState::with_world(config, world).unwrap();

    let summary = run_tick(&mut state).unwrap();

    let dead: Vec<EntityId> = summary.deaths.iter().map(|d| d.human).collect();
    assert!(dead.contains(&wounded_id));
    assert!(dead.contains(&ancient_id));
    assert!(!dead.contains(&healthy_id));
    assert_eq!(state.world.population(), 1);
    assert_eq!(state.stats.total_deaths, 2);
}

#[test]
fn scarcity_lets_the_wounded_linger() {
    let mut config = SimulationConfig::default();
    config.world.generation.tree_count = 0;
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.emergency_probability = 0.0;

    let mut wounded = human_at(
        Position::new(0.0, 0.0),
        25.0,
        Knowledge::ZERO,
        Personality::new(0.0, 0.0, 0.0),
    );
    wounded.hp = -5.0;
    let id = wounded.id;
    let mut world = WorldState::new();
    world.insert(Entity::Human(wounded)).unwrap();
    let mut state = SimulationState::with_world(config, world).unwrap();

    let summary = run_tick(&mut state).unwrap();

    assert!(summary.deaths.is_empty());
    assert!(state.world.contains(id));
}

#[test]
fn bequest_reaches_survivors_in_range() {
    let mut config = SimulationConfig::default();
    config.world.generation.tree_count = 0;
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.critical_population = 0;
    config.lifecycle.emergency_probability = 0.0;

    let calm = Personality::new(0.0, 0.0, 0.0);
    let mut sage = human_at(Position::new(0.0, 0.0), 30.0, Knowledge::uniform(20.0), calm);
    sage.hp = 0.0;
    let heir = human_at(Position::new(20.0, 0.0), 30.0, Knowledge::ZERO, calm);
    let stranger = human_at(Position::new(500.0, 0.0), 30.0, Knowledge::ZERO, calm);
    let (heir_id, stranger_id) = (heir.id, stranger.id);
    let mut world = WorldState::new();
    for human in [sage, heir, stranger] {
        world.insert(Entity::Human(human)).unwrap();
    }
    let mut state = SimulationState::with_world(config, world).unwrap();

    let summary = run_tick(&mut state).unwrap();

    assert_eq!(summary.deaths.len(), 1);
    assert!(summary.deaths[0].sage);
    assert_eq!(summary.deaths[0].heirs, vec![heir_id]);
    assert_eq!(state.world.human(heir_id).unwrap().knowledge.science, 2.0);
    assert_eq!(
        state.world.human(stranger_id).unwrap().knowledge.science,
        0.0
    );
}

#[test]
fn empty_world_discovers_nothing() {
    let mut config = SimulationConfig::default();
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.emergency_probability = 0.0;
    config.technology.interval = 1;
    config.technology.technologies = vec![Technology::new(
        "Fire",
        KnowledgeCategory::Survival,
        0.0,
        10.0,
    )];
    let mut state = SimulationState::new(config).unwrap();

    for _ in 0..5 {
        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.population, 0);
        assert!(summary.discoveries.is_empty());
    }
    assert!(!state.ledger.is_discovered("Fire"));
    assert_eq!(state.stats.technologies, 0);
}
