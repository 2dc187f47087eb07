//! End-to-end scenarios driven through `run_tick` on hand-built worlds.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]

use primordia_core::config::SimulationConfig;
use primordia_core::tick::{SimulationState, run_tick};
use primordia_types::{
    Entity, EntityId, EntityKind, EventKind, Human, Knowledge, KnowledgeCategory, Mob,
    Personality, Position, Technology, Velocity,
};
use primordia_world::{WorldState, human_at};

/// Configuration for hand-built worlds: no random population and no
/// emergency arrivals.
fn quiet_config() -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.generation.tree_count = 0;
    config.world.generation.human_count = 0;
    config.world.generation.mob_count = 0;
    config.lifecycle.emergency_probability = 0.0;
    config
}

fn person(x: f64, age: f64, knowledge: Knowledge, personality: Personality) -> Human {
    human_at(Position::new(x, 0.0), age, knowledge, personality)
}

fn build(config: SimulationConfig, entities: Vec<Entity>) -> SimulationState {
    let mut world = WorldState::new();
    for entity in entities {
        world.insert(entity).unwrap();
    }
    SimulationState::with_world(config, world).unwrap()
}

#[test]
fn sociable_adults_eventually_have_a_child() {
    let social = Personality::new(0.0, 0.0, 0.9);
    let a = person(0.0, 20.0, Knowledge::uniform(2.0), social);
    let b = person(10.0, 20.0, Knowledge::uniform(4.0), social);
    let (a_id, b_id) = (a.id, b.id);
    let mut state = build(quiet_config(), vec![Entity::Human(a), Entity::Human(b)]);

    let mut born = None;
    for _ in 0..10_000 {
        let summary = run_tick(&mut state).unwrap();
        if summary.births > 0 {
            born = Some(summary);
            break;
        }
    }

    let summary = born.unwrap();
    assert_eq!(summary.population, 2 + summary.births);
    assert!(summary
        .events
        .iter()
        .any(|e| matches!(e.kind, EventKind::Birth { .. })));
    let parents = [a_id, b_id];
    let children: Vec<&Human> = state
        .world
        .humans()
        .filter(|h| !parents.contains(&h.id))
        .collect();
    assert!(!children.is_empty());
    for child in children {
        assert_eq!(child.age, 0.08);
        assert_eq!(child.size, 3.0);
    }
    assert!(state.world.human(a_id).unwrap().children >= 1);
    assert!(state.world.human(b_id).unwrap().children >= 1);
}

#[test]
fn exchange_pulls_two_humans_together() {
    let mut config = quiet_config();
    config.reproduction.low_population_probability = 0.0;
    config.reproduction.mid_population_probability = 0.0;
    config.reproduction.high_population_probability = 0.0;

    let social = Personality::new(0.0, 0.0, 0.9);
    let low = Knowledge {
        science: 0.0,
        ..Knowledge::uniform(1.0)
    };
    let high = Knowledge {
        science: 10.0,
        ..Knowledge::uniform(1.0)
    };
    let a = person(0.0, 30.0, low, social);
    let b = person(5.0, 30.0, high, social);
    let (a_id, b_id) = (a.id, b.id);
    let mut state = build(config, vec![Entity::Human(a), Entity::Human(b)]);

    for _ in 0..50 {
        run_tick(&mut state).unwrap();
    }

    let a = state.world.human(a_id).unwrap().knowledge.science;
    let b = state.world.human(b_id).unwrap().knowledge.science;
    assert!(a > 0.0 && a < 5.0, "low side moved to {a}");
    assert!(b < 10.0 && b > 5.0, "high side moved to {b}");
    assert!((a + b - 10.0).abs() < 1e-9);
}

#[test]
fn mutual_exchange_stops_short_of_the_mean() {
    let mut config = quiet_config();
    config.behavior.exchange_rate = 0.8;
    config.behavior.social_gain = 0.0;
    config.reproduction.low_population_probability = 0.0;
    config.reproduction.mid_population_probability = 0.0;
    config.reproduction.high_population_probability = 0.0;

    let social = Personality::new(0.0, 0.0, 0.9);
    let a = person(0.0, 30.0, Knowledge::ZERO, social);
    let b = person(5.0, 30.0, Knowledge::uniform(10.0), social);
    let (a_id, b_id) = (a.id, b.id);
    let mut state = build(config, vec![Entity::Human(a), Entity::Human(b)]);

    run_tick(&mut state).unwrap();

    let a = state.world.human(a_id).unwrap().knowledge;
    let b = state.world.human(b_id).unwrap().knowledge;
    for category in KnowledgeCategory::ALL {
        let (low, high) = (a.get(category), b.get(category));
        assert!(low <= 5.0 && high >= 5.0, "{category:?}: {low} / {high}");
        assert!((low + high - 10.0).abs() < 1e-9);
    }
}

#[test]
fn crowd_of_teachers_never_pushes_past_them() {
    let mut config = quiet_config();
    config.reproduction.low_population_probability = 0.0;
    config.reproduction.mid_population_probability = 0.0;
    config.reproduction.high_population_probability = 0.0;
    config.behavior.social_gain = 0.0;
    config.behavior.exchange_rate = 0.8;

    let social = Personality::new(0.0, 0.0, 0.9);
    let pupil = person(0.0, 30.0, Knowledge::ZERO, social);
    let pupil_id = pupil.id;
    let mut entities = vec![Entity::Human(pupil)];
    for i in 0..60_i32 {
        entities.push(Entity::Human(person(
            f64::from(i % 30) + 1.0,
            30.0,
            Knowledge::uniform(10.0),
            social,
        )));
    }
    let mut state = build(config, entities);

    run_tick(&mut state).unwrap();

    assert!(state.world.human(pupil_id).unwrap().knowledge.total() > 0.0);
    for human in state.world.humans() {
        for category in KnowledgeCategory::ALL {
            let value = human.knowledge.get(category);
            assert!((0.0..=10.0).contains(&value), "{category:?} at {value}");
        }
    }
}

#[test]
fn aggressive_mob_chases_and_wounds_a_nearby_human() {
    let human = person(0.0, 30.0, Knowledge::ZERO, Personality::new(0.0, 0.0, 0.0));
    let human_id = human.id;
    let mob = Mob {
        id: EntityId::new(),
        position: Position::new(10.0, 0.0),
        size: 6.0,
        color: String::from("#FFFFFF"),
        hp: 50.0,
        velocity: Velocity::ZERO,
        personality: Personality::new(0.9, 0.0, 0.0),
        smart: false,
    };
    let mob_id = mob.id;
    let mut state = build(quiet_config(), vec![Entity::Human(human), Entity::Mob(mob)]);

    let summary = run_tick(&mut state).unwrap();

    assert_eq!(state.world.human(human_id).unwrap().hp, 92.0);
    assert!(state.world.mob(mob_id).unwrap().velocity.vx < 0.0);
    assert!(summary
        .events
        .iter()
        .any(|e| e.kind == EventKind::MobAttack { human: human_id }));
}

#[test]
fn timid_mob_flees() {
    let human = person(0.0, 30.0, Knowledge::ZERO, Personality::new(0.0, 0.0, 0.0));
    let human_id = human.id;
    let mob = Mob {
        id: EntityId::new(),
        position: Position::new(30.0, 0.0),
        size: 6.0,
        color: String::from("#CCCCCC"),
        hp: 80.0,
        velocity: Velocity::ZERO,
        personality: Personality::new(0.2, 0.5, 0.1),
        smart: true,
    };
    let mob_id = mob.id;
    let mut state = build(quiet_config(), vec![Entity::Human(human), Entity::Mob(mob)]);

    run_tick(&mut state).unwrap();

    assert_eq!(state.world.human(human_id).unwrap().hp, 100.0);
    let mob = state.world.mob(mob_id).unwrap();
    assert!(mob.velocity.vx > 0.0);
    assert!(mob.position.x > 30.0);
}

#[test]
fn crafter_with_surplus_raises_one_building() {
    let mut human = person(0.0, 30.0, Knowledge::ZERO, Personality::new(0.0, 0.0, 0.0));
    human.resources = 30.0;
    human.knowledge.crafting = 15.0;
    let id = human.id;
    let mut state = build(quiet_config(), vec![Entity::Human(human)]);

    let summary = run_tick(&mut state).unwrap();

    assert_eq!(summary.buildings_raised, 1);
    assert_eq!(state.world.count(EntityKind::Building), 1);
    assert_eq!(state.stats.total_buildings, 1);
    let builder = state.world.human(id).unwrap();
    assert_eq!(builder.resources, 5.0);
    assert!((builder.knowledge.crafting - 15.05).abs() < 1e-12);
}

#[test]
fn aggregate_knowledge_unlocks_a_technology_once() {
    let mut config = quiet_config();
    config.technology.interval = 1;
    config.technology.technologies = vec![Technology::new(
        "Mathematics",
        KnowledgeCategory::Science,
        15.0,
        0.0,
    )];
    let explorer = Personality::new(0.0, 0.4, 0.0);
    let science = Knowledge {
        science: 5.0,
        ..Knowledge::ZERO
    };
    let humans = (0..3)
        .map(|i| Entity::Human(person(f64::from(i) * 500.0, 30.0, science, explorer)))
        .collect();
    let mut state = build(config, humans);

    let first = run_tick(&mut state).unwrap();
    assert_eq!(first.discoveries, vec![String::from("Mathematics")]);
    assert!(state.ledger.is_discovered("Mathematics"));
    assert_eq!(state.stats.technologies, 1);
    for human in state.world.humans() {
        assert_eq!(human.knowledge.science, 5.5);
        assert_eq!(human.knowledge.combat, 0.5);
    }

    for _ in 0..20 {
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.discoveries.is_empty());
        assert!(
            !summary
                .events
                .iter()
                .any(|e| matches!(e.kind, EventKind::TechnologyDiscovered { .. }))
        );
    }
    assert!(state.ledger.is_discovered("Mathematics"));
}

#[test]
fn events_are_stamped_and_kept_newest_first() {
    let mut config = quiet_config();
    config.technology.interval = 1;
    config.logging.event_log_capacity = 3;
    config.technology.technologies = vec![Technology::new(
        "Fire",
        KnowledgeCategory::Survival,
        0.0,
        10.0,
    )];
    let human = person(0.0, 30.0, Knowledge::ZERO, Personality::new(0.0, 0.4, 0.0));
    let mut state = build(config, vec![Entity::Human(human)]);

    for _ in 0..12 {
        run_tick(&mut state).unwrap();
    }

    let latest = state.events.latest().unwrap();
    assert_eq!(latest.tick, 1);
    assert_eq!(latest.year, 0);
    assert!(latest.log_line().contains("Fire"));

    let snapshot = state.snapshot();
    assert_eq!(snapshot.tick, 12);
    assert_eq!(snapshot.events.len(), 1);
    assert!(snapshot.technologies[0].discovered);
}
