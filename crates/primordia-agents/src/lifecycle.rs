//! Aging, death, bequest, and emergency repopulation.
//!
//! Thresholds bend with population pressure: while the population is
//! critical, humans live longer and survive wounds down to a negative hit
//! point floor. Every death hands a fraction of the deceased's knowledge to
//! the humans standing nearby.

use rand::Rng;
use tracing::{debug, info};

use primordia_types::{Entity, EntityId, EntityKind, EventKind, Human, Knowledge};
use primordia_world::roll::{chance, uniform};
use primordia_world::{
    PerceptionConfig, SpatialQuery, WorldGenConfig, WorldState, random_human,
};

use crate::config::LifecycleConfig;
use crate::error::AgentError;

/// A human removed by the lifecycle pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathRecord {
    /// The deceased.
    pub human: EntityId,
    /// Age at death.
    pub age: f64,
    /// Whether the deceased's total knowledge exceeded the sage threshold.
    pub sage: bool,
    /// Survivors who received a bequest.
    pub heirs: Vec<EntityId>,
}

/// What one lifecycle pass changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleReport {
    /// Deaths in id order.
    pub deaths: Vec<DeathRecord>,
    /// The emergency newcomer, if one arrived.
    pub spawned: Option<EntityId>,
    /// Narrative events, in the order they happened.
    pub events: Vec<EventKind>,
}

/// Add one tick of age to every living human.
pub fn age_population(world: &mut WorldState, rate: f64) {
    for human in world.humans_mut() {
        human.age += rate;
    }
}

/// The age beyond which `human` dies this tick.
///
/// `base + uniform(0, jitter) + min(total_knowledge * rate, cap)`, plus the
/// scarcity grace while the population is critical.
pub fn death_age(
    human: &Human,
    population: u32,
    config: &LifecycleConfig,
    rng: &mut impl Rng,
) -> f64 {
    let knowledge_bonus =
        (human.knowledge.total() * config.knowledge_bonus_rate).min(config.knowledge_bonus_cap);
    let grace = if config.is_critical(population) {
        config.scarcity_grace_years
    } else {
        0.0
    };
    uniform(rng, config.base_death_age, config.death_age_jitter) + knowledge_bonus.max(0.0) + grace
}

/// The death condition: too old, or hit points at or below the floor.
pub fn is_dead(human: &Human, death_age: f64, hp_floor: f64) -> bool {
    human.age > death_age || human.hp <= hp_floor
}

/// The share of `deceased`'s knowledge each heir receives.
pub fn bequest_share(deceased: &Human, fraction: f64) -> Knowledge {
    deceased.knowledge.scaled(fraction)
}

/// Spawn a randomized adult if the population is below the floor and the
/// roll succeeds.
pub fn emergency_spawn(
    population: u32,
    config: &LifecycleConfig,
    generation: &WorldGenConfig,
    rng: &mut impl Rng,
) -> Option<Human> {
    if population >= config.emergency_floor {
        return None;
    }
    chance(rng, config.emergency_probability).then(|| random_human(generation, rng))
}

/// Run aging, death evaluation, bequest, removal, and emergency spawning.
///
/// Population pressure is measured once, before anyone dies.
///
/// # Errors
///
/// Returns [`AgentError`] if a world insert or lookup fails.
pub fn run_lifecycle(
    world: &mut WorldState,
    index: &mut dyn SpatialQuery,
    perception: &PerceptionConfig,
    config: &LifecycleConfig,
    generation: &WorldGenConfig,
    rng: &mut impl Rng,
) -> Result<LifecycleReport, AgentError> {
    let mut report = LifecycleReport::default();
    let population = world.population();
    let hp_floor = config.hp_floor_for(population);

    age_population(world, config.aging_rate);
    index.rebuild(world);

    for id in world.human_ids() {
        let human = world.human(id)?;
        let threshold = death_age(human, population, config, rng);
        if !is_dead(human, threshold, hp_floor) {
            continue;
        }

        let share = bequest_share(human, config.bequest_fraction);
        let sage = human.knowledge.total() > config.sage_threshold;
        let age = human.age;
        let nearby = index.query(
            world,
            EntityKind::Human,
            human.position,
            perception.human_extent,
            Some(id),
        );

        world.remove(id);
        let mut heirs = Vec::with_capacity(nearby.len());
        for heir in nearby {
            if let Ok(survivor) = world.human_mut(heir) {
                survivor.knowledge = survivor.knowledge.plus(&share);
                heirs.push(heir);
            }
        }

        info!(entity_id = %id, age, sage, heirs = heirs.len(), "Human died");
        report.events.push(EventKind::Death {
            human: id,
            age: whole_years(age),
            sage,
        });
        report.deaths.push(DeathRecord {
            human: id,
            age,
            sage,
            heirs,
        });
    }

    if let Some(newcomer) = emergency_spawn(world.population(), config, generation, rng) {
        let id = world.insert(Entity::Human(newcomer))?;
        info!(entity_id = %id, population = world.population(), "Emergency spawn");
        report.events.push(EventKind::EmergencySpawn { human: id });
        report.spawned = Some(id);
    } else {
        debug!(population = world.population(), "No emergency spawn");
    }

    Ok(report)
}

/// Whole years of `age`, saturating at the `u32` range.
// Safe: the value is clamped to the u32 range before the cast.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn whole_years(age: f64) -> u32 {
    age.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}
