//! Reproduction under population pressure.
//!
//! A socializing pair of adults may conceive. The chance is higher when the
//! population is small and gets a bonus when both partners are in their
//! prime. A child starts with a damped average of its parents' knowledge and
//! a jittered average of their personalities.

use rand::Rng;

use primordia_types::{Human, Knowledge, Personality, Position, Velocity};
use primordia_world::human_at;
use primordia_world::roll::{centered, chance};

use crate::config::ReproductionConfig;
use crate::error::AgentError;

/// Visual radius of a newborn.
const NEWBORN_SIZE: f64 = 3.0;

/// Birth probability for this pair at this population, or zero if either
/// partner is too young.
pub fn birth_probability(
    a: &Human,
    b: &Human,
    population: u32,
    config: &ReproductionConfig,
) -> f64 {
    if a.age <= config.min_age || b.age <= config.min_age {
        return 0.0;
    }
    let base = config.base_probability(population);
    if config.in_prime(a.age) && config.in_prime(b.age) {
        base * config.prime_multiplier
    } else {
        base
    }
}

/// Blend two personalities: mean plus independent jitter per trait, clamped.
pub fn blend_personality(
    a: &Personality,
    b: &Personality,
    jitter: f64,
    rng: &mut impl Rng,
) -> Personality {
    Personality::new(
        f64::midpoint(a.aggression, b.aggression) + centered(rng, jitter),
        f64::midpoint(a.curiosity, b.curiosity) + centered(rng, jitter),
        f64::midpoint(a.social, b.social) + centered(rng, jitter),
    )
}

/// Create a child of `initiator` and `partner`, placed near the initiator.
///
/// # Errors
///
/// Returns [`AgentError::InvalidParent`] if both records are the same human.
pub fn create_child(
    initiator: &Human,
    partner: &Human,
    config: &ReproductionConfig,
    rng: &mut impl Rng,
) -> Result<Human, AgentError> {
    if initiator.id == partner.id {
        return Err(AgentError::InvalidParent(initiator.id));
    }
    let knowledge = Knowledge::average(&initiator.knowledge, &partner.knowledge)
        .scaled(config.knowledge_inheritance);
    let personality = blend_personality(
        &initiator.personality,
        &partner.personality,
        config.personality_jitter,
        rng,
    );
    let position = Position::new(
        initiator.position.x + centered(rng, config.spawn_offset),
        initiator.position.y + centered(rng, config.spawn_offset),
    );

    let mut child = human_at(position, 0.0, knowledge, personality);
    child.size = NEWBORN_SIZE;
    child.velocity = Velocity::new(
        centered(rng, config.newborn_speed),
        centered(rng, config.newborn_speed),
    );
    Ok(child)
}

/// Roll for conception and create the child on success.
///
/// # Errors
///
/// Returns [`AgentError::InvalidParent`] if both records are the same human.
pub fn try_conceive(
    initiator: &Human,
    partner: &Human,
    population: u32,
    config: &ReproductionConfig,
    rng: &mut impl Rng,
) -> Result<Option<Human>, AgentError> {
    let p = birth_probability(initiator, partner, population, config);
    if p <= 0.0 || !chance(rng, p) {
        return Ok(None);
    }
    create_child(initiator, partner, config, rng).map(Some)
}
