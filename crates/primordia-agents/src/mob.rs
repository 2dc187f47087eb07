//! Mob behaviour.
//!
//! A mob looks for humans inside its sight box and reacts to the first one:
//! an aggressive, healthy mob chases and strikes within reach, any other mob
//! flees. With nobody in sight it occasionally picks a new random heading.

use rand::Rng;

use primordia_types::{EntityKind, EventKind, Mob, Velocity};
use primordia_world::roll::{centered, chance};
use primordia_world::{PerceptionConfig, SpatialQuery, WorldState};

use crate::command::TickCommand;
use crate::config::MobConfig;
use crate::error::AgentError;

/// Whether `mob` attacks rather than flees.
pub fn is_aggressive(mob: &Mob, config: &MobConfig) -> bool {
    mob.personality.aggression > config.aggression_threshold && mob.hp > config.attack_min_hp
}

/// Plan one mob's turn against the current world.
///
/// # Errors
///
/// Returns [`AgentError`] if the sighted human no longer resolves.
pub fn plan_mob(
    mob: &Mob,
    world: &WorldState,
    index: &dyn SpatialQuery,
    perception: &PerceptionConfig,
    config: &MobConfig,
    rng: &mut impl Rng,
) -> Result<Vec<TickCommand>, AgentError> {
    let sighted = index.query(
        world,
        EntityKind::Human,
        mob.position,
        perception.mob_sight_extent,
        Some(mob.id),
    );

    let Some(&target_id) = sighted.first() else {
        if chance(rng, config.wander_probability) {
            let heading = Velocity::new(
                centered(rng, config.wander_speed),
                centered(rng, config.wander_speed),
            );
            return Ok(vec![TickCommand::SetVelocity {
                entity: mob.id,
                velocity: heading,
            }]);
        }
        return Ok(Vec::new());
    };

    let target = world.human(target_id)?;
    if !is_aggressive(mob, config) {
        return Ok(vec![TickCommand::SetVelocity {
            entity: mob.id,
            velocity: Velocity::toward(target.position, mob.position, config.flee_gain),
        }]);
    }

    let mut out = vec![TickCommand::SetVelocity {
        entity: mob.id,
        velocity: Velocity::toward(mob.position, target.position, config.chase_gain),
    }];
    if mob.position.distance(target.position) < perception.mob_strike_distance {
        out.push(TickCommand::Wound {
            target: target.id,
            damage: config.strike_damage,
        });
        out.push(TickCommand::Emit(EventKind::MobAttack { human: target.id }));
    }
    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use primordia_types::{Entity, EntityId, Knowledge, Personality, Position};
    use primordia_world::{FullScan, human_at};

    use super::*;
    use crate::command::commit;

    fn mob_at(x: f64, aggression: f64, hp: f64) -> Mob {
        Mob {
            id: EntityId::new(),
            position: Position::new(x, 0.0),
            size: 4.0,
            color: String::from("#FFFFFF"),
            hp,
            velocity: Velocity::ZERO,
            personality: Personality::new(aggression, 0.1, 0.1),
            smart: false,
        }
    }

    fn setup(mob: &Mob) -> (WorldState, EntityId) {
        let mut world = WorldState::new();
        let human = human_at(
            Position::new(0.0, 0.0),
            30.0,
            Knowledge::ZERO,
            Personality::new(0.0, 0.0, 0.0),
        );
        let h = world.insert(Entity::Human(human)).unwrap();
        world.insert(Entity::Mob(mob.clone())).unwrap();
        (world, h)
    }

    #[test]
    fn aggressive_mob_in_reach_strikes() {
        let mob = mob_at(10.0, 0.9, 50.0);
        let (mut world, h) = setup(&mob);
        let mut rng = StdRng::seed_from_u64(0);
        let cfg = MobConfig::default();
        let commands = plan_mob(
            &mob,
            &world,
            &FullScan,
            &PerceptionConfig::default(),
            &cfg,
            &mut rng,
        )
        .unwrap();
        let events = commit(&mut world, commands);
        assert_eq!(world.human(h).unwrap().hp, 92.0);
        assert_eq!(events, vec![EventKind::MobAttack { human: h }]);
        assert!(world.mob(mob.id).unwrap().velocity.vx < 0.0);
    }

    #[test]
    fn aggressive_mob_out_of_reach_only_chases() {
        let mob = mob_at(50.0, 0.9, 50.0);
        let (mut world, h) = setup(&mob);
        let mut rng = StdRng::seed_from_u64(0);
        let commands = plan_mob(
            &mob,
            &world,
            &FullScan,
            &PerceptionConfig::default(),
            &MobConfig::default(),
            &mut rng,
        )
        .unwrap();
        commit(&mut world, commands);
        assert_eq!(world.human(h).unwrap().hp, 100.0);
        assert!((world.mob(mob.id).unwrap().velocity.vx + 1.0).abs() < 1e-12);
    }

    #[test]
    fn wounded_aggressive_mob_flees() {
        let mob = mob_at(10.0, 0.9, 40.0);
        let (mut world, h) = setup(&mob);
        let mut rng = StdRng::seed_from_u64(0);
        let commands = plan_mob(
            &mob,
            &world,
            &FullScan,
            &PerceptionConfig::default(),
            &MobConfig::default(),
            &mut rng,
        )
        .unwrap();
        commit(&mut world, commands);
        assert_eq!(world.human(h).unwrap().hp, 100.0);
        assert!((world.mob(mob.id).unwrap().velocity.vx - 0.3).abs() < 1e-12);
    }

    #[test]
    fn lonely_mob_wanders_or_idles() {
        let mob = mob_at(500.0, 0.9, 50.0);
        let (world, _) = setup(&mob);
        let mut rng = StdRng::seed_from_u64(0);
        let always = MobConfig {
            wander_probability: 1.0,
            ..MobConfig::default()
        };
        let never = MobConfig {
            wander_probability: 0.0,
            ..MobConfig::default()
        };
        let perception = PerceptionConfig::default();
        let moved = plan_mob(&mob, &world, &FullScan, &perception, &always, &mut rng).unwrap();
        assert_eq!(moved.len(), 1);
        let idle = plan_mob(&mob, &world, &FullScan, &perception, &never, &mut rng).unwrap();
        assert!(idle.is_empty());
    }
}
