//! Deferred mutations produced by planning and applied at commit.
//!
//! Planners read a borrowed [`WorldState`] and return [`TickCommand`]s; the
//! tick step commits them in order. Deltas are additive, so two agents that
//! touch the same target in one pass both take effect. Exchanges instead
//! converge from the values the pair holds at commit. A command aimed at an
//! entity that no longer exists is skipped.

use tracing::debug;

use primordia_types::{
    ActionKind, Entity, EntityId, EntityKind, EventKind, KnowledgeCategory, Velocity,
};
use primordia_world::WorldState;

use crate::exchange::converge;

/// One deferred change to the world.
#[derive(Debug, Clone, PartialEq)]
pub enum TickCommand {
    /// Record the action a human chose.
    SetGoal {
        /// The human.
        human: EntityId,
        /// The chosen action.
        goal: ActionKind,
    },
    /// Add to one knowledge category of a human.
    Learn {
        /// The human.
        human: EntityId,
        /// The category.
        category: KnowledgeCategory,
        /// Signed change.
        amount: f64,
    },
    /// Move two humans toward their mean in one category, from the values
    /// they hold when the command is applied.
    Exchange {
        /// The human who started the exchange.
        initiator: EntityId,
        /// The neighbor taking part.
        partner: EntityId,
        /// The category.
        category: KnowledgeCategory,
        /// Fraction of the gap closed.
        rate: f64,
    },
    /// Add to a human's resource stock.
    AdjustResources {
        /// The human.
        human: EntityId,
        /// Signed change.
        amount: f64,
    },
    /// Replace the velocity of a human or mob.
    SetVelocity {
        /// The moving entity.
        entity: EntityId,
        /// New velocity.
        velocity: Velocity,
    },
    /// Add to the velocity of a human or mob.
    Nudge {
        /// The moving entity.
        entity: EntityId,
        /// Velocity change.
        delta: Velocity,
    },
    /// A human strikes a mob. The mob dies if its hit points fall to zero or
    /// below, and the attacker claims the reward.
    Strike {
        /// The human.
        attacker: EntityId,
        /// The mob.
        target: EntityId,
        /// Hit points removed.
        damage: f64,
        /// Resources claimed on a kill.
        reward: f64,
    },
    /// A mob wounds a human. Death is settled by the lifecycle pass.
    Wound {
        /// The human.
        target: EntityId,
        /// Hit points removed.
        damage: f64,
    },
    /// Increment a human's children counter.
    CountChild {
        /// The parent.
        parent: EntityId,
    },
    /// Insert a new entity.
    Spawn(Box<Entity>),
    /// Record a narrative event.
    Emit(EventKind),
}

/// Apply `commands` in order and return the events they produced.
pub fn commit(world: &mut WorldState, commands: Vec<TickCommand>) -> Vec<EventKind> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

fn apply(world: &mut WorldState, command: TickCommand, events: &mut Vec<EventKind>) {
    match command {
        TickCommand::SetGoal { human, goal } => {
            if let Ok(h) = world.human_mut(human) {
                h.goal = goal;
            }
        }
        TickCommand::Learn {
            human,
            category,
            amount,
        } => {
            if let Ok(h) = world.human_mut(human) {
                h.knowledge.add(category, amount);
            }
        }
        TickCommand::Exchange {
            initiator,
            partner,
            category,
            rate,
        } => {
            let (Ok(a), Ok(b)) = (world.human(initiator), world.human(partner)) else {
                debug!(entity_id = %initiator, partner = %partner, "Exchange partner gone");
                return;
            };
            let (da, db) = converge(a.skill(category), b.skill(category), rate);
            for (id, amount) in [(initiator, da), (partner, db)] {
                if let Ok(h) = world.human_mut(id) {
                    h.knowledge.add(category, amount);
                }
            }
        }
        TickCommand::AdjustResources { human, amount } => {
            if let Ok(h) = world.human_mut(human) {
                h.resources = (h.resources + amount).max(0.0);
            }
        }
        TickCommand::SetVelocity { entity, velocity } => {
            if let Some(v) = velocity_of(world, entity) {
                *v = velocity;
            }
        }
        TickCommand::Nudge { entity, delta } => {
            if let Some(v) = velocity_of(world, entity) {
                v.vx += delta.vx;
                v.vy += delta.vy;
            }
        }
        TickCommand::Strike {
            attacker,
            target,
            damage,
            reward,
        } => {
            let Ok(mob) = world.mob_mut(target) else {
                debug!(entity_id = %target, "Strike target already gone");
                return;
            };
            mob.hp -= damage;
            if mob.hp <= 0.0 {
                world.remove(target);
                if let Ok(h) = world.human_mut(attacker) {
                    h.resources += reward;
                }
                debug!(entity_id = %target, attacker = %attacker, "Mob slain");
                events.push(EventKind::MobDefeated { human: attacker });
            }
        }
        TickCommand::Wound { target, damage } => {
            if let Ok(h) = world.human_mut(target) {
                h.hp -= damage;
            }
        }
        TickCommand::CountChild { parent } => {
            if let Ok(h) = world.human_mut(parent) {
                h.children = h.children.saturating_add(1);
            }
        }
        TickCommand::Spawn(entity) => {
            if let Err(err) = world.insert(*entity) {
                debug!(error = %err, "Spawn skipped");
            }
        }
        TickCommand::Emit(event) => events.push(event),
    }
}

fn velocity_of(world: &mut WorldState, id: EntityId) -> Option<&mut Velocity> {
    match world.get_mut(id)? {
        Entity::Human(h) => Some(&mut h.velocity),
        Entity::Mob(m) => Some(&mut m.velocity),
        Entity::Tree(_) | Entity::Building(_) => None,
    }
}

/// Advance every entity of `kind` by its velocity, then damp the velocity.
///
/// Only humans and mobs move; other kinds are left alone.
pub fn integrate_motion(world: &mut WorldState, kind: EntityKind, damping: f64) {
    for entity in world.entities_mut().filter(|e| e.kind() == kind) {
        match entity {
            Entity::Human(h) => {
                h.position = h.position.advanced(h.velocity);
                h.velocity = h.velocity.damped(damping);
            }
            Entity::Mob(m) => {
                m.position = m.position.advanced(m.velocity);
                m.velocity = m.velocity.damped(damping);
            }
            Entity::Tree(_) | Entity::Building(_) => {}
        }
    }
}
