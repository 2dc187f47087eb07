//! Action executors.
//!
//! Each executor reads the acting human, its neighbor sets, and the
//! start-of-tick world, and returns the [`TickCommand`]s that carry out the
//! action. Nothing is mutated here; the tick step commits the commands.
//!
//! | Action | Needs | Effect |
//! |---|---|---|
//! | socialize | a nearby human | exchange with the first neighbor, social gain, maybe a birth |
//! | gather | a nearby tree | +resources, survival gain, steer toward the nearest tree |
//! | build | resources above cost | pay cost, raise a building, crafting gain |
//! | fight | a nearby mob | strike the first mob, combat gain |
//! | learn | nothing | small gains, rare breakthrough |
//! | explore | nothing | random velocity nudge |

use rand::Rng;
use tracing::debug;

use primordia_types::{
    ActionKind, Building, BuildingKind, Entity, EntityId, EventKind, Human, KnowledgeCategory,
    Position, Velocity,
};
use primordia_world::generation::BUILDING_COLOR;
use primordia_world::roll::{centered, chance, pick, uniform};
use primordia_world::{Neighborhood, WorldError, WorldState};

use crate::command::TickCommand;
use crate::config::{BehaviorConfig, ReproductionConfig};
use crate::decision::decide;
use crate::error::AgentError;
use crate::exchange::exchange;
use crate::reproduction::try_conceive;

/// Visual radius of a building.
const BUILDING_SIZE: f64 = 8.0;

/// Read-only inputs every executor shares.
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    /// Decision and effect parameters.
    pub behavior: &'a BehaviorConfig,
    /// Birth parameters.
    pub reproduction: &'a ReproductionConfig,
    /// Living humans at the start of the tick.
    pub population: u32,
}

/// Decide and plan one human's turn.
///
/// # Errors
///
/// Returns [`AgentError`] if a neighbor id no longer resolves.
pub fn plan_human(
    human: &Human,
    near: &Neighborhood,
    world: &WorldState,
    ctx: &ActionContext<'_>,
    rng: &mut impl Rng,
) -> Result<Vec<TickCommand>, AgentError> {
    let action = decide(human, near, ctx.behavior);
    let mut commands = vec![TickCommand::SetGoal {
        human: human.id,
        goal: action,
    }];
    commands.extend(execute(action, human, near, world, ctx, rng)?);
    Ok(commands)
}

/// Carry out `action` for `human`. Preconditions that do not hold make the
/// action a no-op.
///
/// # Errors
///
/// Returns [`AgentError`] if a neighbor id no longer resolves.
pub fn execute(
    action: ActionKind,
    human: &Human,
    near: &Neighborhood,
    world: &WorldState,
    ctx: &ActionContext<'_>,
    rng: &mut impl Rng,
) -> Result<Vec<TickCommand>, AgentError> {
    match action {
        ActionKind::Socialize => socialize(human, near, world, ctx, rng),
        ActionKind::Gather => gather(human, near, world, ctx.behavior),
        ActionKind::Build => Ok(build(human, ctx.behavior, rng)),
        ActionKind::Fight => Ok(fight(human, near, ctx.behavior)),
        ActionKind::Learn => Ok(learn(human, ctx.behavior, rng)),
        ActionKind::Explore => Ok(explore(human, ctx.behavior, rng)),
    }
}

fn socialize(
    human: &Human,
    near: &Neighborhood,
    world: &WorldState,
    ctx: &ActionContext<'_>,
    rng: &mut impl Rng,
) -> Result<Vec<TickCommand>, AgentError> {
    let Some(&partner_id) = near.humans.first() else {
        return Ok(Vec::new());
    };
    let partner = world.human(partner_id)?;
    let cfg = ctx.behavior;

    let mut out = exchange(
        human,
        partner,
        cfg.exchange_rate,
        cfg.share_event_probability,
        rng,
    )
    .into_commands();
    out.push(TickCommand::Learn {
        human: human.id,
        category: KnowledgeCategory::Social,
        amount: cfg.social_gain,
    });

    if let Some(child) = try_conceive(human, partner, ctx.population, ctx.reproduction, rng)? {
        debug!(
            entity_id = %child.id,
            parent = %human.id,
            partner = %partner.id,
            "Child conceived"
        );
        out.push(TickCommand::CountChild { parent: human.id });
        out.push(TickCommand::CountChild { parent: partner.id });
        out.push(TickCommand::Emit(EventKind::Birth { child: child.id }));
        out.push(TickCommand::Spawn(Box::new(Entity::Human(child))));
    }
    Ok(out)
}

fn gather(
    human: &Human,
    near: &Neighborhood,
    world: &WorldState,
    cfg: &BehaviorConfig,
) -> Result<Vec<TickCommand>, AgentError> {
    let mut nearest: Option<Position> = None;
    for &id in &near.trees {
        let pos = world
            .get(id)
            .map(Entity::position)
            .ok_or(WorldError::EntityNotFound(id))?;
        let closer = nearest.is_none_or(|best| {
            human.position.distance(pos) < human.position.distance(best)
        });
        if closer {
            nearest = Some(pos);
        }
    }
    let Some(tree) = nearest else {
        return Ok(Vec::new());
    };
    Ok(vec![
        TickCommand::AdjustResources {
            human: human.id,
            amount: cfg.gather_yield,
        },
        TickCommand::Learn {
            human: human.id,
            category: KnowledgeCategory::Survival,
            amount: cfg.gather_survival_gain,
        },
        TickCommand::SetVelocity {
            entity: human.id,
            velocity: Velocity::toward(human.position, tree, cfg.gather_steer),
        },
    ])
}

fn build(human: &Human, cfg: &BehaviorConfig, rng: &mut impl Rng) -> Vec<TickCommand> {
    if human.resources <= cfg.build_cost {
        return Vec::new();
    }
    let kind = pick(rng, &[BuildingKind::House, BuildingKind::Workshop])
        .copied()
        .unwrap_or(BuildingKind::House);
    let building = Building {
        id: EntityId::new(),
        position: Position::new(
            human.position.x + centered(rng, cfg.build_offset),
            human.position.y + centered(rng, cfg.build_offset),
        ),
        size: BUILDING_SIZE,
        color: BUILDING_COLOR.to_owned(),
        kind,
    };
    debug!(entity_id = %building.id, builder = %human.id, kind = %kind, "Building raised");
    vec![
        TickCommand::AdjustResources {
            human: human.id,
            amount: -cfg.build_cost,
        },
        TickCommand::Learn {
            human: human.id,
            category: KnowledgeCategory::Crafting,
            amount: cfg.build_crafting_gain,
        },
        TickCommand::Spawn(Box::new(Entity::Building(building))),
        TickCommand::Emit(EventKind::BuildingConstructed {
            builder: human.id,
            building: kind,
        }),
    ]
}

fn fight(human: &Human, near: &Neighborhood, cfg: &BehaviorConfig) -> Vec<TickCommand> {
    let Some(&target) = near.mobs.first() else {
        return Vec::new();
    };
    vec![
        TickCommand::Strike {
            attacker: human.id,
            target,
            damage: cfg.fight_base_damage + human.knowledge.combat,
            reward: cfg.kill_reward,
        },
        TickCommand::Learn {
            human: human.id,
            category: KnowledgeCategory::Combat,
            amount: cfg.fight_combat_gain,
        },
    ]
}

fn learn(human: &Human, cfg: &BehaviorConfig, rng: &mut impl Rng) -> Vec<TickCommand> {
    let gains = [
        (KnowledgeCategory::Science, cfg.learn_science_gain),
        (KnowledgeCategory::Crafting, cfg.learn_crafting_gain),
        (KnowledgeCategory::Survival, cfg.learn_survival_gain),
        (KnowledgeCategory::Social, cfg.learn_social_gain),
    ];
    let mut out: Vec<TickCommand> = gains
        .into_iter()
        .map(|(category, amount)| TickCommand::Learn {
            human: human.id,
            category,
            amount,
        })
        .collect();

    if chance(rng, cfg.breakthrough_probability) {
        let category = pick(rng, &KnowledgeCategory::ALL)
            .copied()
            .unwrap_or(KnowledgeCategory::Science);
        let bonus = uniform(rng, cfg.breakthrough_min, cfg.breakthrough_span);
        debug!(entity_id = %human.id, category = %category, bonus, "Breakthrough");
        out.push(TickCommand::Learn {
            human: human.id,
            category,
            amount: bonus,
        });
        out.push(TickCommand::Emit(EventKind::Breakthrough {
            human: human.id,
            category,
        }));
    }
    out
}

fn explore(human: &Human, cfg: &BehaviorConfig, rng: &mut impl Rng) -> Vec<TickCommand> {
    vec![TickCommand::Nudge {
        entity: human.id,
        delta: Velocity::new(
            centered(rng, cfg.explore_jitter),
            centered(rng, cfg.explore_jitter),
        ),
    }]
}
