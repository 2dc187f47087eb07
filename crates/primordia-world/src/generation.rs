//! World generation: the initial population of trees, humans, and mobs.
//!
//! All ranges come from [`WorldGenConfig`]. Every placement is uniform inside
//! a square centered on the origin. The same human generator serves
//! emergency repopulation.

use rand::Rng;
use serde::Deserialize;
use tracing::debug;

use primordia_types::{
    ActionKind, Entity, EntityId, Human, Knowledge, Mob, Personality, Position, Tree, Velocity,
};

use crate::error::WorldError;
use crate::roll::{centered, chance, pick, uniform};
use crate::state::WorldState;

/// Display color for humans.
pub const HUMAN_COLOR: &str = "#FF4444";
/// Display color for trees.
pub const TREE_COLOR: &str = "#8FBC8F";
/// Display color for ordinary mobs.
pub const MOB_COLOR: &str = "#FFFFFF";
/// Display color for smart mobs.
pub const SMART_MOB_COLOR: &str = "#CCCCCC";
/// Display color for buildings.
pub const BUILDING_COLOR: &str = "#8B4513";

/// Hit points of a freshly spawned human.
pub const HUMAN_START_HP: f64 = 100.0;

/// Goals a freshly generated human may display before its first decision.
const STARTING_GOALS: [ActionKind; 5] = [
    ActionKind::Explore,
    ActionKind::Gather,
    ActionKind::Socialize,
    ActionKind::Build,
    ActionKind::Learn,
];

/// A uniform draw from `[min, min + span)`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct UniformRange {
    /// Lower bound.
    pub min: f64,
    /// Width of the range.
    pub span: f64,
}

impl UniformRange {
    /// A range starting at `min` with width `span`.
    pub const fn new(min: f64, span: f64) -> Self {
        Self { min, span }
    }

    /// Draw one value.
    pub fn roll(self, rng: &mut impl Rng) -> f64 {
        uniform(rng, self.min, self.span)
    }

    /// Exclusive upper bound.
    pub const fn max(self) -> f64 {
        self.min + self.span
    }
}

/// Per-trait ranges for a generated personality.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PersonalityRanges {
    /// Aggression range.
    pub aggression: UniformRange,
    /// Curiosity range.
    pub curiosity: UniformRange,
    /// Sociability range.
    pub social: UniformRange,
}

impl PersonalityRanges {
    /// Every trait uniform over `[0, 1)`.
    pub const FULL: Self = Self {
        aggression: UniformRange::new(0.0, 1.0),
        curiosity: UniformRange::new(0.0, 1.0),
        social: UniformRange::new(0.0, 1.0),
    };

    /// Draw a personality.
    pub fn roll(&self, rng: &mut impl Rng) -> Personality {
        Personality::new(
            self.aggression.roll(rng),
            self.curiosity.roll(rng),
            self.social.roll(rng),
        )
    }

    /// The three ranges, for validation.
    pub const fn ranges(&self) -> [(&'static str, UniformRange); 3] {
        [
            ("aggression", self.aggression),
            ("curiosity", self.curiosity),
            ("social", self.social),
        ]
    }
}

/// Initial population sizes and randomization ranges.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// Trees placed at world creation.
    pub tree_count: u32,
    /// Humans placed at world creation.
    pub human_count: u32,
    /// Mobs placed at world creation.
    pub mob_count: u32,
    /// Half-extent of the square trees are scattered in.
    pub tree_spread: f64,
    /// Half-extent of the square humans are scattered in.
    pub human_spread: f64,
    /// Half-extent of the square mobs are scattered in.
    pub mob_spread: f64,
    /// Youngest generated adult.
    pub human_min_age: f64,
    /// Width of the generated adult age range.
    pub human_age_span: f64,
    /// Upper bound (exclusive) of each starting knowledge component.
    pub initial_knowledge_max: f64,
    /// Upper bound (exclusive) of starting resources, floored to whole units.
    pub initial_resources_max: f64,
    /// Half-range of each starting velocity component for humans.
    pub human_initial_speed: f64,
    /// Generated human sizes.
    pub human_size: UniformRange,
    /// Personality ranges for generated humans.
    pub human_personality: PersonalityRanges,
    /// Fraction of mobs generated as the smart variant.
    pub smart_mob_fraction: f64,
    /// Lowest mob hit points.
    pub mob_min_hp: f64,
    /// Width of the mob hit point range.
    pub mob_hp_span: f64,
    /// Generated mob sizes.
    pub mob_size: UniformRange,
    /// Half-range of each starting velocity component for ordinary mobs.
    pub mob_speed: f64,
    /// Half-range of each starting velocity component for smart mobs.
    pub smart_mob_speed: f64,
    /// Personality ranges for ordinary mobs.
    pub mob_personality: PersonalityRanges,
    /// Personality ranges for smart mobs.
    pub smart_mob_personality: PersonalityRanges,
    /// Generated tree sizes.
    pub tree_size: UniformRange,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            tree_count: 80,
            human_count: 15,
            mob_count: 40,
            tree_spread: 1500.0,
            human_spread: 150.0,
            mob_spread: 1250.0,
            human_min_age: 18.0,
            human_age_span: 25.0,
            initial_knowledge_max: 3.0,
            initial_resources_max: 8.0,
            human_initial_speed: 0.75,
            human_size: UniformRange::new(5.0, 3.0),
            human_personality: PersonalityRanges::FULL,
            smart_mob_fraction: 0.3,
            mob_min_hp: 30.0,
            mob_hp_span: 60.0,
            mob_size: UniformRange::new(3.0, 5.0),
            mob_speed: 2.0,
            smart_mob_speed: 1.25,
            mob_personality: PersonalityRanges {
                aggression: UniformRange::new(0.0, 1.0),
                curiosity: UniformRange::new(0.0, 0.3),
                social: UniformRange::new(0.0, 0.4),
            },
            smart_mob_personality: PersonalityRanges {
                aggression: UniformRange::new(0.0, 0.7),
                curiosity: UniformRange::new(0.2, 0.8),
                social: UniformRange::new(0.0, 0.4),
            },
            tree_size: UniformRange::new(4.0, 8.0),
        }
    }
}

/// Build a human with mandatory fields set and everything else at rest.
///
/// Used for births, spawns, and tests.
pub fn human_at(
    position: Position,
    age: f64,
    knowledge: Knowledge,
    personality: Personality,
) -> Human {
    Human {
        id: EntityId::new(),
        position,
        size: 5.0,
        color: HUMAN_COLOR.to_owned(),
        hp: HUMAN_START_HP,
        age,
        velocity: Velocity::ZERO,
        resources: 0.0,
        children: 0,
        knowledge,
        goal: ActionKind::Explore,
        personality,
        memory: Vec::new(),
    }
}

/// A randomized adult human placed inside the configured spawn square.
pub fn random_human(config: &WorldGenConfig, rng: &mut impl Rng) -> Human {
    let position = Position::new(
        centered(rng, config.human_spread),
        centered(rng, config.human_spread),
    );
    let age = uniform(rng, config.human_min_age, config.human_age_span);
    let knowledge = Knowledge {
        science: uniform(rng, 0.0, config.initial_knowledge_max),
        crafting: uniform(rng, 0.0, config.initial_knowledge_max),
        combat: uniform(rng, 0.0, config.initial_knowledge_max),
        survival: uniform(rng, 0.0, config.initial_knowledge_max),
        social: uniform(rng, 0.0, config.initial_knowledge_max),
    };
    let personality = config.human_personality.roll(rng);

    let mut human = human_at(position, age, knowledge, personality);
    human.size = config.human_size.roll(rng);
    human.velocity = Velocity::new(
        centered(rng, config.human_initial_speed),
        centered(rng, config.human_initial_speed),
    );
    human.resources = uniform(rng, 0.0, config.initial_resources_max).floor();
    human.goal = pick(rng, &STARTING_GOALS)
        .copied()
        .unwrap_or(ActionKind::Explore);
    human
}

/// A randomized mob; a configured fraction are the smart variant.
pub fn random_mob(config: &WorldGenConfig, rng: &mut impl Rng) -> Mob {
    let smart = chance(rng, config.smart_mob_fraction);
    let position = Position::new(
        centered(rng, config.mob_spread),
        centered(rng, config.mob_spread),
    );
    let hp = uniform(rng, config.mob_min_hp, config.mob_hp_span);
    let size = config.mob_size.roll(rng);
    let speed = if smart {
        config.smart_mob_speed
    } else {
        config.mob_speed
    };
    let velocity = Velocity::new(centered(rng, speed), centered(rng, speed));
    let personality = if smart {
        config.smart_mob_personality.roll(rng)
    } else {
        config.mob_personality.roll(rng)
    };

    Mob {
        id: EntityId::new(),
        position,
        size,
        color: if smart { SMART_MOB_COLOR } else { MOB_COLOR }.to_owned(),
        hp,
        velocity,
        personality,
        smart,
    }
}

/// A tree at a random spot.
pub fn random_tree(config: &WorldGenConfig, rng: &mut impl Rng) -> Tree {
    Tree {
        id: EntityId::new(),
        position: Position::new(
            centered(rng, config.tree_spread),
            centered(rng, config.tree_spread),
        ),
        size: config.tree_size.roll(rng),
        color: TREE_COLOR.to_owned(),
    }
}

/// Clear `world` and fill it with a fresh initial population.
///
/// Trees go in first, then humans, then mobs, so id order groups them.
///
/// # Errors
///
/// Returns [`WorldError::DuplicateId`] only if id generation collides.
pub fn populate(
    world: &mut WorldState,
    config: &WorldGenConfig,
    rng: &mut impl Rng,
) -> Result<(), WorldError> {
    world.clear();
    for _ in 0..config.tree_count {
        world.insert(Entity::Tree(random_tree(config, rng)))?;
    }
    for _ in 0..config.human_count {
        world.insert(Entity::Human(random_human(config, rng)))?;
    }
    for _ in 0..config.mob_count {
        world.insert(Entity::Mob(random_mob(config, rng)))?;
    }
    debug!(
        trees = config.tree_count,
        humans = config.human_count,
        mobs = config.mob_count,
        "World populated"
    );
    Ok(())
}
