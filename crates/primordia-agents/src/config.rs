//! Tunable parameters for agent behaviour, reproduction, and lifecycle.
//!
//! Each struct maps to one section of `primordia-config.yaml`. Every field
//! has a default, so a partial section only overrides what it names.

use serde::Deserialize;

/// Decision thresholds, priority weights, and action effects for humans.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Sociability above which socializing is proposed.
    pub socialize_threshold: f64,
    /// Priority per unit of sociability.
    pub socialize_weight: f64,
    /// Curiosity above which learning is proposed.
    pub learn_threshold: f64,
    /// Priority per unit of curiosity for learning.
    pub learn_weight: f64,
    /// Resource stock below which gathering is proposed.
    pub gather_ceiling: f64,
    /// Priority per missing resource unit.
    pub gather_weight: f64,
    /// Aggression above which fighting is proposed.
    pub fight_threshold: f64,
    /// Priority per unit of aggression.
    pub fight_weight: f64,
    /// Resource stock above which building is proposed.
    pub build_resource_threshold: f64,
    /// Crafting knowledge above which building is proposed.
    pub build_crafting_threshold: f64,
    /// Divisor applied to crafting knowledge for build priority.
    pub build_priority_divisor: f64,
    /// Curiosity above which exploring is proposed.
    pub explore_threshold: f64,
    /// Priority per unit of curiosity for exploring.
    pub explore_weight: f64,

    /// Social knowledge gained per socialize action.
    pub social_gain: f64,
    /// Fraction of the gap to the pairwise mean closed per exchange.
    pub exchange_rate: f64,
    /// Probability that an exchange is narrated.
    pub share_event_probability: f64,

    /// Resources gained per gather action.
    pub gather_yield: f64,
    /// Survival knowledge gained per gather action.
    pub gather_survival_gain: f64,
    /// Fraction of the offset to the tree applied as velocity.
    pub gather_steer: f64,

    /// Resources a building needs (strictly more than this must be held).
    pub build_cost: f64,
    /// Half-range of the random offset of a new building.
    pub build_offset: f64,
    /// Crafting knowledge gained per building.
    pub build_crafting_gain: f64,

    /// Damage dealt before the combat knowledge bonus.
    pub fight_base_damage: f64,
    /// Combat knowledge gained per strike.
    pub fight_combat_gain: f64,
    /// Resources claimed from a slain mob.
    pub kill_reward: f64,

    /// Science gained per learn action.
    pub learn_science_gain: f64,
    /// Crafting gained per learn action.
    pub learn_crafting_gain: f64,
    /// Survival gained per learn action.
    pub learn_survival_gain: f64,
    /// Social gained per learn action.
    pub learn_social_gain: f64,
    /// Probability of a breakthrough per learn action.
    pub breakthrough_probability: f64,
    /// Smallest breakthrough bonus.
    pub breakthrough_min: f64,
    /// Width of the breakthrough bonus range.
    pub breakthrough_span: f64,

    /// Half-range of the random velocity nudge when exploring.
    pub explore_jitter: f64,
    /// Velocity retained per tick by humans.
    pub human_damping: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            socialize_threshold: 0.4,
            socialize_weight: 10.0,
            learn_threshold: 0.5,
            learn_weight: 8.0,
            gather_ceiling: 15.0,
            gather_weight: 2.0,
            fight_threshold: 0.6,
            fight_weight: 6.0,
            build_resource_threshold: 20.0,
            build_crafting_threshold: 10.0,
            build_priority_divisor: 2.0,
            explore_threshold: 0.3,
            explore_weight: 3.0,
            social_gain: 0.02,
            exchange_rate: 0.1,
            share_event_probability: 0.1,
            gather_yield: 1.0,
            gather_survival_gain: 0.01,
            gather_steer: 0.01,
            build_cost: 25.0,
            build_offset: 15.0,
            build_crafting_gain: 0.05,
            fight_base_damage: 15.0,
            fight_combat_gain: 0.03,
            kill_reward: 5.0,
            learn_science_gain: 0.02,
            learn_crafting_gain: 0.01,
            learn_survival_gain: 0.005,
            learn_social_gain: 0.005,
            breakthrough_probability: 0.02,
            breakthrough_min: 1.0,
            breakthrough_span: 2.0,
            explore_jitter: 0.25,
            human_damping: 0.98,
        }
    }
}

/// Mob attack, flight, and wandering.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MobConfig {
    /// Aggression above which a mob attacks instead of fleeing.
    pub aggression_threshold: f64,
    /// Hit points above which an aggressive mob still attacks.
    pub attack_min_hp: f64,
    /// Fraction of the offset to the target applied as chase velocity.
    pub chase_gain: f64,
    /// Fraction of the offset from the threat applied as flight velocity.
    pub flee_gain: f64,
    /// Damage per strike on a human.
    pub strike_damage: f64,
    /// Probability per tick that an idle mob picks a new heading.
    pub wander_probability: f64,
    /// Half-range of each component of a new idle heading.
    pub wander_speed: f64,
    /// Velocity retained per tick by mobs.
    pub damping: f64,
}

impl Default for MobConfig {
    fn default() -> Self {
        Self {
            aggression_threshold: 0.6,
            attack_min_hp: 40.0,
            chase_gain: 0.02,
            flee_gain: 0.03,
            strike_damage: 8.0,
            wander_probability: 0.1,
            wander_speed: 1.5,
            damping: 0.95,
        }
    }
}

/// Population-pressure reproduction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReproductionConfig {
    /// Both partners must be strictly older than this.
    pub min_age: f64,
    /// Population below which `low_population_probability` applies.
    pub low_population: u32,
    /// Per-socialize birth probability for a small population.
    pub low_population_probability: f64,
    /// Population below which `mid_population_probability` applies.
    pub mid_population: u32,
    /// Per-socialize birth probability for a moderate population.
    pub mid_population_probability: f64,
    /// Per-socialize birth probability for a large population.
    pub high_population_probability: f64,
    /// Lower edge of the prime age band.
    pub prime_age_min: f64,
    /// Upper edge of the prime age band.
    pub prime_age_max: f64,
    /// Probability multiplier when both partners are in the prime band.
    pub prime_multiplier: f64,
    /// Fraction of the parents' mean knowledge a child starts with.
    pub knowledge_inheritance: f64,
    /// Half-range of the per-trait personality jitter.
    pub personality_jitter: f64,
    /// Half-range of a newborn's offset from the initiating parent.
    pub spawn_offset: f64,
    /// Half-range of a newborn's initial velocity.
    pub newborn_speed: f64,
}

impl Default for ReproductionConfig {
    fn default() -> Self {
        Self {
            min_age: 18.0,
            low_population: 20,
            low_population_probability: 0.02,
            mid_population: 40,
            mid_population_probability: 0.008,
            high_population_probability: 0.003,
            prime_age_min: 18.0,
            prime_age_max: 45.0,
            prime_multiplier: 1.5,
            knowledge_inheritance: 0.1,
            personality_jitter: 0.1,
            spawn_offset: 12.5,
            newborn_speed: 0.75,
        }
    }
}

/// Aging, death, bequest, and emergency repopulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Years added per tick.
    pub aging_rate: f64,
    /// Base death age.
    pub base_death_age: f64,
    /// Width of the uniform range added to the base death age.
    pub death_age_jitter: f64,
    /// Extra years granted per unit of total knowledge.
    pub knowledge_bonus_rate: f64,
    /// Ceiling on the knowledge bonus in years.
    pub knowledge_bonus_cap: f64,
    /// Population below which scarcity adjustments apply.
    pub critical_population: u32,
    /// Extra years granted while the population is critical.
    pub scarcity_grace_years: f64,
    /// Hit point floor while the population is critical.
    pub critical_hp_floor: f64,
    /// Hit point floor otherwise.
    pub hp_floor: f64,
    /// Fraction of each category passed to every nearby survivor.
    pub bequest_fraction: f64,
    /// Total knowledge above which the deceased is remembered as a sage.
    pub sage_threshold: f64,
    /// Population below which emergency spawns are attempted.
    pub emergency_floor: u32,
    /// Probability per tick of an emergency spawn while below the floor.
    pub emergency_probability: f64,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            aging_rate: 0.08,
            base_death_age: 85.0,
            death_age_jitter: 20.0,
            knowledge_bonus_rate: 0.2,
            knowledge_bonus_cap: 20.0,
            critical_population: 8,
            scarcity_grace_years: 15.0,
            critical_hp_floor: -20.0,
            hp_floor: 0.0,
            bequest_fraction: 0.1,
            sage_threshold: 50.0,
            emergency_floor: 8,
            emergency_probability: 0.15,
        }
    }
}

impl ReproductionConfig {
    /// Base birth probability for a population of `population` humans.
    pub const fn base_probability(&self, population: u32) -> f64 {
        if population < self.low_population {
            self.low_population_probability
        } else if population < self.mid_population {
            self.mid_population_probability
        } else {
            self.high_population_probability
        }
    }

    /// Whether `age` falls inside the prime band.
    pub fn in_prime(&self, age: f64) -> bool {
        (self.prime_age_min..=self.prime_age_max).contains(&age)
    }
}

impl LifecycleConfig {
    /// Whether scarcity adjustments apply at this population.
    pub const fn is_critical(&self, population: u32) -> bool {
        population < self.critical_population
    }

    /// The hit point floor at this population.
    pub const fn hp_floor_for(&self, population: u32) -> f64 {
        if self.is_critical(population) {
            self.critical_hp_floor
        } else {
            self.hp_floor
        }
    }
}
