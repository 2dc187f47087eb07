//! The technology ledger: civilization-wide discoveries unlocked by the
//! summed knowledge of the living population.
//!
//! The ledger is evaluated on a fixed cadence. Each undiscovered technology
//! compares the population-wide total of its category against its
//! threshold. Several technologies may unlock in one pass. Discovery is
//! monotonic; only [`TechnologyLedger::reset`] returns a technology to the
//! undiscovered state, and that happens only when the whole world is
//! regenerated.

use serde::Deserialize;
use tracing::info;

use primordia_types::{Knowledge, KnowledgeCategory, Technology};

use crate::state::WorldState;

/// Cadence, boost, and technology list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TechnologyConfig {
    /// Evaluate every this many ticks. Zero disables evaluation.
    pub interval: u64,
    /// Flat bonus added to every category of every living human per discovery.
    pub discovery_boost: f64,
    /// The technologies, in evaluation order.
    pub technologies: Vec<Technology>,
}

impl Default for TechnologyConfig {
    fn default() -> Self {
        Self {
            interval: 50,
            discovery_boost: 0.5,
            technologies: default_technologies(),
        }
    }
}

/// The standard technology tree.
pub fn default_technologies() -> Vec<Technology> {
    use KnowledgeCategory::{Crafting, Science, Social, Survival};
    vec![
        Technology::new("Fire", Survival, 15.0, 10.0),
        Technology::new("Wheel", Crafting, 30.0, 20.0),
        Technology::new("Writing", Social, 50.0, 35.0),
        Technology::new("Metallurgy", Crafting, 75.0, 50.0),
        Technology::new("Architecture", Crafting, 100.0, 70.0),
        Technology::new("Mathematics", Science, 120.0, 90.0),
        Technology::new("Medicine", Science, 140.0, 110.0),
        Technology::new("Philosophy", Social, 160.0, 130.0),
    ]
}

/// Tracks which technologies the civilization has unlocked.
#[derive(Debug, Clone, PartialEq)]
pub struct TechnologyLedger {
    technologies: Vec<Technology>,
    interval: u64,
}

impl TechnologyLedger {
    /// Build a ledger from configuration. Every technology starts undiscovered.
    pub fn new(config: &TechnologyConfig) -> Self {
        let mut ledger = Self {
            technologies: config.technologies.clone(),
            interval: config.interval,
        };
        ledger.reset();
        ledger
    }

    /// Whether the ledger should be evaluated on `tick`.
    pub const fn is_due(&self, tick: u64) -> bool {
        matches!(tick.checked_rem(self.interval), Some(0))
    }

    /// Compare population-wide totals against every undiscovered technology.
    ///
    /// Returns the names of the technologies discovered by this pass, in
    /// ledger order.
    pub fn evaluate(&mut self, totals: &Knowledge) -> Vec<String> {
        let mut discovered = Vec::new();
        for tech in self.technologies.iter_mut().filter(|t| !t.discovered) {
            if totals.get(tech.category) >= tech.required_knowledge {
                tech.discovered = true;
                info!(
                    technology = %tech.name,
                    category = %tech.category,
                    total = totals.get(tech.category),
                    "Technology discovered"
                );
                discovered.push(tech.name.clone());
            }
        }
        discovered
    }

    /// Mark every technology undiscovered again.
    pub fn reset(&mut self) {
        for tech in &mut self.technologies {
            tech.discovered = false;
        }
    }

    /// All technologies with their current state.
    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    /// Number of technologies discovered so far.
    pub fn discovered_count(&self) -> u32 {
        let count = self.technologies.iter().filter(|t| t.discovered).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Whether the named technology has been discovered.
    pub fn is_discovered(&self, name: &str) -> bool {
        self.technologies
            .iter()
            .any(|t| t.discovered && t.name == name)
    }
}

/// Sum of every knowledge category across the living population.
pub fn population_totals(world: &WorldState) -> Knowledge {
    Knowledge::sum(world.humans().map(|h| &h.knowledge))
}

/// Add `amount` to every category of every living human.
pub fn grant_boost(world: &mut WorldState, amount: f64) {
    for human in world.humans_mut() {
        human.knowledge = human.knowledge.plus(&Knowledge::uniform(amount));
    }
}
