//! Tick step: the engine function that advances the world by one tick.
//!
//! Each tick runs these phases in order:
//!
//! 1. **Clock** -- advance the tick counter.
//! 2. **Humans** -- every human plans against the start-of-tick world; the
//!    plans commit in id order, then human motion is integrated.
//! 3. **Mobs** -- every surviving mob plans against the post-human world;
//!    the plans commit, then mob motion is integrated.
//! 4. **Lifecycle** -- aging, death, bequest, emergency repopulation.
//! 5. **Ledger** -- technology evaluation on cadence ticks, with a knowledge
//!    boost per discovery.
//! 6. **Stats** -- aggregate statistics and the event log are refreshed.
//!
//! Planning never mutates the world. A plan that refers to an entity which
//! no longer resolves is logged and skipped.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use primordia_agents::{
    ActionContext, AgentError, DeathRecord, TickCommand, commit, integrate_motion, plan_human,
    plan_mob, run_lifecycle,
};
use primordia_types::{
    EntityId, EntityKind, EventKind, Knowledge, NarrativeEvent, Position, Stats, WorldSnapshot,
};
use primordia_world::ledger::{grant_boost, population_totals};
use primordia_world::{
    Extent, FullScan, GridIndex, Neighborhood, SpatialQuery, TechnologyLedger, WorldError,
    WorldState, populate,
};

use crate::clock::WorldClock;
use crate::config::{SimulationConfig, SpatialIndexKind, WorldConfig};
use crate::events::EventLog;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },

    /// A lifecycle operation failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// A world operation failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Living humans at the end of the tick.
    pub population: u32,
    /// Children born this tick.
    pub births: u32,
    /// Humans who died this tick.
    pub deaths: Vec<DeathRecord>,
    /// Buildings raised this tick.
    pub buildings_raised: u32,
    /// The emergency newcomer, if one arrived.
    pub spawned: Option<EntityId>,
    /// Technologies discovered this tick.
    pub discoveries: Vec<String>,
    /// Narrative events, oldest first.
    pub events: Vec<NarrativeEvent>,
}

/// The spatial query backend chosen by configuration.
#[derive(Debug, Clone)]
pub enum SpatialBackend {
    /// Scan every entity per query.
    FullScan(FullScan),
    /// Uniform grid.
    Grid(GridIndex),
}

impl SpatialBackend {
    /// Build the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSpatialConfig`] if the grid cell size is
    /// not positive.
    pub fn from_config(config: &WorldConfig) -> Result<Self, WorldError> {
        match config.spatial_index {
            SpatialIndexKind::FullScan => Ok(Self::FullScan(FullScan)),
            SpatialIndexKind::Grid => Ok(Self::Grid(GridIndex::new(config.grid_cell_size)?)),
        }
    }
}

impl SpatialQuery for SpatialBackend {
    fn rebuild(&mut self, world: &WorldState) {
        match self {
            Self::FullScan(scan) => scan.rebuild(world),
            Self::Grid(grid) => grid.rebuild(world),
        }
    }

    fn query(
        &self,
        world: &WorldState,
        kind: EntityKind,
        center: Position,
        extent: Extent,
        origin: Option<EntityId>,
    ) -> Vec<EntityId> {
        match self {
            Self::FullScan(scan) => scan.query(world, kind, center, extent, origin),
            Self::Grid(grid) => grid.query(world, kind, center, extent, origin),
        }
    }
}

/// The mutable simulation state passed through the tick step.
///
/// The engine is the only writer. Collaborators read a [`WorldSnapshot`].
#[derive(Debug)]
pub struct SimulationState {
    /// The world clock.
    pub clock: WorldClock,
    /// Every live entity.
    pub world: WorldState,
    /// Technology discoveries.
    pub ledger: TechnologyLedger,
    /// Recent narrative events, newest first.
    pub events: EventLog,
    /// Aggregate statistics as of the last completed tick.
    pub stats: Stats,
    /// The configuration the world was built from.
    pub config: SimulationConfig,
    /// Spatial query backend.
    pub index: SpatialBackend,
    /// The single random source every roll draws from.
    pub rng: StdRng,
}

impl SimulationState {
    /// Build and populate a world from configuration, seeded from
    /// `world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the spatial backend or initial
    /// population cannot be built.
    pub fn new(config: SimulationConfig) -> Result<Self, TickError> {
        let index = SpatialBackend::from_config(&config.world)?;
        let mut state = Self {
            clock: WorldClock::new(),
            world: WorldState::new(),
            ledger: TechnologyLedger::new(&config.technology),
            events: EventLog::new(config.logging.event_log_capacity),
            stats: Stats::default(),
            rng: StdRng::seed_from_u64(config.world.seed),
            index,
            config,
        };
        state.initialize()?;
        Ok(state)
    }

    /// Build a state around an existing world, skipping random generation.
    ///
    /// No creation event is logged.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the spatial backend cannot be built.
    pub fn with_world(config: SimulationConfig, world: WorldState) -> Result<Self, TickError> {
        let mut index = SpatialBackend::from_config(&config.world)?;
        index.rebuild(&world);
        let mut state = Self {
            clock: WorldClock::new(),
            world,
            ledger: TechnologyLedger::new(&config.technology),
            events: EventLog::new(config.logging.event_log_capacity),
            stats: Stats::default(),
            rng: StdRng::seed_from_u64(config.world.seed),
            index,
            config,
        };
        refresh_stats(&mut state);
        Ok(state)
    }

    /// Reinitialize from scratch with the configured population.
    ///
    /// The clock, technologies, counters, and event log start over. The
    /// random stream continues, so a reset world differs from the first.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::World`] if the population cannot be inserted.
    pub fn reset(&mut self) -> Result<(), TickError> {
        self.clock.reset();
        self.ledger.reset();
        self.events.clear();
        self.stats = Stats::default();
        self.initialize()?;
        info!(population = self.stats.population, "World reset");
        Ok(())
    }

    /// Copy out everything a renderer needs. The snapshot shares nothing
    /// with the live state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.clock.tick(),
            entities: self.world.entities().cloned().collect(),
            stats: self.stats.clone(),
            technologies: self.ledger.technologies().to_vec(),
            events: self.events.to_vec(),
        }
    }

    fn initialize(&mut self) -> Result<(), TickError> {
        populate(&mut self.world, &self.config.world.generation, &mut self.rng)?;
        self.index.rebuild(&self.world);
        refresh_stats(self);
        self.events.record(self.clock.tick(), EventKind::WorldCreated);
        info!(
            seed = self.config.world.seed,
            entities = self.world.len(),
            population = self.stats.population,
            "World created"
        );
        Ok(())
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows or the lifecycle pass
/// cannot update the world.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance()?;
    debug!(tick, population = state.world.population(), "Tick started");

    // --- Phase 2: Humans ---
    let mut kinds = phase_humans(state);

    // --- Phase 3: Mobs ---
    kinds.extend(phase_mobs(state));

    // --- Phase 4: Lifecycle ---
    let report = {
        let SimulationState {
            world,
            index,
            config,
            rng,
            ..
        } = state;
        run_lifecycle(
            world,
            index,
            &config.perception,
            &config.lifecycle,
            &config.world.generation,
            rng,
        )?
    };
    kinds.extend(report.events);

    // --- Phase 5: Ledger ---
    let discoveries = phase_ledger(state, tick);
    kinds.extend(
        discoveries
            .iter()
            .map(|name| EventKind::TechnologyDiscovered { name: name.clone() }),
    );

    if let Some(cap) = state.config.knowledge.cap {
        for human in state.world.humans_mut() {
            human.knowledge = human.knowledge.capped(cap);
        }
    }

    // --- Phase 6: Stats ---
    let births = count_events(&kinds, |k| matches!(k, EventKind::Birth { .. }));
    let buildings_raised = count_events(&kinds, |k| {
        matches!(k, EventKind::BuildingConstructed { .. })
    });
    let deaths = u64::try_from(report.deaths.len()).unwrap_or(u64::MAX);
    state.stats.total_deaths = state.stats.total_deaths.saturating_add(deaths);
    state.stats.total_buildings = state
        .stats
        .total_buildings
        .saturating_add(u64::from(buildings_raised));
    refresh_stats(state);

    let events: Vec<NarrativeEvent> = kinds
        .into_iter()
        .map(|kind| NarrativeEvent::new(tick, kind))
        .collect();
    for event in &events {
        state.events.push(event.clone());
    }

    debug!(
        tick,
        population = state.stats.population,
        births,
        deaths,
        buildings_raised,
        events = events.len(),
        "Tick completed"
    );

    Ok(TickSummary {
        tick,
        population: state.stats.population,
        births,
        deaths: report.deaths,
        buildings_raised,
        spawned: report.spawned,
        discoveries,
        events,
    })
}

/// Phase 2: plan every human against the start-of-tick world, then commit.
fn phase_humans(state: &mut SimulationState) -> Vec<EventKind> {
    let SimulationState {
        world,
        index,
        config,
        rng,
        ..
    } = state;
    index.rebuild(world);

    let ctx = ActionContext {
        behavior: &config.behavior,
        reproduction: &config.reproduction,
        population: world.population(),
    };
    let mut commands: Vec<TickCommand> = Vec::new();
    for human in world.humans() {
        let near =
            Neighborhood::around(&*index, world, human.id, human.position, &config.perception);
        match plan_human(human, &near, world, &ctx, rng) {
            Ok(plan) => commands.extend(plan),
            Err(e) => warn!(entity_id = %human.id, error = %e, "Skipping human this tick"),
        }
    }

    let events = commit(world, commands);
    integrate_motion(world, EntityKind::Human, config.behavior.human_damping);
    events
}

/// Phase 3: plan every surviving mob against the post-human world, then
/// commit.
fn phase_mobs(state: &mut SimulationState) -> Vec<EventKind> {
    let SimulationState {
        world,
        index,
        config,
        rng,
        ..
    } = state;
    index.rebuild(world);

    let mut commands: Vec<TickCommand> = Vec::new();
    for mob in world.mobs() {
        match plan_mob(mob, world, &*index, &config.perception, &config.mobs, rng) {
            Ok(plan) => commands.extend(plan),
            Err(e) => warn!(entity_id = %mob.id, error = %e, "Skipping mob this tick"),
        }
    }

    let events = commit(world, commands);
    integrate_motion(world, EntityKind::Mob, config.mobs.damping);
    events
}

/// Phase 5: evaluate the ledger on cadence ticks and boost the living
/// population once per discovery. An empty world discovers nothing.
fn phase_ledger(state: &mut SimulationState, tick: u64) -> Vec<String> {
    if !state.ledger.is_due(tick) || state.world.population() == 0 {
        return Vec::new();
    }
    let totals = population_totals(&state.world);
    let discoveries = state.ledger.evaluate(&totals);
    for _ in &discoveries {
        grant_boost(&mut state.world, state.config.technology.discovery_boost);
    }
    if !discoveries.is_empty() {
        info!(
            tick,
            discovered = discoveries.len(),
            total = state.ledger.discovered_count(),
            "Technology ledger advanced"
        );
    }
    discoveries
}

fn count_events(kinds: &[EventKind], pred: impl Fn(&EventKind) -> bool) -> u32 {
    let n = kinds.iter().filter(|k| pred(k)).count();
    u32::try_from(n).unwrap_or(u32::MAX)
}

/// Recompute every derived field of the stats, keeping the cumulative
/// counters.
fn refresh_stats(state: &mut SimulationState) {
    let avg_knowledge = Knowledge::mean(state.world.humans().map(|h| &h.knowledge));
    state.stats = Stats {
        population: state.world.population(),
        time: state.clock.tick(),
        technologies: state.ledger.discovered_count(),
        civilization_level: civilization_level(&avg_knowledge),
        avg_knowledge,
        ..state.stats.clone()
    };
}

/// `floor((science + crafting + social) / 3)` over a mean knowledge vector.
// Safe: the value is clamped to the u32 range before the cast.
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub fn civilization_level(mean: &Knowledge) -> u32 {
    let level = (mean.science + mean.crafting + mean.social) / 3.0;
    level.floor().clamp(0.0, f64::from(u32::MAX)) as u32
}
