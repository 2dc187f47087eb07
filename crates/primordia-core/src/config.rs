//! Configuration loading and typed config structures for the Primordia
//! simulation.
//!
//! The canonical configuration lives in `primordia-config.yaml` at the
//! project root. Every section and field is optional; anything left out
//! takes the default used by the reference world.

use std::path::Path;

use serde::Deserialize;

use primordia_agents::{BehaviorConfig, LifecycleConfig, MobConfig, ReproductionConfig};
use primordia_world::{PerceptionConfig, TechnologyConfig, WorldGenConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is outside its valid range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which value is wrong and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `primordia-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Seed, spatial backend, and initial population.
    #[serde(default)]
    pub world: WorldConfig,

    /// Perception boxes.
    #[serde(default)]
    pub perception: PerceptionConfig,

    /// Human decision thresholds and action effects.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Mob attack, flight, and wandering.
    #[serde(default)]
    pub mobs: MobConfig,

    /// Births.
    #[serde(default)]
    pub reproduction: ReproductionConfig,

    /// Aging, death, and emergency repopulation.
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Technology cadence, boost, and list.
    #[serde(default)]
    pub technology: TechnologyConfig,

    /// Knowledge growth limits.
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Tick cadence and run bounds.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Logging and event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be loaded.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.perception;
        for (name, extent) in [
            ("perception.human_extent", p.human_extent),
            ("perception.mob_extent", p.mob_extent),
            ("perception.tree_extent", p.tree_extent),
            ("perception.mob_sight_extent", p.mob_sight_extent),
        ] {
            positive(name, extent.x)?;
            positive(name, extent.y)?;
        }
        positive("perception.mob_strike_distance", p.mob_strike_distance)?;

        let g = &self.world.generation;
        non_negative("world.tree_spread", g.tree_spread)?;
        non_negative("world.human_spread", g.human_spread)?;
        non_negative("world.mob_spread", g.mob_spread)?;
        for (name, range) in [
            ("world.human_size", g.human_size),
            ("world.mob_size", g.mob_size),
            ("world.tree_size", g.tree_size),
        ] {
            non_negative(name, range.min)?;
            non_negative(name, range.span)?;
        }
        non_negative("world.mob_speed", g.mob_speed)?;
        non_negative("world.smart_mob_speed", g.smart_mob_speed)?;
        for (group, ranges) in [
            ("world.human_personality", &g.human_personality),
            ("world.mob_personality", &g.mob_personality),
            ("world.smart_mob_personality", &g.smart_mob_personality),
        ] {
            for (trait_name, range) in ranges.ranges() {
                if range.span < 0.0 || range.min < 0.0 || range.max() > 1.0 {
                    return Err(invalid(&format!(
                        "{group}.{trait_name} must lie within [0, 1]"
                    )));
                }
            }
        }
        if self.world.spatial_index == SpatialIndexKind::Grid {
            positive("world.grid_cell_size", self.world.grid_cell_size)?;
        }

        if self.technology.interval == 0 {
            return Err(invalid("technology.interval must be at least 1"));
        }
        for tech in &self.technology.technologies {
            positive("technology.required_knowledge", tech.required_knowledge)?;
        }

        for (name, value) in [
            ("world.smart_mob_fraction", g.smart_mob_fraction),
            (
                "behavior.share_event_probability",
                self.behavior.share_event_probability,
            ),
            (
                "behavior.breakthrough_probability",
                self.behavior.breakthrough_probability,
            ),
            ("behavior.exchange_rate", self.behavior.exchange_rate),
            ("behavior.human_damping", self.behavior.human_damping),
            ("mobs.wander_probability", self.mobs.wander_probability),
            ("mobs.damping", self.mobs.damping),
            (
                "reproduction.low_population_probability",
                self.reproduction.low_population_probability,
            ),
            (
                "reproduction.mid_population_probability",
                self.reproduction.mid_population_probability,
            ),
            (
                "reproduction.high_population_probability",
                self.reproduction.high_population_probability,
            ),
            (
                "lifecycle.emergency_probability",
                self.lifecycle.emergency_probability,
            ),
            ("lifecycle.bequest_fraction", self.lifecycle.bequest_fraction),
        ] {
            probability(name, value)?;
        }

        if let Some(cap) = self.knowledge.cap {
            non_negative("knowledge.cap", cap)?;
        }
        if self.scheduler.base_tick_ms == 0 {
            return Err(invalid("scheduler.base_tick_ms must be at least 1"));
        }
        if self.scheduler.speed == 0 || self.scheduler.speed_presets.contains(&0) {
            return Err(invalid("scheduler speeds must be at least 1"));
        }
        if self.logging.event_log_capacity == 0 {
            return Err(invalid("logging.event_log_capacity must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must not be negative, got {value}")))
    }
}

fn probability(name: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(invalid(&format!("{name} must lie in [0, 1], got {value}")))
    }
}

/// Which [`SpatialQuery`](primordia_world::SpatialQuery) backend to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialIndexKind {
    /// Scan every entity per query.
    #[default]
    FullScan,
    /// Bucket entities into a uniform grid.
    Grid,
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Spatial query backend.
    #[serde(default)]
    pub spatial_index: SpatialIndexKind,

    /// Cell edge length for the grid backend.
    #[serde(default = "default_grid_cell_size")]
    pub grid_cell_size: f64,

    /// Initial population and randomization ranges.
    #[serde(flatten)]
    pub generation: WorldGenConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            spatial_index: SpatialIndexKind::default(),
            grid_cell_size: default_grid_cell_size(),
            generation: WorldGenConfig::default(),
        }
    }
}

/// Knowledge growth limits.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KnowledgeConfig {
    /// Upper bound on every knowledge component. Unbounded when absent.
    #[serde(default)]
    pub cap: Option<f64>,
}

/// Tick cadence and run bounds for the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulerConfig {
    /// Milliseconds per tick at speed 1.
    #[serde(default = "default_base_tick_ms")]
    pub base_tick_ms: u64,

    /// Starting speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: u64,

    /// Speeds selectable by preset number (1-based).
    #[serde(default = "default_speed_presets")]
    pub speed_presets: Vec<u64>,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Start paused.
    #[serde(default)]
    pub start_paused: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            base_tick_ms: default_base_tick_ms(),
            speed: default_speed(),
            speed_presets: default_speed_presets(),
            max_ticks: 0,
            start_paused: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Entries kept in the narrative event log.
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,

    /// Emit a JSON stats snapshot every this many ticks (0 = never).
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,

    /// Format log lines as JSON objects instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            event_log_capacity: default_event_log_capacity(),
            snapshot_interval_ticks: default_snapshot_interval_ticks(),
            json: false,
        }
    }
}

fn default_world_name() -> String {
    "Primordia".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_grid_cell_size() -> f64 {
    80.0
}

const fn default_base_tick_ms() -> u64 {
    80
}

const fn default_speed() -> u64 {
    1
}

fn default_speed_presets() -> Vec<u64> {
    vec![1, 5, 30]
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_event_log_capacity() -> usize {
    15
}

const fn default_snapshot_interval_ticks() -> u64 {
    100
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.generation.human_count, 15);
        assert_eq!(config.technology.interval, 50);
        assert_eq!(config.technology.technologies.len(), 8);
        assert_eq!(config.scheduler.base_tick_ms, 80);
        assert_eq!(config.logging.event_log_capacity, 15);
        assert!(config.knowledge.cap.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test World"
  seed: 123
  spatial_index: grid
  grid_cell_size: 64.0
  tree_count: 10
  human_count: 4
  mob_count: 2

perception:
  human_extent: { x: 100.0, y: 50.0 }

behavior:
  build_cost: 30.0

mobs:
  strike_damage: 4.0

reproduction:
  low_population: 10

lifecycle:
  emergency_floor: 3
  emergency_probability: 0.5

technology:
  interval: 25
  discovery_boost: 1.0
  technologies:
    - name: "Fire"
      category: survival
      required_knowledge: 5.0

knowledge:
  cap: 500.0

scheduler:
  base_tick_ms: 40
  speed_presets: [1, 2, 4]
  max_ticks: 1000

logging:
  level: "debug"
  event_log_capacity: 30
"#;

        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world.name, "Test World");
        assert_eq!(config.world.seed, 123);
        assert_eq!(config.world.spatial_index, SpatialIndexKind::Grid);
        assert_eq!(config.world.generation.human_count, 4);
        // Fields not named keep their defaults.
        assert_eq!(config.world.generation.tree_spread, 1500.0);
        assert_eq!(config.perception.human_extent.x, 100.0);
        assert_eq!(config.perception.mob_extent.x, 60.0);
        assert_eq!(config.behavior.build_cost, 30.0);
        assert_eq!(config.behavior.kill_reward, 5.0);
        assert_eq!(config.mobs.strike_damage, 4.0);
        assert_eq!(config.reproduction.low_population, 10);
        assert_eq!(config.lifecycle.emergency_floor, 3);
        assert_eq!(config.technology.technologies.len(), 1);
        assert!(!config.technology.technologies.iter().any(|t| t.discovered));
        assert_eq!(config.knowledge.cap, Some(500.0));
        assert_eq!(config.scheduler.speed_presets, vec![1, 2, 4]);
        assert_eq!(config.logging.level, "debug");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 7\n");
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.generation.mob_count, 40);
        assert_eq!(config.lifecycle.aging_rate, 0.08);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = SimulationConfig::parse("");
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let config = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = SimulationConfig::default();
        config.technology.interval = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = SimulationConfig::default();
        config.perception.tree_extent.x = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.lifecycle.emergency_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.scheduler.speed_presets = vec![1, 0];
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.world.generation.smart_mob_personality.curiosity.span = 0.9;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        if let Some(fire) = config.technology.technologies.first_mut() {
            fire.required_knowledge = 0.0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("/nonexistent/primordia-config.yaml");
        let config = SimulationConfig::load_or_default(path);
        assert_eq!(config.ok(), Some(SimulationConfig::default()));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("primordia-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            let config = config.ok().unwrap_or_default();
            assert!(config.validate().is_ok());
            assert_eq!(
                config.world.generation,
                SimulationConfig::default().world.generation
            );
        }
    }
}
