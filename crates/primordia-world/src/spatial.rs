//! Axis-aligned proximity queries.
//!
//! The engine asks "which entities of kind K lie strictly inside the box of
//! half-extents `(ex, ey)` around point P", once per agent per tick for each
//! neighbor set. [`SpatialQuery`] is the seam: [`FullScan`] walks the arena,
//! [`GridIndex`] buckets positions into square cells. Both return ids in id
//! order, so "first match" picks are identical whichever backend is used.

use std::collections::BTreeMap;

use serde::Deserialize;

use primordia_types::{EntityId, EntityKind, Position};

use crate::error::WorldError;
use crate::state::WorldState;

/// Half-extents of a query box.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Extent {
    /// Horizontal half-width.
    pub x: f64,
    /// Vertical half-height.
    pub y: f64,
}

impl Extent {
    /// A square box with equal half-extents.
    pub const fn square(half: f64) -> Self {
        Self { x: half, y: half }
    }
}

/// Strict box test: `|dx| < extent.x` and `|dy| < extent.y`.
pub fn is_within(center: Position, point: Position, extent: Extent) -> bool {
    (point.x - center.x).abs() < extent.x && (point.y - center.y).abs() < extent.y
}

/// Query extents used for perception.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Box in which a human notices other humans.
    pub human_extent: Extent,
    /// Box in which a human notices mobs.
    pub mob_extent: Extent,
    /// Box in which a human notices trees.
    pub tree_extent: Extent,
    /// Box in which a mob notices humans.
    pub mob_sight_extent: Extent,
    /// Euclidean distance under which an aggressive mob lands a blow.
    pub mob_strike_distance: f64,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        Self {
            human_extent: Extent::square(80.0),
            mob_extent: Extent::square(60.0),
            tree_extent: Extent::square(40.0),
            mob_sight_extent: Extent::square(70.0),
            mob_strike_distance: 20.0,
        }
    }
}

/// A proximity filter over the world.
///
/// Implementations must exclude `origin` from the result and return ids in
/// ascending id order.
pub trait SpatialQuery {
    /// Refresh any internal structure from the current world. Called at the
    /// start of every pass; implementations without state do nothing.
    fn rebuild(&mut self, world: &WorldState);

    /// Ids of entities of `kind` strictly inside the box around `center`.
    fn query(
        &self,
        world: &WorldState,
        kind: EntityKind,
        center: Position,
        extent: Extent,
        origin: Option<EntityId>,
    ) -> Vec<EntityId>;
}

/// Full scan of the arena. Adequate at the default population.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullScan;

impl SpatialQuery for FullScan {
    fn rebuild(&mut self, _world: &WorldState) {}

    fn query(
        &self,
        world: &WorldState,
        kind: EntityKind,
        center: Position,
        extent: Extent,
        origin: Option<EntityId>,
    ) -> Vec<EntityId> {
        world
            .of_kind(kind)
            .filter(|e| Some(e.id()) != origin && is_within(center, e.position(), extent))
            .map(primordia_types::Entity::id)
            .collect()
    }
}

/// Uniform grid of square cells.
#[derive(Debug, Clone)]
pub struct GridIndex {
    cell_size: f64,
    cells: BTreeMap<(i64, i64), Vec<(EntityId, EntityKind, Position)>>,
}

impl GridIndex {
    /// Create an empty grid.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidSpatialConfig`] unless `cell_size` is a
    /// positive finite number.
    pub fn new(cell_size: f64) -> Result<Self, WorldError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(WorldError::InvalidSpatialConfig(
                "cell_size must be positive and finite",
            ));
        }
        Ok(Self {
            cell_size,
            cells: BTreeMap::new(),
        })
    }

    /// Edge length of one cell.
    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    // Safe: world coordinates stay far inside the i64 range; `as` saturates
    // anyway.
    #[allow(clippy::cast_possible_truncation)]
    fn cell_of(&self, value: f64) -> i64 {
        (value / self.cell_size).floor() as i64
    }
}

impl SpatialQuery for GridIndex {
    fn rebuild(&mut self, world: &WorldState) {
        self.cells.clear();
        for entity in world.entities() {
            let pos = entity.position();
            let key = (self.cell_of(pos.x), self.cell_of(pos.y));
            self.cells
                .entry(key)
                .or_default()
                .push((entity.id(), entity.kind(), pos));
        }
    }

    fn query(
        &self,
        _world: &WorldState,
        kind: EntityKind,
        center: Position,
        extent: Extent,
        origin: Option<EntityId>,
    ) -> Vec<EntityId> {
        let (x0, x1) = (
            self.cell_of(center.x - extent.x),
            self.cell_of(center.x + extent.x),
        );
        let (y0, y1) = (
            self.cell_of(center.y - extent.y),
            self.cell_of(center.y + extent.y),
        );

        let mut found: Vec<EntityId> = self
            .cells
            .range((x0, y0)..=(x1, y1))
            .filter(|((_, cy), _)| (y0..=y1).contains(cy))
            .flat_map(|(_, bucket)| bucket.iter())
            .filter(|(id, k, pos)| {
                *k == kind && Some(*id) != origin && is_within(center, *pos, extent)
            })
            .map(|(id, _, _)| *id)
            .collect();
        found.sort_unstable();
        found
    }
}

/// The three neighbor sets a human decides from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Neighborhood {
    /// Other humans in the social box.
    pub humans: Vec<EntityId>,
    /// Mobs in the threat box.
    pub mobs: Vec<EntityId>,
    /// Trees in the forage box.
    pub trees: Vec<EntityId>,
}

impl Neighborhood {
    /// Run the three perception queries for a human at `center`.
    pub fn around(
        index: &dyn SpatialQuery,
        world: &WorldState,
        origin: EntityId,
        center: Position,
        config: &PerceptionConfig,
    ) -> Self {
        Self {
            humans: index.query(
                world,
                EntityKind::Human,
                center,
                config.human_extent,
                Some(origin),
            ),
            mobs: index.query(world, EntityKind::Mob, center, config.mob_extent, Some(origin)),
            trees: index.query(
                world,
                EntityKind::Tree,
                center,
                config.tree_extent,
                Some(origin),
            ),
        }
    }
}
