//! The authoritative collection of every live entity.
//!
//! [`WorldState`] is an arena keyed by [`EntityId`]. Entities are created and
//! removed explicitly; nothing is rebuilt wholesale between ticks. Iteration
//! follows id order, which for UUID v7 ids is creation order.

use std::collections::BTreeMap;

use primordia_types::{Entity, EntityId, EntityKind, Human, Mob};

use crate::error::WorldError;

/// Arena of live entities.
#[derive(Debug, Clone, Default)]
pub struct WorldState {
    entities: BTreeMap<EntityId, Entity>,
}

impl WorldState {
    /// Create an empty world.
    pub const fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
        }
    }

    /// Insert a new entity and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateId`] if an entity with the same id is
    /// already live; the world is left unchanged.
    pub fn insert(&mut self, entity: Entity) -> Result<EntityId, WorldError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(WorldError::DuplicateId(id));
        }
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Remove an entity, returning it if it was live.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Drop every entity.
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Look up any entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable lookup of any entity.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Whether an entity is live.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Look up a human.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] or [`WorldError::WrongKind`].
    pub fn human(&self, id: EntityId) -> Result<&Human, WorldError> {
        let entity = self.get(id).ok_or(WorldError::EntityNotFound(id))?;
        entity.as_human().ok_or(WorldError::WrongKind {
            id,
            expected: EntityKind::Human,
            found: entity.kind(),
        })
    }

    /// Mutable lookup of a human.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] or [`WorldError::WrongKind`].
    pub fn human_mut(&mut self, id: EntityId) -> Result<&mut Human, WorldError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        let found = entity.kind();
        entity.as_human_mut().ok_or(WorldError::WrongKind {
            id,
            expected: EntityKind::Human,
            found,
        })
    }

    /// Look up a mob.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] or [`WorldError::WrongKind`].
    pub fn mob(&self, id: EntityId) -> Result<&Mob, WorldError> {
        let entity = self.get(id).ok_or(WorldError::EntityNotFound(id))?;
        entity.as_mob().ok_or(WorldError::WrongKind {
            id,
            expected: EntityKind::Mob,
            found: entity.kind(),
        })
    }

    /// Mutable lookup of a mob.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EntityNotFound`] or [`WorldError::WrongKind`].
    pub fn mob_mut(&mut self, id: EntityId) -> Result<&mut Mob, WorldError> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::EntityNotFound(id))?;
        let found = entity.kind();
        entity.as_mob_mut().ok_or(WorldError::WrongKind {
            id,
            expected: EntityKind::Mob,
            found,
        })
    }

    /// All entities in id order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Mutable iteration over all entities in id order.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Entities of one kind in id order.
    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(move |e| e.kind() == kind)
    }

    /// All humans in id order.
    pub fn humans(&self) -> impl Iterator<Item = &Human> {
        self.entities.values().filter_map(Entity::as_human)
    }

    /// Mutable iteration over all humans in id order.
    pub fn humans_mut(&mut self) -> impl Iterator<Item = &mut Human> {
        self.entities.values_mut().filter_map(Entity::as_human_mut)
    }

    /// All mobs in id order.
    pub fn mobs(&self) -> impl Iterator<Item = &Mob> {
        self.entities.values().filter_map(Entity::as_mob)
    }

    /// Ids of all humans in id order.
    pub fn human_ids(&self) -> Vec<EntityId> {
        self.humans().map(|h| h.id).collect()
    }

    /// Ids of all mobs in id order.
    pub fn mob_ids(&self) -> Vec<EntityId> {
        self.mobs().map(|m| m.id).collect()
    }

    /// Number of entities of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Number of living humans.
    pub fn population(&self) -> u32 {
        u32::try_from(self.count(EntityKind::Human)).unwrap_or(u32::MAX)
    }

    /// Total number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world holds no entities at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
