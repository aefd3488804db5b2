//! Entity module - the nodes of the ownership graph

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Type code used by the source corpus for media outlets
pub const MEDIA_TYPE_CODE: i64 = 3;

/// Stable identifier of an entity, as found in the first column of the entity file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Get the raw integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person, company or media outlet
///
/// Entities are created once at ingestion and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier
    pub id: EntityId,

    /// Display name, matched case-insensitively by relations
    pub name: String,

    /// Free-text classification (e.g. "Personne physique", "Média")
    pub type_label: String,

    /// Integer discriminator; [`MEDIA_TYPE_CODE`] marks media outlets
    pub type_code: i64,
}

impl Entity {
    /// Create a new entity
    pub fn new(
        id: i64,
        name: impl Into<String>,
        type_label: impl Into<String>,
        type_code: i64,
    ) -> Self {
        Self {
            id: EntityId(id),
            name: name.into(),
            type_label: type_label.into(),
            type_code,
        }
    }
}

/// Lookup table owning every entity of a corpus, keyed by id
///
/// Backed by a `BTreeMap` so iteration is always in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTable {
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, returning the one it replaced if the id was already present
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id, entity)
    }

    /// Get an entity by id
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Iterate entities in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for EntityTable {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut table = Self::new();
        for entity in iter {
            table.insert(entity);
        }
        table
    }
}
