//! Case-insensitive name → id index
//!
//! Matching is exact after lowercasing: no diacritic, punctuation or
//! whitespace folding. When several entities share a name the lowest id wins.

use crate::{EntityId, EntityTable, NameCollision};
use std::collections::HashMap;

/// Index from lowercased entity name to the ids carrying it
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, Vec<EntityId>>,
}

impl NameIndex {
    /// Resolve a name to the lowest id carrying it
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.by_name
            .get(&Self::key(name))
            .and_then(|ids| ids.first().copied())
    }

    /// Every id carrying the name, ascending
    pub fn candidates(&self, name: &str) -> &[EntityId] {
        self.by_name
            .get(&Self::key(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names carried by more than one entity, sorted by name
    pub fn collisions(&self) -> Vec<NameCollision> {
        let mut collisions: Vec<NameCollision> = self
            .by_name
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(name, ids)| NameCollision {
                name: name.clone(),
                ids: ids.clone(),
            })
            .collect();
        collisions.sort_by(|a, b| a.name.cmp(&b.name));
        collisions
    }

    /// Number of distinct names
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn key(name: &str) -> String {
        name.to_lowercase()
    }
}

/// Build the name index for an entity table
pub fn build_name_index(entities: &EntityTable) -> NameIndex {
    let mut by_name: HashMap<String, Vec<EntityId>> = HashMap::new();

    // The table iterates in ascending id order, so each list stays sorted.
    for entity in entities.iter() {
        by_name
            .entry(NameIndex::key(&entity.name))
            .or_default()
            .push(entity.id);
    }

    NameIndex { by_name }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Entity;

    fn table() -> EntityTable {
        vec![
            Entity::new(1, "Le Monde", "Média", 3),
            Entity::new(2, "Groupe Le Monde", "Entreprise", 2),
            Entity::new(9, "LE MONDE", "Entreprise", 2),
            Entity::new(4, "Télérama", "Média", 3),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let index = build_name_index(&table());
        assert_eq!(index.lookup("télérama"), Some(EntityId(4)));
        assert_eq!(index.lookup("TÉLÉRAMA"), Some(EntityId(4)));
        assert_eq!(index.lookup("groupe le monde"), Some(EntityId(2)));
    }

    #[test]
    fn test_exact_match_only() {
        let index = build_name_index(&table());
        assert_eq!(index.lookup("Telerama"), None);
        assert_eq!(index.lookup("Le  Monde"), None);
        assert_eq!(index.lookup("Monde"), None);
    }

    #[test]
    fn test_collision_lowest_id_wins() {
        let index = build_name_index(&table());
        assert_eq!(index.lookup("le monde"), Some(EntityId(1)));
        assert_eq!(index.candidates("Le Monde"), &[EntityId(1), EntityId(9)]);
    }

    #[test]
    fn test_collisions_reported() {
        let index = build_name_index(&table());
        let collisions = index.collisions();

        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].name, "le monde");
        assert_eq!(collisions[0].ids, vec![EntityId(1), EntityId(9)]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_unknown_name_has_no_candidates() {
        let index = build_name_index(&EntityTable::new());
        assert!(index.is_empty());
        assert!(index.candidates("anything").is_empty());
    }
}
