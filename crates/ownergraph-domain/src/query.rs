//! Name-based ownership queries and their ranked report

use crate::{
    gather_final_owners_with, Entity, EntityId, EntityTable, FinalOwners, NameIndex,
    ResolveError, ResolverOptions, ReverseOwnershipGraph,
};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Errors that can occur while answering a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// No entity carries the requested name
    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    /// Entities carry the name, but none with the requested type code
    #[error("No entity named '{name}' has type code {expected}")]
    TypeMismatch {
        /// Requested name
        name: String,
        /// Requested type code
        expected: i64,
    },

    /// Resolution failed
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Who owns the entity called `name`?
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipQuery {
    /// Entity name, matched case-insensitively
    pub name: String,
    /// Only accept an entity with this type code
    pub type_code: Option<i64>,
}

impl OwnershipQuery {
    /// Query any entity with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_code: None,
        }
    }

    /// Restrict the query to entities with a type code
    pub fn with_type_code(mut self, type_code: i64) -> Self {
        self.type_code = Some(type_code);
        self
    }
}

/// One ultimate owner in a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnerShare {
    /// Owner id
    pub id: EntityId,
    /// Owner display name
    pub name: String,
    /// Owner classification
    pub type_label: String,
    /// Cumulative percentage held
    pub percent: f64,
}

/// Ranked ultimate owners of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OwnershipReport {
    /// The queried entity
    pub target: Entity,
    /// Owners, largest share first
    pub owners: Vec<OwnerShare>,
    /// Entity that relations naming the target bind to, when it is not the target
    ///
    /// Set when a type filter selected a homonym with a higher id; relations
    /// written against that name then describe the other entity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadowed_by: Option<EntityId>,
}

impl OwnershipReport {
    /// Build a report from resolved shares
    ///
    /// Owners missing from the entity table are left out.
    pub fn from_final_owners(target: Entity, shares: &FinalOwners, entities: &EntityTable) -> Self {
        let owners = shares
            .ranked()
            .into_iter()
            .filter_map(|(id, percent)| {
                entities.get(id).map(|owner| OwnerShare {
                    id,
                    name: owner.name.clone(),
                    type_label: owner.type_label.clone(),
                    percent,
                })
            })
            .collect();

        Self {
            target,
            owners,
            shadowed_by: None,
        }
    }

    /// Whether no final owner was found
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Keep only owners holding at least `min_percent`
    pub fn retain_min_percent(&mut self, min_percent: f64) {
        self.owners.retain(|o| o.percent >= min_percent);
    }

    /// Keep only the `limit` largest owners
    pub fn truncate(&mut self, limit: usize) {
        self.owners.truncate(limit);
    }
}

/// Find the queried entity, resolve its final owners and rank them
pub fn run_query(
    query: &OwnershipQuery,
    entities: &EntityTable,
    index: &NameIndex,
    graph: &ReverseOwnershipGraph,
    options: &ResolverOptions,
) -> Result<OwnershipReport, QueryError> {
    let name = query.name.trim();
    let candidates = index.candidates(name);
    if candidates.is_empty() {
        return Err(QueryError::UnknownEntity(name.to_string()));
    }

    let target = candidates
        .iter()
        .filter_map(|id| entities.get(*id))
        .find(|e| query.type_code.map_or(true, |code| e.type_code == code))
        .ok_or_else(|| match query.type_code {
            Some(expected) => QueryError::TypeMismatch {
                name: name.to_string(),
                expected,
            },
            None => QueryError::UnknownEntity(name.to_string()),
        })?;

    let mut shares = FinalOwners::new();
    gather_final_owners_with(target.id, graph, &mut shares, 100.0, options)?;

    let mut report = OwnershipReport::from_final_owners(target.clone(), &shares, entities);
    if let Some(bound) = index.lookup(name).filter(|id| *id != target.id) {
        warn!(
            "'{}' resolves to entity {} in relations, but the query selected entity {}",
            name, bound, target.id
        );
        report.shadowed_by = Some(bound);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_name_index, build_reverse_graph, Relation, MEDIA_TYPE_CODE};

    struct Fixture {
        entities: EntityTable,
        index: NameIndex,
        graph: ReverseOwnershipGraph,
    }

    fn fixture(entities: Vec<Entity>, relations: Vec<Relation>) -> Fixture {
        let entities: EntityTable = entities.into_iter().collect();
        let index = build_name_index(&entities);
        let graph = build_reverse_graph(&entities, &relations);
        Fixture {
            entities,
            index,
            graph,
        }
    }

    fn run(f: &Fixture, query: &OwnershipQuery) -> Result<OwnershipReport, QueryError> {
        run_query(query, &f.entities, &f.index, &f.graph, &ResolverOptions::default())
    }

    fn media_fixture() -> Fixture {
        fixture(
            vec![
                Entity::new(1, "MediaX", "Média", MEDIA_TYPE_CODE),
                Entity::new(2, "HolderY", "Entreprise", 2),
                Entity::new(3, "HolderZ", "Personne physique", 1),
            ],
            vec![
                Relation::new(1, "HolderY", "70", "MediaX"),
                Relation::new(2, "HolderZ", "30", "MediaX"),
            ],
        )
    }

    #[test]
    fn test_media_scenario() {
        let f = media_fixture();
        let query = OwnershipQuery::new("MediaX").with_type_code(MEDIA_TYPE_CODE);
        let report = run(&f, &query).unwrap();

        assert_eq!(report.target.id, EntityId(1));
        let ranked: Vec<(i64, f64)> = report
            .owners
            .iter()
            .map(|o| (o.id.value(), o.percent))
            .collect();
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].0, 2);
        assert!((ranked[0].1 - 70.0).abs() < 1e-9);
        assert_eq!(ranked[1].0, 3);
        assert!((ranked[1].1 - 30.0).abs() < 1e-9);
        assert_eq!(report.owners[0].name, "HolderY");
        assert_eq!(report.shadowed_by, None);
    }

    #[test]
    fn test_query_name_is_trimmed_and_case_insensitive() {
        let f = media_fixture();
        let report = run(&f, &OwnershipQuery::new("  mediax ")).unwrap();
        assert_eq!(report.target.name, "MediaX");
    }

    #[test]
    fn test_unknown_entity() {
        let f = media_fixture();
        let err = run(&f, &OwnershipQuery::new("Nobody")).unwrap_err();
        assert_eq!(err, QueryError::UnknownEntity("Nobody".to_string()));
    }

    #[test]
    fn test_type_mismatch() {
        let f = media_fixture();
        let err = run(&f, &OwnershipQuery::new("HolderY").with_type_code(MEDIA_TYPE_CODE))
            .unwrap_err();
        assert!(matches!(err, QueryError::TypeMismatch { expected: 3, .. }));
    }

    #[test]
    fn test_type_filter_flags_shadowed_homonym() {
        let f = fixture(
            vec![
                Entity::new(1, "Le Parisien", "Entreprise", 2),
                Entity::new(5, "Le Parisien", "Média", MEDIA_TYPE_CODE),
                Entity::new(6, "LVMH", "Entreprise", 2),
            ],
            vec![Relation::new(1, "LVMH", "100", "Le Parisien")],
        );

        // Relations resolve to the lowest id, so the media homonym has no owner
        let query = OwnershipQuery::new("le parisien").with_type_code(MEDIA_TYPE_CODE);
        let report = run(&f, &query).unwrap();
        assert_eq!(report.target.id, EntityId(5));
        assert_eq!(report.owners.len(), 1);
        assert_eq!(report.owners[0].id, EntityId(5));
        assert_eq!(report.shadowed_by, Some(EntityId(1)));

        let report = run(&f, &OwnershipQuery::new("le parisien")).unwrap();
        assert_eq!(report.target.id, EntityId(1));
        assert_eq!(report.owners[0].id, EntityId(6));
        assert_eq!(report.shadowed_by, None);
    }

    #[test]
    fn test_cycle_surfaces_as_query_error() {
        let f = fixture(
            vec![Entity::new(1, "A", "", 2), Entity::new(2, "B", "", 2)],
            vec![
                Relation::new(1, "A", "50", "B"),
                Relation::new(2, "B", "50", "A"),
            ],
        );
        let err = run(&f, &OwnershipQuery::new("A")).unwrap_err();
        assert!(matches!(
            err,
            QueryError::Resolve(ResolveError::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_report_filters() {
        let f = media_fixture();
        let mut report = run(&f, &OwnershipQuery::new("MediaX")).unwrap();
        report.retain_min_percent(50.0);
        assert_eq!(report.owners.len(), 1);

        let mut report = run(&f, &OwnershipQuery::new("MediaX")).unwrap();
        report.truncate(1);
        assert_eq!(report.owners[0].id, EntityId(2));
        assert!(!report.is_empty());
    }

    #[test]
    fn test_unknown_owner_omitted_from_report() {
        let mut shares = FinalOwners::new();
        shares.add(EntityId(2), 60.0);
        shares.add(EntityId(99), 40.0);
        let entities: EntityTable = vec![
            Entity::new(1, "T", "Média", 3),
            Entity::new(2, "O", "Entreprise", 2),
        ]
        .into_iter()
        .collect();

        let target = entities.get(EntityId(1)).cloned().unwrap();
        let report = OwnershipReport::from_final_owners(target, &shares, &entities);
        assert_eq!(report.owners.len(), 1);
    }
}
