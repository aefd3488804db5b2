//! Reverse ownership graph
//!
//! Edges are keyed by the owned entity and point at its owners, so
//! resolution walks "upward" from a target towards its ultimate holders.

use crate::{
    build_name_index, classify_stake, BuildDiagnostics, EntityId, EntityTable, Relation,
};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// An owner of some target entity, with the normalized stake it holds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OwnershipEdge {
    /// The owning entity
    pub owner: EntityId,
    /// Stake held, in [0, 100]
    pub percent: f64,
    /// Relation this edge was built from
    pub relation_id: i64,
}

/// How relations repeating an origin/target pair are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Every relation becomes its own edge (percentages are not merged)
    #[default]
    Keep,
    /// Repeated pairs collapse into one edge carrying the highest percentage
    Max,
}

/// Options for building the reverse graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOptions {
    /// Handling of repeated origin/target pairs
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,
}

/// Target id → ordered list of owner edges
///
/// Read-only once built; may be reused across any number of queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReverseOwnershipGraph {
    owners: HashMap<EntityId, Vec<OwnershipEdge>>,
}

impl ReverseOwnershipGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Owner edges of a target, in relation input order; empty for terminal holders
    pub fn owners_of(&self, target: EntityId) -> &[OwnershipEdge] {
        self.owners
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the entity has no recorded owner
    pub fn is_terminal(&self, id: EntityId) -> bool {
        self.owners_of(id).is_empty()
    }

    /// Append an edge to a target's list
    pub fn add_edge(&mut self, target: EntityId, edge: OwnershipEdge) {
        self.owners.entry(target).or_default().push(edge);
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.owners.values().map(Vec::len).sum()
    }

    /// Number of targets with at least one owner
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// Whether the graph has no edges
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// Build the reverse ownership graph with default options
pub fn build_reverse_graph(
    entities: &EntityTable,
    relations: &[Relation],
) -> ReverseOwnershipGraph {
    build_reverse_graph_with(entities, relations, &GraphOptions::default()).0
}

/// Build the reverse ownership graph and collect data-quality diagnostics
///
/// Relations whose origin or target name does not resolve are dropped.
/// Stakes go through [`classify_stake`] and never fail.
pub fn build_reverse_graph_with(
    entities: &EntityTable,
    relations: &[Relation],
    options: &GraphOptions,
) -> (ReverseOwnershipGraph, BuildDiagnostics) {
    let index = build_name_index(entities);
    let mut graph = ReverseOwnershipGraph::new();
    let mut diagnostics = BuildDiagnostics::new();
    diagnostics.name_collisions = index.collisions();

    let mut seen_pairs: HashSet<(EntityId, EntityId)> = HashSet::new();

    for relation in relations {
        diagnostics.relations_seen += 1;

        let Some(origin) = index.lookup(&relation.origin) else {
            debug!(
                "Skipping relation {}: unknown origin {:?}",
                relation.id, relation.origin
            );
            diagnostics.record_unknown_origin(relation.id);
            continue;
        };
        let Some(target) = index.lookup(&relation.target) else {
            debug!(
                "Skipping relation {}: unknown target {:?}",
                relation.id, relation.target
            );
            diagnostics.record_unknown_target(relation.id);
            continue;
        };

        let stake = classify_stake(&relation.stake);
        diagnostics.record_stake(&stake);

        let edge = OwnershipEdge {
            owner: origin,
            percent: stake.percent,
            relation_id: relation.id,
        };

        if !seen_pairs.insert((origin, target)) {
            diagnostics.duplicate_pairs += 1;
            if options.duplicate_policy == DuplicatePolicy::Max {
                merge_max(&mut graph, target, edge);
                continue;
            }
        }

        graph.add_edge(target, edge);
    }

    diagnostics.edges_created = graph.edge_count();

    info!(
        "Built reverse graph: {} edges over {} targets from {} relations",
        diagnostics.edges_created,
        graph.len(),
        diagnostics.relations_seen
    );
    if diagnostics.total_skipped() > 0 {
        warn!(
            "Skipped {} relations with unknown names ({} origin, {} target)",
            diagnostics.total_skipped(),
            diagnostics.skipped_unknown_origin,
            diagnostics.skipped_unknown_target
        );
    }
    if diagnostics.defaulted_stakes > 0 {
        warn!(
            "Assumed a full stake for {} unreadable stake values",
            diagnostics.defaulted_stakes
        );
    }
    if !diagnostics.name_collisions.is_empty() {
        warn!(
            "{} names are shared by several entities; lowest id wins",
            diagnostics.name_collisions.len()
        );
    }

    (graph, diagnostics)
}

/// Fold a repeated pair into the existing edge, keeping the higher percentage
fn merge_max(graph: &mut ReverseOwnershipGraph, target: EntityId, edge: OwnershipEdge) {
    let existing = graph
        .owners
        .get_mut(&target)
        .and_then(|edges| edges.iter_mut().find(|e| e.owner == edge.owner));

    match existing {
        Some(existing) => {
            if edge.percent > existing.percent {
                existing.percent = edge.percent;
                existing.relation_id = edge.relation_id;
            }
        }
        None => graph.add_edge(target, edge),
    }
}
