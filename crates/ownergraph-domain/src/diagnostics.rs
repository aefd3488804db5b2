//! Data-quality diagnostics collected while building the reverse graph
//!
//! Dropping relations and defaulting stakes is deliberate policy; these
//! counters make that policy observable.

use crate::{EntityId, StakeKind, StakeValue};
use serde::Serialize;

/// A lowercased name shared by several entities
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCollision {
    /// The lowercased name
    pub name: String,
    /// Every entity carrying that name, ascending; the first one wins lookups
    pub ids: Vec<EntityId>,
}

/// Counters collected by [`build_reverse_graph_with`](crate::build_reverse_graph_with)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildDiagnostics {
    /// Relations examined
    pub relations_seen: usize,

    /// Edges present in the final graph
    pub edges_created: usize,

    /// Relations dropped because the origin name is unknown
    pub skipped_unknown_origin: usize,

    /// Relations dropped because the target name is unknown (origin was known)
    pub skipped_unknown_target: usize,

    /// Ids of every dropped relation, in input order
    pub skipped_relation_ids: Vec<i64>,

    /// Stakes that could not be read and were assumed to be 100%
    pub defaulted_stakes: usize,

    /// Stakes given as a qualitative label
    pub qualitative_stakes: usize,

    /// Stakes given as a `>N` lower bound
    pub lower_bound_stakes: usize,

    /// Stakes outside [0, 100] that were clamped
    pub clamped_stakes: usize,

    /// Relations repeating an origin/target pair already seen
    pub duplicate_pairs: usize,

    /// Names shared by several entities
    pub name_collisions: Vec<NameCollision>,
}

impl BuildDiagnostics {
    /// Create empty diagnostics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a relation dropped for an unknown origin
    pub fn record_unknown_origin(&mut self, relation_id: i64) {
        self.skipped_unknown_origin += 1;
        self.skipped_relation_ids.push(relation_id);
    }

    /// Record a relation dropped for an unknown target
    pub fn record_unknown_target(&mut self, relation_id: i64) {
        self.skipped_unknown_target += 1;
        self.skipped_relation_ids.push(relation_id);
    }

    /// Record how a stake was normalized
    pub fn record_stake(&mut self, stake: &StakeValue) {
        match stake.kind {
            StakeKind::Exact => {}
            StakeKind::AtLeast => self.lower_bound_stakes += 1,
            StakeKind::Qualitative => self.qualitative_stakes += 1,
            StakeKind::Defaulted => self.defaulted_stakes += 1,
        }
        if stake.clamped {
            self.clamped_stakes += 1;
        }
    }

    /// Total relations dropped
    pub fn total_skipped(&self) -> usize {
        self.skipped_unknown_origin + self.skipped_unknown_target
    }

    /// Whether anything lossy happened during the build
    pub fn has_warnings(&self) -> bool {
        self.total_skipped() > 0
            || self.defaulted_stakes > 0
            || self.clamped_stakes > 0
            || !self.name_collisions.is_empty()
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Graph Build Summary".to_string(),
            "===================".to_string(),
            format!("Relations seen: {}", self.relations_seen),
            format!("Edges created: {}", self.edges_created),
            format!(
                "Relations skipped: {} (unknown origin: {}, unknown target: {})",
                self.total_skipped(),
                self.skipped_unknown_origin,
                self.skipped_unknown_target
            ),
            format!("Defaulted stakes: {}", self.defaulted_stakes),
            format!("Qualitative stakes: {}", self.qualitative_stakes),
            format!("Lower-bound stakes: {}", self.lower_bound_stakes),
            format!("Clamped stakes: {}", self.clamped_stakes),
            format!("Duplicate pairs: {}", self.duplicate_pairs),
        ];

        if !self.name_collisions.is_empty() {
            lines.push(format!("Name collisions: {}", self.name_collisions.len()));
            for collision in &self.name_collisions {
                let ids: Vec<String> = collision.ids.iter().map(|id| id.to_string()).collect();
                lines.push(format!("  {}: [{}]", collision.name, ids.join(", ")));
            }
        }

        lines.join("\n")
    }
}
