//! Ownership resolution
//!
//! Walks the reverse graph upward from a target and attributes its capital
//! to the ultimate (terminal) owners. Percentages compose multiplicatively
//! along a chain and add up across chains reaching the same owner:
//!
//! ```text
//! share(owner) = Σ over chains  start × Π (edge% / 100)
//! ```
//!
//! Traversal is an explicit depth-first walk over a frame stack. The set of
//! ids on the active path is tracked so that an ownership cycle is reported
//! as [`ResolveError::CycleDetected`] instead of looping forever.

use crate::{EntityId, ReverseOwnershipGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

/// Default bound on chain length
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Errors that can occur during resolution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The ownership data contains a cycle reachable from the queried entity
    #[error("Ownership cycle detected: {}", format_path(.path))]
    CycleDetected {
        /// Ids along the cycle, starting and ending with the repeated id
        path: Vec<EntityId>,
    },

    /// A chain is longer than the configured limit
    #[error("Ownership chain depth {depth} exceeds limit {limit}")]
    DepthExceeded {
        /// Depth reached
        depth: usize,
        /// Configured limit
        limit: usize,
    },
}

fn format_path(path: &[EntityId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Options for resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Maximum number of edges in a chain; `None` disables the bound
    #[serde(default = "default_max_depth")]
    pub max_depth: Option<usize>,
}

fn default_max_depth() -> Option<usize> {
    Some(DEFAULT_MAX_DEPTH)
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Ultimate owner id → cumulative percentage
///
/// Build a fresh one per independent query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalOwners {
    shares: HashMap<EntityId, f64>,
}

impl FinalOwners {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a contribution to an owner's share
    pub fn add(&mut self, owner: EntityId, percent: f64) {
        *self.shares.entry(owner).or_insert(0.0) += percent;
    }

    /// Cumulative share of an owner
    pub fn get(&self, owner: EntityId) -> Option<f64> {
        self.shares.get(&owner).copied()
    }

    /// Iterate over (owner, share) pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, f64)> + '_ {
        self.shares.iter().map(|(id, pct)| (*id, *pct))
    }

    /// Sum of all shares
    pub fn total(&self) -> f64 {
        self.shares.values().sum()
    }

    /// Shares sorted by percentage descending, ties broken by ascending id
    pub fn ranked(&self) -> Vec<(EntityId, f64)> {
        let mut ranked: Vec<(EntityId, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked
    }

    /// Number of owners
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether no owner was found
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    fn merge(&mut self, other: FinalOwners) {
        for (id, pct) in other.shares {
            self.add(id, pct);
        }
    }
}

struct Frame {
    id: EntityId,
    percent: f64,
    next_edge: usize,
}

/// Attribute `current_percent` of `entity_id` to its ultimate owners, with default options
///
/// Use `current_percent = 100.0` for a top-level query.
pub fn gather_final_owners(
    entity_id: EntityId,
    graph: &ReverseOwnershipGraph,
    accumulator: &mut FinalOwners,
    current_percent: f64,
) -> Result<(), ResolveError> {
    gather_final_owners_with(
        entity_id,
        graph,
        accumulator,
        current_percent,
        &ResolverOptions::default(),
    )
}

/// Attribute `current_percent` of `entity_id` to its ultimate owners
///
/// An entity without recorded owners is its own ultimate owner. On error the
/// accumulator is left untouched.
pub fn gather_final_owners_with(
    entity_id: EntityId,
    graph: &ReverseOwnershipGraph,
    accumulator: &mut FinalOwners,
    current_percent: f64,
    options: &ResolverOptions,
) -> Result<(), ResolveError> {
    let mut scratch = FinalOwners::new();
    let mut stack = vec![Frame {
        id: entity_id,
        percent: current_percent,
        next_edge: 0,
    }];
    let mut on_path: HashSet<EntityId> = HashSet::from([entity_id]);
    let mut visits = 0usize;

    while let Some(frame) = stack.last_mut() {
        let edges = graph.owners_of(frame.id);

        if edges.is_empty() {
            scratch.add(frame.id, frame.percent);
        }
        if frame.next_edge >= edges.len() {
            let id = frame.id;
            stack.pop();
            on_path.remove(&id);
            continue;
        }

        let edge = edges[frame.next_edge];
        frame.next_edge += 1;
        let percent = (edge.percent / 100.0) * (frame.percent / 100.0) * 100.0;

        if on_path.contains(&edge.owner) {
            let start = stack
                .iter()
                .position(|f| f.id == edge.owner)
                .unwrap_or(0);
            let mut path: Vec<EntityId> = stack[start..].iter().map(|f| f.id).collect();
            path.push(edge.owner);
            return Err(ResolveError::CycleDetected { path });
        }

        let depth = stack.len();
        if let Some(limit) = options.max_depth {
            if depth > limit {
                return Err(ResolveError::DepthExceeded { depth, limit });
            }
        }

        on_path.insert(edge.owner);
        stack.push(Frame {
            id: edge.owner,
            percent,
            next_edge: 0,
        });
        visits += 1;
    }

    debug!(
        "Resolved {}: {} final owners after {} edge visits",
        entity_id,
        scratch.len(),
        visits
    );
    accumulator.merge(scratch);
    Ok(())
}
