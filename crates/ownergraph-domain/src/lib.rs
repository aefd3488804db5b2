//! Ownergraph Domain Layer
//!
//! This crate contains the core model and algorithms for resolving who
//! ultimately owns an entity (typically a media outlet) from a corpus of
//! pairwise ownership relations.
//!
//! ## Key Concepts
//!
//! - **Entity**: A person, company or media outlet, keyed by an integer id
//! - **Relation**: A directed "origin owns part of target" fact with a raw stake value
//! - **Stake**: The raw value normalized into a percentage in [0, 100]
//! - **Reverse Ownership Graph**: Target-keyed index of owner edges
//! - **Final Owners**: Ultimate holders and their cumulative percentage
//!
//! ## Pipeline
//!
//! ```text
//! EntityTable + [Relation] → NameIndex → ReverseOwnershipGraph → FinalOwners → OwnershipReport
//! ```
//!
//! I/O lives in `ownergraph-ingest`; presentation lives in `ownergraph-cli`.
//!
//! # Example
//!
//! ```
//! use ownergraph_domain::{
//!     build_reverse_graph, gather_final_owners, Entity, EntityId, EntityTable, FinalOwners,
//!     Relation,
//! };
//!
//! let mut entities = EntityTable::new();
//! entities.insert(Entity::new(1, "MediaX", "Média", 3));
//! entities.insert(Entity::new(2, "HolderY", "Personne physique", 1));
//!
//! let relations = vec![Relation::new(1, "HolderY", "70", "MediaX")];
//! let graph = build_reverse_graph(&entities, &relations);
//!
//! let mut owners = FinalOwners::new();
//! gather_final_owners(EntityId(1), &graph, &mut owners, 100.0).unwrap();
//! assert!((owners.get(EntityId(2)).unwrap() - 70.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod diagnostics;
pub mod entity;
pub mod graph;
pub mod name_index;
pub mod query;
pub mod relation;
pub mod resolver;
pub mod stake;

// Re-exports for convenience
pub use diagnostics::{BuildDiagnostics, NameCollision};
pub use entity::{Entity, EntityId, EntityTable, MEDIA_TYPE_CODE};
pub use graph::{
    build_reverse_graph, build_reverse_graph_with, DuplicatePolicy, GraphOptions, OwnershipEdge,
    ReverseOwnershipGraph,
};
pub use name_index::{build_name_index, NameIndex};
pub use query::{run_query, OwnerShare, OwnershipQuery, OwnershipReport, QueryError};
pub use relation::{Provenance, Relation};
pub use resolver::{
    gather_final_owners, gather_final_owners_with, FinalOwners, ResolveError, ResolverOptions,
};
pub use stake::{classify_stake, normalize_stake, StakeKind, StakeValue};
